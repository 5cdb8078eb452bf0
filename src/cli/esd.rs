//! # esd 子命令 CLI 定义
//!
//! 处理 "数值(esd)" 写法，包含多个子命令：
//! - `round`: 按 esd 有效数字舍入
//! - `parse`: 人类可读写法拆分为数值与 esd
//! - `format`: 数值与 esd 合并为人类可读写法
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/esd.rs`

use clap::{Args, Subcommand};

/// esd 主命令参数
#[derive(Args, Debug)]
pub struct EsdArgs {
    #[command(subcommand)]
    pub command: EsdCommands,
}

/// esd 子命令
#[derive(Subcommand, Debug)]
pub enum EsdCommands {
    /// Round values and their esds to the significant figures of the esd
    Round(NumbersArgs),

    /// Split strings such as 343.44(45) into value and esd
    Parse(ParseArgs),

    /// Join values and esds into strings such as 343.44(45)
    Format(FormatArgs),
}

/// 数值与 esd 列表
#[derive(Args, Debug)]
pub struct NumbersArgs {
    /// Values, comma separated
    #[arg(short, long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub numbers: Vec<f64>,

    /// Estimated standard deviations, comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub esds: Vec<f64>,
}

/// parse 子命令参数
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Strings of the form value(esd)
    #[arg(required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}

/// format 子命令参数
#[derive(Args, Debug)]
pub struct FormatArgs {
    #[command(flatten)]
    pub numbers: NumbersArgs,

    /// Round to the esd's significant figures before formatting
    #[arg(long, default_value_t = false)]
    pub round: bool,
}
