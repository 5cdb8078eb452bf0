//! # cite 子命令 CLI 定义
//!
//! 按 DOI 查询格式化的参考文献
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/cite.rs`

use super::LookupArgs;

use clap::Args;

/// cite 子命令参数
#[derive(Args, Debug)]
pub struct CiteArgs {
    /// DOIs to look up
    #[arg(required = true)]
    pub dois: Vec<String>,

    #[command(flatten)]
    pub lookup: LookupArgs,
}
