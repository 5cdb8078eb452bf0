//! # compare 子命令 CLI 定义
//!
//! 比较实测图样与单个文献图样
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/compare.rs`

use super::{parse_wavelength, PatternArgs, ScoreArgs};
use crate::models::{PatternOptions, WavelengthSpec};

use clap::Args;
use std::path::PathBuf;

/// 文献图样的默认元数据（文件头缺失时使用）
#[derive(Args, Debug, Clone)]
pub struct ReferenceArgs {
    /// Units of the reference first column (defaults to --x-units)
    #[arg(long)]
    pub ref_x_units: Option<String>,

    /// Reference wavelength in ang, or a source name (defaults to --wavelength)
    #[arg(long)]
    pub ref_wavelength: Option<String>,
}

impl ReferenceArgs {
    /// 组合文献图样的默认构造参数
    pub fn defaults(
        &self,
        user: &PatternArgs,
        user_wavelength: Option<&WavelengthSpec>,
    ) -> Result<PatternOptions, String> {
        let x_units = self
            .ref_x_units
            .clone()
            .unwrap_or_else(|| user.x_units.clone());
        let wavelength = match &self.ref_wavelength {
            Some(w) => Some(parse_wavelength(w, "ang")?),
            None => user_wavelength.cloned(),
        };

        Ok(PatternOptions {
            source_id: String::new(),
            x_units,
            wavelength,
        })
    }
}

/// compare 子命令参数
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Measured pattern (two-column text file)
    pub input: PathBuf,

    /// Reference pattern (two-column text file)
    pub reference: PathBuf,

    #[command(flatten)]
    pub pattern: PatternArgs,

    #[command(flatten)]
    pub reference_defaults: ReferenceArgs,

    #[command(flatten)]
    pub score: ScoreArgs,

    /// Write the resampled pattern pair (.csv or .xy)
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}
