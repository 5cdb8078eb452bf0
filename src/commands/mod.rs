//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `xrd/`, `uncertainty/`, `reference/`, `utils/`
//! - 子模块: compare, rank, esd, cite

pub mod cite;
pub mod compare;
pub mod esd;
pub mod rank;

use crate::cli::compare::ReferenceArgs;
use crate::cli::{Commands, PatternArgs};
use crate::error::{PowderError, Result};
use crate::models::PatternOptions;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compare(args) => compare::execute(args),
        Commands::Rank(args) => rank::execute(args),
        Commands::Esd(args) => esd::execute(args),
        Commands::Cite(args) => cite::execute(args),
    }
}

/// 由命令行参数得到实测图样与文献图样的默认构造参数
fn pattern_defaults(
    pattern: &PatternArgs,
    reference: &ReferenceArgs,
) -> Result<(PatternOptions, PatternOptions)> {
    let wavelength = pattern.wavelength_spec().map_err(PowderError::InvalidArgument)?;
    let reference_defaults = reference
        .defaults(pattern, wavelength.as_ref())
        .map_err(PowderError::InvalidArgument)?;

    let user_defaults = PatternOptions {
        source_id: String::new(),
        x_units: pattern.x_units.clone(),
        wavelength,
    };

    Ok((user_defaults, reference_defaults))
}

/// 坐标轴显示名称
fn axis_label(axis: crate::xrd::ScoreAxis) -> &'static str {
    match axis {
        crate::xrd::ScoreAxis::TwoTheta => "2theta",
        _ => "q",
    }
}
