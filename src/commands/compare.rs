//! # compare 子命令实现
//!
//! 读取实测图样与文献图样，对齐到公共网格后计算 Pearson 相关系数。
//!
//! ## 依赖关系
//! - 使用 `cli/compare.rs` 定义的 CompareArgs
//! - 使用 `parsers/` 读取图样，`xrd/` 完成对齐与评分

use super::{axis_label, pattern_defaults};
use crate::cli::compare::CompareArgs;
use crate::error::Result;
use crate::parsers;
use crate::utils::output;
use crate::xrd::{self, export, ScoreAxis};

/// 执行 compare 命令
pub fn execute(args: CompareArgs) -> Result<()> {
    output::print_header("Pattern Comparison");

    let (user_defaults, reference_defaults) =
        pattern_defaults(&args.pattern, &args.reference_defaults)?;

    let user = parsers::load_pattern(&args.input, &user_defaults)?;
    let reference = parsers::load_pattern(&args.reference, &reference_defaults)?;

    output::print_info(&format!(
        "Measured: '{}' ({} points), reference: '{}' ({} points)",
        user.source_id(),
        user.len(),
        reference.source_id(),
        reference.len()
    ));

    let method = args.score.resample_method();
    let (axis, pair) =
        xrd::align_patterns(&user, &reference, args.score.axis.into(), &method)?;
    let pearson = xrd::similarity::score_grid_pair(&pair)?;

    let unit = match axis {
        ScoreAxis::TwoTheta => "rad",
        _ => "nm^-1",
    };
    if let (Some(first), Some(last)) = (pair.first.first(), pair.first.last()) {
        output::print_info(&format!(
            "Aligned on {} grid: {} points over [{:.4}, {:.4}] {}",
            axis_label(axis),
            pair.len(),
            first.0,
            last.0,
            unit
        ));
    }

    output::print_score("Pearson correlation", pearson);

    if let Some(path) = &args.export {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            export::grid_to_csv(&pair, path)?;
        } else {
            let label = format!("{} ({})", axis_label(axis), unit);
            export::grid_to_xy(&pair, &label, path)?;
        }
        output::print_success(&format!("Resampled data saved to '{}'", path.display()));
    }

    Ok(())
}
