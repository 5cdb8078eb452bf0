//! # 数据模型模块
//!
//! 定义衍射图样与单位标签的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`xrd/` 和 `commands/` 使用
//! - 子模块: pattern, units

pub mod pattern;
pub mod units;

pub use pattern::{PatternOptions, PowderPattern, WavelengthSpec};
