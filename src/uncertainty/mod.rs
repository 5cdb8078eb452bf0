//! # 测量不确定度模块
//!
//! 处理晶体学文献中常见的 "数值(esd)" 写法，例如 `343.44(45)`。
//!
//! ## 子模块
//! - `notation`: 人类可读写法与 (数值, esd) 数对之间的转换
//! - `rounding`: 按 esd 的有效数字规则舍入数值与 esd
//!
//! ## 依赖关系
//! - 被 `commands/esd.rs` 使用
//! - 使用 `regex` 解析文本

pub mod notation;
pub mod rounding;

pub use notation::{hr_to_mr, mr_to_hr};
pub use rounding::round_number_esd;

use std::fmt;

/// 舍入结果：esd 不小于 1 时截断为整数，否则保留浮点
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundedNumber {
    Float(f64),
    Int(i64),
}

impl RoundedNumber {
    pub fn as_f64(self) -> f64 {
        match self {
            RoundedNumber::Float(v) => v,
            RoundedNumber::Int(v) => v as f64,
        }
    }
}

impl From<f64> for RoundedNumber {
    fn from(value: f64) -> Self {
        RoundedNumber::Float(value)
    }
}

impl From<i64> for RoundedNumber {
    fn from(value: i64) -> Self {
        RoundedNumber::Int(value)
    }
}

impl fmt::Display for RoundedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // 整数值的浮点数保留 ".0"，与整数区分
            RoundedNumber::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            RoundedNumber::Float(v) => write!(f, "{}", v),
            RoundedNumber::Int(v) => write!(f, "{}", v),
        }
    }
}
