//! # 数值与 esd 的有效数字舍入
//!
//! ## 规则
//! 先取 esd 的 5 位有效数字十进制形式 `d0.d1d2d3d4 × 10^e`：
//! - 数值小于 esd：数值置 0，1 位有效数字
//! - `d0 != 1`：1 位有效数字
//! - `d0 == 1, d1 < 4`：2 位有效数字
//! - `d0 == 1, d1 == 4`：`d2 >= 5` 时 esd 尾数进位为 1.5 并取 1 位（即 2×10^e），否则 2 位
//! - `d0 == 1, d1 > 4`：1 位有效数字
//!
//! 数量级 `n` 为 `log10(esd)` 向零取整，esd ≥ 1 时再加 1。
//! 数值按 `floor(x·10^(sf-n) + 0.5) / 10^(sf-n)` 四舍五入（逢半进位），
//! esd 在整数尾数上做同样的逢半进位，避免 `1.5×10^e` 之类的浮点表示向下偏移。
//! 舍入后 esd ≥ 1 时两者都截断为整数。
//!
//! 尾数与指数全部由十进制整数运算得出，不经过字符串格式化。
//!
//! ## 依赖关系
//! - 被 `commands/esd.rs` 使用

use crate::error::{PowderError, Result};
use crate::uncertainty::RoundedNumber;

/// 5 位有效数字的十进制科学计数形式：`digits × 10^(exponent - 4)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DecimalMantissa {
    /// 10000..=99999
    digits: u32,
    exponent: i32,
}

impl DecimalMantissa {
    fn of(value: f64) -> Self {
        let mut exponent = value.log10().floor() as i32;
        let mut digits = scale_pow10(value, 4 - exponent).round();

        // log10 的浮点误差最多使指数偏差一位
        for _ in 0..3 {
            if digits >= 100_000.0 {
                exponent += 1;
            } else if digits < 10_000.0 {
                exponent -= 1;
            } else {
                break;
            }
            digits = scale_pow10(value, 4 - exponent).round();
        }

        Self {
            digits: digits as u32,
            exponent,
        }
    }

    /// 第 `k` 位有效数字（从 0 开始）
    fn digit(&self, k: u32) -> u32 {
        (self.digits / 10u32.pow(4 - k)) % 10
    }

    /// 保留 `sig_figs` 位有效数字，在整数尾数上逢半进位
    fn round_to(&self, sig_figs: u32) -> f64 {
        let dropped = 10u32.pow(5 - sig_figs);
        let kept = (self.digits + dropped / 2) / dropped;
        scale_pow10(kept as f64, self.exponent + 1 - sig_figs as i32)
    }
}

/// `value × 10^k`，以精确的 10 的幂做一次乘或除
fn scale_pow10(value: f64, k: i32) -> f64 {
    if k >= 0 {
        value * 10f64.powi(k)
    } else {
        value / 10f64.powi(-k)
    }
}

/// 在 `10^-k` 位上逢半进位
fn round_half_up(value: f64, k: i32) -> f64 {
    if k >= 0 {
        let scale = 10f64.powi(k);
        (value * scale + 0.5).floor() / scale
    } else {
        let scale = 10f64.powi(-k);
        (value / scale + 0.5).floor() * scale
    }
}

/// 舍入单个 (数值, esd) 数对
fn round_pair(value: f64, esd: f64) -> (RoundedNumber, RoundedNumber) {
    let mut mantissa = DecimalMantissa::of(esd);
    let mut value = value;

    let sig_figs: u32 = if value < esd {
        value = 0.0;
        1
    } else if mantissa.digit(0) != 1 {
        1
    } else {
        match mantissa.digit(1) {
            d1 if d1 < 4 => 2,
            4 if mantissa.digit(2) >= 5 => {
                mantissa.digits = 15_000;
                1
            }
            4 => 2,
            _ => 1,
        }
    };

    // log10(esd) 向零取整；小于 1 且恰为 10 的幂时等于指数本身
    let n = if mantissa.exponent >= 0 || mantissa.digits != 10_000 {
        mantissa.exponent + 1
    } else {
        mantissa.exponent
    };

    let k = sig_figs as i32 - n;
    let value = round_half_up(value, k);
    let esd = mantissa.round_to(sig_figs);

    if esd >= 1.0 {
        (
            RoundedNumber::Int(value.trunc() as i64),
            RoundedNumber::Int(esd.trunc() as i64),
        )
    } else {
        (RoundedNumber::Float(value), RoundedNumber::Float(esd))
    }
}

/// 按 esd 的有效数字规则舍入数值与 esd
pub fn round_number_esd(
    numbers: &[f64],
    esds: &[f64],
) -> Result<(Vec<RoundedNumber>, Vec<RoundedNumber>)> {
    if numbers.len() != esds.len() {
        return Err(PowderError::LengthMismatch {
            left: numbers.len(),
            right: esds.len(),
        });
    }

    let mut rounded_numbers = Vec::with_capacity(numbers.len());
    let mut rounded_esds = Vec::with_capacity(esds.len());

    for (&value, &esd) in numbers.iter().zip(esds.iter()) {
        if !esd.is_finite() || esd <= 0.0 || !value.is_finite() {
            return Err(PowderError::InvalidArgument(format!(
                "cannot round {} with esd {}: esd must be positive and both finite",
                value, esd
            )));
        }
        let (v, e) = round_pair(value, esd);
        rounded_numbers.push(v);
        rounded_esds.push(e);
    }

    Ok((rounded_numbers, rounded_esds))
}
