//! # 数值(esd) 记法转换
//!
//! - `hr_to_mr`: `"343.44(45)"` → `343.44`, `0.45`，不做舍入
//! - `mr_to_hr`: `343.4`, `0.5` → `"343.4(5)"`
//!
//! 括号内的数字按数值文本的小数位数缩放。数值没有小数点时，
//! 括号内数字按整数单位解释（`"12(3)"` 的 esd 为 3）。
//!
//! ## 依赖关系
//! - 被 `commands/esd.rs` 使用
//! - 使用 `regex`

use crate::error::{PowderError, Result};
use crate::uncertainty::RoundedNumber;

use regex::Regex;

/// 解析人类可读的 数值(esd) 字符串
///
/// 返回数值列表和 esd 列表。
pub fn hr_to_mr<S: AsRef<str>>(number_esd: &[S]) -> Result<(Vec<f64>, Vec<f64>)> {
    let pattern = Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\((\d+)\)\s*$")
        .map_err(|e| PowderError::Other(e.to_string()))?;

    let mut numbers = Vec::with_capacity(number_esd.len());
    let mut esds = Vec::with_capacity(number_esd.len());

    for (i, entry) in number_esd.iter().enumerate() {
        let entry = entry.as_ref();
        let malformed = |reason: String| PowderError::MalformedInput {
            source_name: format!("'{}'", entry),
            line: i + 1,
            reason,
        };

        let caps = pattern
            .captures(entry)
            .ok_or_else(|| malformed("expected the form <digits>[.<digits>](<digits>)".to_string()))?;
        let number_text = &caps[1];
        let esd_text = &caps[2];

        let number: f64 = number_text
            .parse()
            .map_err(|_| malformed(format!("'{}' is not a number", number_text)))?;
        let esd_digits: f64 = esd_text
            .parse()
            .map_err(|_| malformed(format!("'{}' is not a digit sequence", esd_text)))?;

        let decimals = number_text
            .split_once('.')
            .map(|(_, frac)| frac.len() as i32)
            .unwrap_or(0);

        numbers.push(number);
        esds.push(esd_digits / 10f64.powi(decimals));
    }

    Ok((numbers, esds))
}

/// esd 的括号内表示
///
/// 小于 1 时取小数点后的数字并去掉前导零，否则原样输出。
fn esd_digits(esd: RoundedNumber) -> String {
    match esd {
        RoundedNumber::Float(e) if e < 1.0 => {
            let text = e.to_string();
            match text.split_once('.') {
                Some((_, frac)) => {
                    let trimmed = frac.trim_start_matches('0');
                    if trimmed.is_empty() {
                        "0".to_string()
                    } else {
                        trimmed.to_string()
                    }
                }
                None => text,
            }
        }
        other => other.to_string(),
    }
}

/// 合并数值与 esd 为人类可读字符串
pub fn mr_to_hr<N, E>(numbers: &[N], esds: &[E]) -> Result<Vec<String>>
where
    N: Copy + Into<RoundedNumber>,
    E: Copy + Into<RoundedNumber>,
{
    if numbers.len() != esds.len() {
        return Err(PowderError::LengthMismatch {
            left: numbers.len(),
            right: esds.len(),
        });
    }

    Ok(numbers
        .iter()
        .zip(esds.iter())
        .map(|(&n, &e)| format!("{}({})", n.into(), esd_digits(e.into())))
        .collect())
}
