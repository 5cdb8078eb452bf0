//! # 单位标签
//!
//! 解析输入轴与波长的单位标签。所有标签统一做 trim + 小写处理后再比较。
//!
//! ## 支持的标签
//! - 角度: `deg`, `degs`, `degrees` / `rad`, `rads`, `radians`
//! - 散射矢量: `invang`, `invangs`, `inverse angstroms` / `invnm`, `inverse nanometers`
//! - 波长: `ang`, `angs`, `angstroms` / `nm`, `nanometers`
//!
//! ## 依赖关系
//! - 被 `models/pattern.rs` 和 `cli/` 使用
//! - 使用 `error.rs`

use crate::error::{PowderError, Result};

use std::fmt;
use std::str::FromStr;

const DEGS: &[&str] = &["deg", "degs", "degrees"];
const RADS: &[&str] = &["rad", "rads", "radians"];
const INVANGS: &[&str] = &["invang", "invangs", "inverse angstroms"];
const INVNMS: &[&str] = &["invnm", "inverse nanometers"];
const ANGS: &[&str] = &["ang", "angs", "angstroms"];
const NMS: &[&str] = &["nm", "nanometers"];

/// 横轴单位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XUnits {
    /// 2θ，度
    Degrees,
    /// 2θ，弧度
    Radians,
    /// q，Å⁻¹
    InverseAngstrom,
    /// q，nm⁻¹
    InverseNanometer,
}

impl XUnits {
    /// 是否为散射矢量（q）空间
    pub fn is_q_space(self) -> bool {
        matches!(self, XUnits::InverseAngstrom | XUnits::InverseNanometer)
    }

    /// 全部可接受的标签
    pub fn accepted() -> String {
        accepted_list(&[DEGS, RADS, INVANGS, INVNMS])
    }
}

impl FromStr for XUnits {
    type Err = PowderError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = normalize(s);
        if DEGS.contains(&tag.as_str()) {
            Ok(XUnits::Degrees)
        } else if RADS.contains(&tag.as_str()) {
            Ok(XUnits::Radians)
        } else if INVANGS.contains(&tag.as_str()) {
            Ok(XUnits::InverseAngstrom)
        } else if INVNMS.contains(&tag.as_str()) {
            Ok(XUnits::InverseNanometer)
        } else {
            Err(PowderError::UnitError {
                tag: s.to_string(),
                accepted: Self::accepted(),
            })
        }
    }
}

impl fmt::Display for XUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XUnits::Degrees => write!(f, "degrees"),
            XUnits::Radians => write!(f, "radians"),
            XUnits::InverseAngstrom => write!(f, "inverse angstroms"),
            XUnits::InverseNanometer => write!(f, "inverse nanometers"),
        }
    }
}

/// 波长单位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnits {
    Angstrom,
    Nanometer,
}

impl LengthUnits {
    /// 全部可接受的标签
    pub fn accepted() -> String {
        accepted_list(&[ANGS, NMS])
    }

    /// 转换为纳米
    pub fn to_nanometers(self, value: f64) -> f64 {
        match self {
            LengthUnits::Angstrom => value / 10.0,
            LengthUnits::Nanometer => value,
        }
    }
}

impl FromStr for LengthUnits {
    type Err = PowderError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = normalize(s);
        if ANGS.contains(&tag.as_str()) {
            Ok(LengthUnits::Angstrom)
        } else if NMS.contains(&tag.as_str()) {
            Ok(LengthUnits::Nanometer)
        } else {
            Err(PowderError::UnitError {
                tag: s.to_string(),
                accepted: Self::accepted(),
            })
        }
    }
}

impl fmt::Display for LengthUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnits::Angstrom => write!(f, "angstroms"),
            LengthUnits::Nanometer => write!(f, "nanometers"),
        }
    }
}

fn normalize(tag: &str) -> String {
    tag.trim().to_lowercase()
}

fn accepted_list(groups: &[&[&str]]) -> String {
    let tags: Vec<String> = groups
        .iter()
        .flat_map(|g| g.iter())
        .map(|t| format!("'{}'", t))
        .collect();
    format!("({})", tags.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_units_case_insensitive() {
        assert_eq!("DEG".parse::<XUnits>().unwrap(), XUnits::Degrees);
        assert_eq!(" Radians ".parse::<XUnits>().unwrap(), XUnits::Radians);
        assert_eq!(
            "Inverse Angstroms".parse::<XUnits>().unwrap(),
            XUnits::InverseAngstrom
        );
        assert_eq!("invnm".parse::<XUnits>().unwrap(), XUnits::InverseNanometer);
        assert!(XUnits::InverseAngstrom.is_q_space());
        assert!(!XUnits::Degrees.is_q_space());
    }

    #[test]
    fn test_unknown_unit_lists_accepted_set() {
        let err = "furlongs".parse::<XUnits>().unwrap_err();
        match err {
            PowderError::UnitError { tag, accepted } => {
                assert_eq!(tag, "furlongs");
                assert!(accepted.contains("'invang'"));
                assert!(accepted.contains("'degrees'"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = "parsecs".parse::<LengthUnits>().unwrap_err();
        assert!(err.to_string().contains("'nm'"));
    }

    #[test]
    fn test_length_to_nanometers() {
        let ang: LengthUnits = "Angs".parse().unwrap();
        assert!((ang.to_nanometers(1.5406) - 0.15406).abs() < 1e-12);
        let nm: LengthUnits = "nm".parse().unwrap();
        assert_eq!(nm.to_nanometers(0.15406), 0.15406);
    }
}
