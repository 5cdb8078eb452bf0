//! # 粉末衍射图样数据模型
//!
//! 同一图样的三种对齐表示：2θ（弧度）、q（nm⁻¹）和强度。
//! 是否带有波长在类型层面区分：
//! - `PatternWithWavelength`: 2θ 与 q 均可用
//! - `PatternAngleOnly`: 只有 2θ，q 空间操作返回 `MissingWavelength`
//!
//! 构造后不可变，字段只通过切片读取。
//!
//! ## 依赖关系
//! - 被 `parsers/xy.rs`、`xrd/resample.rs` 和 `commands/` 使用
//! - 使用 `models/units.rs` 解析单位
//! - 使用 `xrd/conversion.rs` 换算坐标轴

use crate::error::{PowderError, Result};
use crate::models::units::{LengthUnits, XUnits};
use crate::xrd::conversion;

/// 波长及其单位标签
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthSpec {
    pub value: f64,
    pub units: String,
}

impl WavelengthSpec {
    pub fn new(value: f64, units: impl Into<String>) -> Self {
        Self {
            value,
            units: units.into(),
        }
    }
}

/// 图样构造参数
#[derive(Debug, Clone, PartialEq)]
pub struct PatternOptions {
    /// 来源标识（论文编号、DOI 等）
    pub source_id: String,
    /// 横轴单位标签
    pub x_units: String,
    /// 波长；`None` 表示无波长模式
    pub wavelength: Option<WavelengthSpec>,
}

impl PatternOptions {
    pub fn new(source_id: impl Into<String>, x_units: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            x_units: x_units.into(),
            wavelength: None,
        }
    }

    pub fn with_wavelength(mut self, value: f64, units: impl Into<String>) -> Self {
        self.wavelength = Some(WavelengthSpec::new(value, units));
        self
    }
}

/// 带波长的图样
#[derive(Debug, Clone)]
pub struct PatternWithWavelength {
    source_id: String,
    wavelength: f64,
    two_theta: Vec<f64>,
    q: Vec<f64>,
    intensity: Vec<f64>,
}

impl PatternWithWavelength {
    /// 波长（nm）
    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// q（nm⁻¹）
    pub fn q(&self) -> &[f64] {
        &self.q
    }
}

/// 无波长图样，仅角度空间可用
#[derive(Debug, Clone)]
pub struct PatternAngleOnly {
    source_id: String,
    two_theta: Vec<f64>,
    intensity: Vec<f64>,
}

/// 粉末衍射图样
#[derive(Debug, Clone)]
pub enum PowderPattern {
    WithWavelength(PatternWithWavelength),
    AngleOnly(PatternAngleOnly),
}

impl PowderPattern {
    /// 从原始横轴数据构造图样
    ///
    /// 所有单位标签在处理数组之前解析，任何错误都不会产生半成品。
    pub fn build(options: &PatternOptions, x: Vec<f64>, intensity: Vec<f64>) -> Result<Self> {
        let x_units: XUnits = options.x_units.parse()?;
        let wavelength = match &options.wavelength {
            Some(spec) => {
                let units: LengthUnits = spec.units.parse()?;
                if !spec.value.is_finite() || spec.value <= 0.0 {
                    return Err(PowderError::InvalidArgument(format!(
                        "wavelength must be positive, got {}",
                        spec.value
                    )));
                }
                Some(units.to_nanometers(spec.value))
            }
            None => None,
        };

        if x.len() != intensity.len() {
            return Err(PowderError::LengthMismatch {
                left: x.len(),
                right: intensity.len(),
            });
        }

        let source_id = options.source_id.clone();

        let Some(wavelength) = wavelength else {
            let two_theta = match x_units {
                XUnits::Degrees => conversion::to_radians_all(&x),
                XUnits::Radians => x,
                XUnits::InverseAngstrom | XUnits::InverseNanometer => {
                    return Err(PowderError::MissingWavelength { source_id });
                }
            };
            return Ok(PowderPattern::AngleOnly(PatternAngleOnly {
                source_id,
                two_theta,
                intensity,
            }));
        };

        let (two_theta, q) = match x_units {
            XUnits::InverseAngstrom => {
                let q: Vec<f64> = x.iter().map(|v| v * 10.0).collect();
                (conversion::to_angle_all(&q, wavelength), q)
            }
            XUnits::InverseNanometer => (conversion::to_angle_all(&x, wavelength), x),
            XUnits::Degrees => {
                let two_theta = conversion::to_radians_all(&x);
                let q = conversion::to_q_all(&two_theta, wavelength);
                (two_theta, q)
            }
            XUnits::Radians => {
                let q = conversion::to_q_all(&x, wavelength);
                (x, q)
            }
        };

        let beyond = two_theta.iter().filter(|t| t.is_nan()).count();
        if beyond > 0 {
            tracing::warn!(
                source = %source_id,
                points = beyond,
                "q values lie outside the Ewald sphere for this wavelength"
            );
        }

        Ok(PowderPattern::WithWavelength(PatternWithWavelength {
            source_id,
            wavelength,
            two_theta,
            q,
            intensity,
        }))
    }

    /// 来源标识
    pub fn source_id(&self) -> &str {
        match self {
            PowderPattern::WithWavelength(p) => &p.source_id,
            PowderPattern::AngleOnly(p) => &p.source_id,
        }
    }

    /// 波长（nm），无波长模式返回 `None`
    pub fn wavelength(&self) -> Option<f64> {
        match self {
            PowderPattern::WithWavelength(p) => Some(p.wavelength),
            PowderPattern::AngleOnly(_) => None,
        }
    }

    /// 2θ（弧度）
    pub fn two_theta(&self) -> &[f64] {
        match self {
            PowderPattern::WithWavelength(p) => &p.two_theta,
            PowderPattern::AngleOnly(p) => &p.two_theta,
        }
    }

    /// q（nm⁻¹）
    pub fn q(&self) -> Result<&[f64]> {
        match self {
            PowderPattern::WithWavelength(p) => Ok(p.q()),
            PowderPattern::AngleOnly(p) => Err(PowderError::MissingWavelength {
                source_id: p.source_id.clone(),
            }),
        }
    }

    /// 强度
    pub fn intensity(&self) -> &[f64] {
        match self {
            PowderPattern::WithWavelength(p) => &p.intensity,
            PowderPattern::AngleOnly(p) => &p.intensity,
        }
    }

    /// 数据点数
    pub fn len(&self) -> usize {
        self.intensity().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_degrees_with_angstrom_wavelength() {
        let options = PatternOptions::new("br1234", "degrees").with_wavelength(1.5406, "ang");
        let pattern =
            PowderPattern::build(&options, vec![10.0, 20.0, 30.0], vec![1.0, 5.0, 2.0]).unwrap();

        assert_eq!(pattern.source_id(), "br1234");
        assert!((pattern.wavelength().unwrap() - 0.15406).abs() < 1e-12);
        assert!((pattern.two_theta()[1] - 20.0_f64.to_radians()).abs() < 1e-12);

        let q = pattern.q().unwrap();
        let expected = 4.0 * PI * (10.0_f64.to_radians()).sin() / 0.15406;
        assert!((q[1] - expected).abs() < 1e-9);
        assert_eq!(pattern.intensity(), &[1.0, 5.0, 2.0]);
    }

    #[test]
    fn test_inverse_angstrom_is_scaled_to_nm() {
        let options = PatternOptions::new("ab0001", "InvAng").with_wavelength(0.15406, "nm");
        let pattern = PowderPattern::build(&options, vec![1.0, 2.0], vec![3.0, 4.0]).unwrap();

        let q = pattern.q().unwrap();
        assert_eq!(q, &[10.0, 20.0]);
        let angle = pattern.two_theta()[0];
        assert!((conversion::to_q(angle, 0.15406) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_q_to_angle_round_trip_both_units() {
        for (wl, units) in [(1.5406, "angstroms"), (0.15406, "nanometers")] {
            let degrees: Vec<f64> = (5..=90).map(|d| d as f64).collect();
            let options = PatternOptions::new("x", "deg").with_wavelength(wl, units);
            let pattern =
                PowderPattern::build(&options, degrees.clone(), vec![1.0; degrees.len()]).unwrap();

            let q_options = PatternOptions::new("x", "invnm").with_wavelength(wl, units);
            let q_pattern = PowderPattern::build(
                &q_options,
                pattern.q().unwrap().to_vec(),
                vec![1.0; degrees.len()],
            )
            .unwrap();

            for (a, b) in pattern.two_theta().iter().zip(q_pattern.two_theta()) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_angle_only_pattern() {
        let options = PatternOptions::new("nowl", "deg");
        let pattern = PowderPattern::build(&options, vec![90.0], vec![1.0]).unwrap();

        assert!(matches!(pattern, PowderPattern::AngleOnly(_)));
        assert!(pattern.wavelength().is_none());
        assert!((pattern.two_theta()[0] - PI / 2.0).abs() < 1e-12);
        assert!(matches!(
            pattern.q(),
            Err(PowderError::MissingWavelength { .. })
        ));
    }

    #[test]
    fn test_q_input_without_wavelength_fails() {
        let options = PatternOptions::new("nowl", "invnm");
        let err = PowderPattern::build(&options, vec![1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, PowderError::MissingWavelength { .. }));
    }

    #[test]
    fn test_unknown_units_fail_before_construction() {
        let options = PatternOptions::new("x", "furlongs").with_wavelength(1.54, "ang");
        let err = PowderPattern::build(&options, vec![1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, PowderError::UnitError { .. }));

        let options = PatternOptions::new("x", "deg").with_wavelength(1.54, "cubits");
        let err = PowderPattern::build(&options, vec![1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, PowderError::UnitError { .. }));
    }

    #[test]
    fn test_invalid_wavelength_and_lengths() {
        let options = PatternOptions::new("x", "deg").with_wavelength(-1.0, "ang");
        assert!(matches!(
            PowderPattern::build(&options, vec![1.0], vec![1.0]),
            Err(PowderError::InvalidArgument(_))
        ));

        let options = PatternOptions::new("x", "deg").with_wavelength(1.0, "ang");
        assert!(matches!(
            PowderPattern::build(&options, vec![1.0, 2.0], vec![1.0]),
            Err(PowderError::LengthMismatch { left: 2, right: 1 })
        ));
    }
}
