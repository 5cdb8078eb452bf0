//! # 图样相似度
//!
//! 在两个重采样网格的公共 x 范围上计算 Pearson 相关系数。
//! 接近 1 表示图样高度吻合。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `batch/` 使用
//! - 使用 `xrd/resample.rs` 完成对齐
//! - 使用 `models/pattern.rs` 读取图样

use crate::error::{PowderError, Result};
use crate::models::PowderPattern;
use crate::xrd::resample::{self, CubicResampleConfig, GridPair, ResampleConfig};

/// 比较所用的坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreAxis {
    /// 两者都有波长时用 q，否则退回 2θ
    #[default]
    Auto,
    /// 散射矢量 q（nm⁻¹）
    Q,
    /// 衍射角 2θ（弧度）
    TwoTheta,
}

/// 重采样方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResampleMethod {
    /// 公共定义域 + 线性插值
    Linear(ResampleConfig),
    /// 文献图样三次样条（仅 q 空间）
    Cubic(CubicResampleConfig),
}

impl Default for ResampleMethod {
    fn default() -> Self {
        ResampleMethod::Linear(ResampleConfig::default())
    }
}

/// 单次比较结果
#[derive(Debug, Clone)]
pub struct Similarity {
    /// Pearson 相关系数
    pub pearson: f64,
    /// 参与计算的网格点数
    pub points: usize,
    /// 实际使用的坐标轴
    pub axis: ScoreAxis,
}

/// 某一网格上落在 `[lo, hi]` 内的下标区间
///
/// `start` 为最后一个 `x <= lo` 的下标，`end` 为最后一个 `lo < x <= hi` 的下标加一。
fn window(grid: &[(f64, f64)], lo: f64, hi: f64) -> Option<(usize, usize)> {
    let mut start = None;
    let mut end = None;

    for (i, (x, _)) in grid.iter().enumerate() {
        if *x <= lo {
            start = Some(i);
        } else if *x <= hi {
            end = Some(i + 1);
        }
    }

    let start = start?;
    Some((start, end.unwrap_or(start + 1)))
}

/// Pearson 相关系数
///
/// 长度不足 2 或方差为零时返回 `UndefinedCorrelation`。
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(PowderError::UndefinedCorrelation(format!(
            "series lengths differ ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    if a.len() < 2 {
        return Err(PowderError::UndefinedCorrelation(format!(
            "need at least 2 points, got {}",
            a.len()
        )));
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut sab = 0.0;
    let mut saa = 0.0;
    let mut sbb = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = x - mean_a;
        let db = y - mean_b;
        sab += da * db;
        saa += da * da;
        sbb += db * db;
    }

    if saa == 0.0 || sbb == 0.0 {
        return Err(PowderError::UndefinedCorrelation(
            "one series has zero variance".to_string(),
        ));
    }

    let r = sab / (saa * sbb).sqrt();
    if r.is_nan() {
        return Err(PowderError::UndefinedCorrelation(
            "series contain non-finite values".to_string(),
        ));
    }

    Ok(r.clamp(-1.0, 1.0))
}

/// 在两个重采样网格的重叠区间上计算 Pearson 相关系数
pub fn pearson_correlate(first: &[(f64, f64)], second: &[(f64, f64)]) -> Result<f64> {
    let bounds = |grid: &[(f64, f64)]| {
        grid.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (x, _)| {
            (lo.min(*x), hi.max(*x))
        })
    };
    let (min1, max1) = bounds(first);
    let (min2, max2) = bounds(second);
    let lo = min1.max(min2);
    let hi = max1.min(max2);

    let (s1, e1) = window(first, lo, hi).ok_or_else(|| {
        PowderError::UndefinedCorrelation("first grid does not reach the shared range".to_string())
    })?;
    let (s2, e2) = window(second, lo, hi).ok_or_else(|| {
        PowderError::UndefinedCorrelation("second grid does not reach the shared range".to_string())
    })?;

    let a: Vec<f64> = first[s1..e1].iter().map(|(_, y)| *y).collect();
    let b: Vec<f64> = second[s2..e2].iter().map(|(_, y)| *y).collect();

    pearson(&a, &b)
}

/// 对一对已对齐网格评分
pub fn score_grid_pair(pair: &GridPair) -> Result<f64> {
    pearson_correlate(&pair.first, &pair.second)
}

/// 将两个图样对齐到公共网格，返回实际使用的坐标轴
///
/// `user` 为实测图样，`reference` 为文献图样。
pub fn align_patterns(
    user: &PowderPattern,
    reference: &PowderPattern,
    axis: ScoreAxis,
    method: &ResampleMethod,
) -> Result<(ScoreAxis, GridPair)> {
    let axis = match axis {
        ScoreAxis::Auto => {
            if user.wavelength().is_some() && reference.wavelength().is_some() {
                ScoreAxis::Q
            } else {
                ScoreAxis::TwoTheta
            }
        }
        explicit => explicit,
    };

    let (user_x, reference_x) = match axis {
        ScoreAxis::TwoTheta => (user.two_theta(), reference.two_theta()),
        _ => (user.q()?, reference.q()?),
    };

    let pair = match method {
        ResampleMethod::Linear(config) => resample::xy_resample(
            user_x,
            user.intensity(),
            reference_x,
            reference.intensity(),
            config,
        )?,
        ResampleMethod::Cubic(config) => {
            if axis != ScoreAxis::Q {
                return Err(PowderError::InvalidArgument(
                    "cubic reference resampling is only defined in q-space".to_string(),
                ));
            }
            resample::reference_resample(
                user_x,
                user.intensity(),
                reference_x,
                reference.intensity(),
                config,
            )?
        }
    };

    Ok((axis, pair))
}

/// 对齐并比较两个图样
pub fn score_patterns(
    user: &PowderPattern,
    reference: &PowderPattern,
    axis: ScoreAxis,
    method: &ResampleMethod,
) -> Result<Similarity> {
    let (axis, pair) = align_patterns(user, reference, axis, method)?;
    let pearson = score_grid_pair(&pair)?;
    tracing::debug!(
        user = user.source_id(),
        reference = reference.source_id(),
        pearson,
        points = pair.len(),
        "scored pattern pair"
    );

    Ok(Similarity {
        pearson,
        points: pair.len(),
        axis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatternOptions;

    fn grid(ys: &[f64]) -> Vec<(f64, f64)> {
        ys.iter()
            .enumerate()
            .map(|(i, y)| (i as f64 * 0.5, *y))
            .collect()
    }

    #[test]
    fn test_identical_series_is_exactly_one() {
        let ys = [0.3, 1.7, 9.2, 4.4, 0.1, 2.25, 7.0];
        let r = pearson_correlate(&grid(&ys), &grid(&ys)).unwrap();
        assert_eq!(r, 1.0);
    }

    #[test]
    fn test_negated_series_is_exactly_minus_one() {
        let ys = [0.3, 1.7, 9.2, 4.4, 0.1, 2.25, 7.0];
        let neg: Vec<f64> = ys.iter().map(|y| -y).collect();
        let r = pearson_correlate(&grid(&ys), &grid(&neg)).unwrap();
        assert_eq!(r, -1.0);
    }

    #[test]
    fn test_linear_relation_scores_one() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [3.0, 5.0, 7.0, 9.0];
        assert!((pearson(&a, &b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_cases_are_errors() {
        assert!(matches!(
            pearson(&[1.0], &[1.0]),
            Err(PowderError::UndefinedCorrelation(_))
        ));
        assert!(matches!(
            pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
            Err(PowderError::UndefinedCorrelation(_))
        ));
        assert!(pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_window_uses_shared_range() {
        // 第二个网格从 1.0 开始，第一个网格的窗口应从 x = 1.0 处开始
        let first: Vec<(f64, f64)> = (0..7).map(|i| (i as f64 * 0.5, (i * i) as f64)).collect();
        let second: Vec<(f64, f64)> = (0..5)
            .map(|i| (1.0 + i as f64 * 0.5, ((i + 2) * (i + 2)) as f64))
            .collect();

        assert_eq!(window(&first, 1.0, 3.0), Some((2, 7)));
        assert_eq!(window(&second, 1.0, 3.0), Some((0, 5)));
        assert_eq!(pearson_correlate(&first, &second).unwrap(), 1.0);
    }

    #[test]
    fn test_score_patterns_self_match() {
        let x: Vec<f64> = (0..400).map(|i| 10.0 + i as f64 * 0.1).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|t| 100.0 * (-(t - 30.0).powi(2) / 0.5).exp() + 5.0)
            .collect();
        let options = PatternOptions::new("sample", "deg").with_wavelength(1.5406, "ang");
        let pattern = PowderPattern::build(&options, x, y).unwrap();

        let sim = score_patterns(
            &pattern,
            &pattern,
            ScoreAxis::Auto,
            &ResampleMethod::Linear(ResampleConfig { step: 0.01 }),
        )
        .unwrap();

        assert_eq!(sim.axis, ScoreAxis::Q);
        assert!((sim.pearson - 1.0).abs() < 1e-12);
        assert!(sim.points > 100);
    }

    #[test]
    fn test_score_patterns_angle_only_falls_back() {
        let x: Vec<f64> = (0..50).map(|i| 5.0 + i as f64).collect();
        let y: Vec<f64> = x.iter().map(|t| (t / 3.0).sin() + 1.5).collect();
        let user = PowderPattern::build(&PatternOptions::new("u", "deg"), x.clone(), y.clone())
            .unwrap();
        let reference = PowderPattern::build(
            &PatternOptions::new("r", "deg").with_wavelength(1.54, "ang"),
            x,
            y,
        )
        .unwrap();

        let sim = score_patterns(&user, &reference, ScoreAxis::Auto, &ResampleMethod::default())
            .unwrap();
        assert_eq!(sim.axis, ScoreAxis::TwoTheta);

        let err = score_patterns(&user, &reference, ScoreAxis::Q, &ResampleMethod::default());
        assert!(matches!(err, Err(PowderError::MissingWavelength { .. })));
    }

    #[test]
    fn test_cubic_method_needs_q_axis() {
        let x: Vec<f64> = (0..200).map(|i| 10.0 + i as f64 * 0.1).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|t| 50.0 * (-(t - 20.0).powi(2) / 0.8).exp() + 2.0)
            .collect();
        let with_wl = PatternOptions::new("s", "deg").with_wavelength(1.5406, "ang");
        let pattern = PowderPattern::build(&with_wl, x.clone(), y.clone()).unwrap();

        let method = ResampleMethod::Cubic(CubicResampleConfig::default());
        let sim = score_patterns(&pattern, &pattern, ScoreAxis::Auto, &method).unwrap();
        assert_eq!(sim.axis, ScoreAxis::Q);
        assert!(sim.pearson > 0.99);

        let err = score_patterns(&pattern, &pattern, ScoreAxis::TwoTheta, &method);
        assert!(matches!(err, Err(PowderError::InvalidArgument(_))));
    }
}
