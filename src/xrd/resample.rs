//! # 图样重采样
//!
//! 将两条采样点不同（可能不均匀）的曲线对齐到同一规则网格上。
//!
//! ## 两种模式
//! - `xy_resample`: 在两者定义域的交集上建立网格，两条曲线均做线性插值
//! - `reference_resample`: 文献图样用三次样条，网格由取整后的 q 极值限定，
//!   固定步长 0.005，避免样条在文献数据支撑之外外推
//!
//! ## 依赖关系
//! - 被 `xrd/similarity.rs` 和 `commands/` 使用
//! - 使用 `xrd/interpolate.rs` 的插值器

use crate::error::{PowderError, Result};
use crate::xrd::interpolate::{CubicSpline, Interpolator, LinearInterpolator};

/// 线性重采样配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampleConfig {
    /// 网格步长（横轴单位）
    pub step: f64,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self { step: 1e-3 }
    }
}

/// 三次样条重采样配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicResampleConfig {
    /// 网格步长（nm⁻¹）
    pub step: f64,
}

impl Default for CubicResampleConfig {
    fn default() -> Self {
        Self { step: 0.005 }
    }
}

/// 共享同一 x 网格的两组 (x, y) 数据
#[derive(Debug, Clone, Default)]
pub struct GridPair {
    pub first: Vec<(f64, f64)>,
    pub second: Vec<(f64, f64)>,
}

impl GridPair {
    /// 共享网格
    pub fn grid(&self) -> Vec<f64> {
        self.first.iter().map(|(x, _)| *x).collect()
    }

    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

/// 数组最小值与最大值（忽略 NaN）
fn extrema(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn check_step(step: f64) -> Result<()> {
    if !step.is_finite() || step <= 0.0 {
        return Err(PowderError::InvalidArgument(format!(
            "grid step must be positive, got {}",
            step
        )));
    }
    Ok(())
}

/// 包含两端点的规则网格，点数 `floor((max - min)/step) + 1`
pub fn regular_grid(min: f64, max: f64, step: f64) -> Result<Vec<f64>> {
    check_step(step)?;
    if max < min {
        return Err(PowderError::InvalidArgument(format!(
            "grid bounds are reversed: [{}, {}]",
            min, max
        )));
    }

    let n = ((max - min) / step).floor() as usize + 1;
    if n == 1 {
        return Ok(vec![min]);
    }

    let spacing = (max - min) / (n - 1) as f64;
    let mut grid: Vec<f64> = (0..n).map(|i| min + i as f64 * spacing).collect();
    grid[n - 1] = max;

    Ok(grid)
}

/// q 极值取整：最小值向上、最大值向下，保留两位小数
pub fn q_extrema_round(q: &[f64]) -> Option<(f64, f64)> {
    let (min, max) = extrema(q)?;
    Some(((min * 100.0).ceil() / 100.0, (max * 100.0).floor() / 100.0))
}

/// 将两组数据重采样到其公共定义域上的规则网格
///
/// 两组数据各自线性插值，网格端点即公共定义域端点，不会越界求值。
pub fn xy_resample(
    x1: &[f64],
    y1: &[f64],
    x2: &[f64],
    y2: &[f64],
    config: &ResampleConfig,
) -> Result<GridPair> {
    if x2.is_empty() || x2.iter().all(|&v| v == 0.0) {
        return Err(PowderError::MissingAxis(
            "second data set has an empty or all-zero x-axis".to_string(),
        ));
    }

    let (min1, max1) = extrema(x1)
        .ok_or_else(|| PowderError::MissingAxis("first data set has no x values".to_string()))?;
    let (min2, max2) = extrema(x2)
        .ok_or_else(|| PowderError::MissingAxis("second data set has no x values".to_string()))?;

    let lo = min1.max(min2);
    let hi = max1.min(max2);
    if lo > hi {
        return Err(PowderError::NoOverlap {
            min1,
            max1,
            min2,
            max2,
        });
    }

    let grid = regular_grid(lo, hi, config.step)?;
    tracing::debug!(lo, hi, points = grid.len(), "linear resampling grid");

    let first = LinearInterpolator::new(x1, y1)?.eval_all(&grid)?;
    let second = LinearInterpolator::new(x2, y2)?.eval_all(&grid)?;

    Ok(GridPair {
        first: grid.iter().copied().zip(first).collect(),
        second: grid.iter().copied().zip(second).collect(),
    })
}

/// 文献图样三次样条重采样
///
/// `reference` 使用三次样条，`user` 使用线性插值。网格下界为取整后的
/// 文献 q 最小值与用户数据最小值中较大者，上界同理。取整结果再夹回
/// 文献数据的原始范围内。
pub fn reference_resample(
    user_x: &[f64],
    user_y: &[f64],
    reference_x: &[f64],
    reference_y: &[f64],
    config: &CubicResampleConfig,
) -> Result<GridPair> {
    check_step(config.step)?;

    let (ref_min, ref_max) = extrema(reference_x).ok_or_else(|| {
        PowderError::MissingAxis("reference data set has no x values".to_string())
    })?;
    let (ref_lo, ref_hi) = q_extrema_round(reference_x).unwrap_or((ref_min, ref_max));
    // 两位小数的舍入可能在末位上越过原始极值
    let (ref_lo, ref_hi) = (ref_lo.max(ref_min), ref_hi.min(ref_max));
    let (user_min, user_max) = extrema(user_x)
        .ok_or_else(|| PowderError::MissingAxis("user data set has no x values".to_string()))?;

    let lo = ref_lo.max(user_min);
    let hi = ref_hi.min(user_max);
    if lo > hi {
        return Err(PowderError::NoOverlap {
            min1: user_min,
            max1: user_max,
            min2: ref_lo,
            max2: ref_hi,
        });
    }

    // 从下界开始按固定步长递增，不超过上界
    let count = ((hi - lo) / config.step).floor() as usize + 1;
    let grid: Vec<f64> = (0..count)
        .map(|i| lo + i as f64 * config.step)
        .filter(|&x| x <= hi)
        .collect();
    tracing::debug!(lo, hi, points = grid.len(), "cubic resampling grid");

    let user = LinearInterpolator::new(user_x, user_y)?.eval_all(&grid)?;
    let reference = CubicSpline::new(reference_x, reference_y)?.eval_all(&grid)?;

    Ok(GridPair {
        first: grid.iter().copied().zip(user).collect(),
        second: grid.iter().copied().zip(reference).collect(),
    })
}
