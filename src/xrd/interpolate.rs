//! # 一维插值
//!
//! 提供重采样所需的两种插值器：
//! - `LinearInterpolator`: 分段线性插值
//! - `CubicSpline`: not-a-knot 三次样条（与常见数值库的 `cubic` 插值一致）
//!
//! 两者都只在数据范围内求值，越界查询返回 `OutOfDomain`，不做外推。
//!
//! ## 依赖关系
//! - 被 `xrd/resample.rs` 使用
//! - 使用 `nalgebra` 求解样条方程组

use crate::error::{PowderError, Result};

use nalgebra::{DMatrix, DVector};

/// 插值器通用接口
pub trait Interpolator {
    /// 定义域 `[min, max]`
    fn domain(&self) -> (f64, f64);

    /// 在 `x` 处求值
    fn eval(&self, x: f64) -> Result<f64>;

    /// 在一组点上求值
    fn eval_all(&self, xs: &[f64]) -> Result<Vec<f64>> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// 检查 `x` 是否在定义域内
    fn check_domain(&self, x: f64) -> Result<()> {
        let (min, max) = self.domain();
        if x.is_nan() || x < min || x > max {
            return Err(PowderError::OutOfDomain { x, min, max });
        }
        Ok(())
    }
}

/// 按 x 排序并丢弃 NaN 点
fn sorted_points(x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    if x.len() != y.len() {
        return Err(PowderError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    let mut points: Vec<(f64, f64)> = x
        .iter()
        .copied()
        .zip(y.iter().copied())
        .filter(|(xi, _)| !xi.is_nan())
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(points.into_iter().unzip())
}

/// 查找包含 `x` 的区间左端下标
fn segment_index(xs: &[f64], x: f64) -> usize {
    let upper = xs.partition_point(|&v| v <= x);
    upper.saturating_sub(1).min(xs.len() - 2)
}

/// 分段线性插值
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearInterpolator {
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        let (x, y) = sorted_points(x, y)?;
        if x.len() < 2 {
            return Err(PowderError::InsufficientPoints {
                method: "linear",
                required: 2,
                found: x.len(),
            });
        }
        Ok(Self { x, y })
    }
}

impl Interpolator for LinearInterpolator {
    fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    fn eval(&self, x: f64) -> Result<f64> {
        self.check_domain(x)?;

        let i = segment_index(&self.x, x);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);

        // 重复的 x 点
        if x1 == x0 {
            return Ok(y0);
        }

        Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
    }
}

/// not-a-knot 三次样条
///
/// 以节点二阶导数 `M_i` 表示。首尾两个区间的三阶导数连续，
/// 因此 4 个点时退化为经过所有点的唯一三次多项式。
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    m: Vec<f64>,
}

impl CubicSpline {
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        let (x, y) = sorted_points(x, y)?;
        let n = x.len();
        if n < 4 {
            return Err(PowderError::InsufficientPoints {
                method: "cubic",
                required: 4,
                found: n,
            });
        }

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        if h.iter().any(|&hi| hi <= 0.0) {
            return Err(PowderError::InvalidArgument(
                "cubic interpolation requires strictly increasing x values".to_string(),
            ));
        }

        // 内部节点 1..=n-2 的三对角方程组
        let size = n - 2;
        let mut system = DMatrix::<f64>::zeros(size, size);
        let mut rhs = DVector::<f64>::zeros(size);

        for k in 0..size {
            let i = k + 1;
            if k > 0 {
                system[(k, k - 1)] = h[i - 1];
            }
            system[(k, k)] = 2.0 * (h[i - 1] + h[i]);
            if k + 1 < size {
                system[(k, k + 1)] = h[i];
            }
            rhs[k] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }

        // 左端 not-a-knot: M0 = ((h0 + h1) M1 - h0 M2) / h1
        let (h0, h1) = (h[0], h[1]);
        system[(0, 0)] += h0 * (h0 + h1) / h1;
        system[(0, 1)] -= h0 * h0 / h1;

        // 右端 not-a-knot: M_{n-1} = ((a + b) M_{n-2} - b M_{n-3}) / a
        let (a, b) = (h[n - 3], h[n - 2]);
        system[(size - 1, size - 1)] += b * (a + b) / a;
        system[(size - 1, size - 2)] -= b * b / a;

        let interior = system
            .lu()
            .solve(&rhs)
            .ok_or_else(|| PowderError::Other("singular spline system".to_string()))?;

        let mut m = Vec::with_capacity(n);
        m.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
        m.extend(interior.iter().copied());
        m.push(((a + b) * interior[size - 1] - b * interior[size - 2]) / a);

        Ok(Self { x, y, m })
    }
}

impl Interpolator for CubicSpline {
    fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    fn eval(&self, x: f64) -> Result<f64> {
        self.check_domain(x)?;

        let i = segment_index(&self.x, x);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;
        let left = x1 - x;
        let right = x - x0;

        Ok(m0 * left.powi(3) / (6.0 * h)
            + m1 * right.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * left
            + (y1 / h - m1 * h / 6.0) * right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_midpoints() {
        let interp = LinearInterpolator::new(&[0.0, 1.0, 3.0], &[0.0, 2.0, 6.0]).unwrap();
        assert_eq!(interp.eval(0.5).unwrap(), 1.0);
        assert_eq!(interp.eval(2.0).unwrap(), 4.0);
        assert_eq!(interp.eval(3.0).unwrap(), 6.0);
        assert_eq!(interp.eval(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_linear_sorts_input() {
        let interp = LinearInterpolator::new(&[2.0, 0.0, 1.0], &[4.0, 0.0, 2.0]).unwrap();
        assert_eq!(interp.domain(), (0.0, 2.0));
        assert_eq!(interp.eval(1.5).unwrap(), 3.0);
    }

    #[test]
    fn test_linear_refuses_extrapolation() {
        let interp = LinearInterpolator::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert!(matches!(
            interp.eval(1.0001),
            Err(PowderError::OutOfDomain { .. })
        ));
        assert!(interp.eval(-0.1).is_err());
        assert!(interp.eval(f64::NAN).is_err());
    }

    #[test]
    fn test_linear_needs_two_points() {
        assert!(matches!(
            LinearInterpolator::new(&[1.0], &[1.0]),
            Err(PowderError::InsufficientPoints { required: 2, .. })
        ));
    }

    #[test]
    fn test_cubic_reproduces_cubic_polynomial() {
        let f = |x: f64| x.powi(3) - 2.0 * x * x + 0.5 * x + 1.0;
        let xs = [0.0, 0.4, 1.1, 1.5, 2.3, 3.0, 3.2, 4.0];
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let spline = CubicSpline::new(&xs, &ys).unwrap();

        for x in [0.1, 0.75, 1.3, 2.0, 2.9, 3.1, 3.9, 4.0] {
            let value = spline.eval(x).unwrap();
            assert!((value - f(x)).abs() < 1e-9, "x = {}: {} vs {}", x, value, f(x));
        }
    }

    #[test]
    fn test_cubic_four_points_is_the_interpolating_cubic() {
        let f = |x: f64| 2.0 * x.powi(3) + x - 3.0;
        let xs = [1.0, 1.5, 2.7, 3.0];
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let spline = CubicSpline::new(&xs, &ys).unwrap();

        for x in [1.2, 2.0, 2.9] {
            assert!((spline.eval(x).unwrap() - f(x)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cubic_passes_through_knots() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [0.0, 3.0, 1.0, 4.0, 1.0, 5.0];
        let spline = CubicSpline::new(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((spline.eval(*x).unwrap() - y).abs() < 1e-12);
        }
        assert!(spline.eval(5.5).is_err());
    }

    #[test]
    fn test_cubic_input_validation() {
        assert!(matches!(
            CubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]),
            Err(PowderError::InsufficientPoints { required: 4, .. })
        ));
        assert!(CubicSpline::new(&[0.0, 1.0, 1.0, 2.0], &[0.0, 1.0, 1.0, 2.0]).is_err());
    }
}
