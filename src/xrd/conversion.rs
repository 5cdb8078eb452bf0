//! # 角度与散射矢量换算
//!
//! 散射几何关系：`q = 4π·sin(2θ/2)/λ`，`2θ = 2·asin(qλ/4π)`。
//! 内部统一使用弧度、纳米和 nm⁻¹。
//!
//! ## 依赖关系
//! - 被 `models/pattern.rs` 和 `xrd/resample.rs` 使用
//! - 无外部模块依赖

use std::f64::consts::PI;

/// 度转弧度
pub fn to_radians(angle_degrees: f64) -> f64 {
    angle_degrees.to_radians()
}

/// 2θ（弧度）转 q，单位为波长单位的倒数
pub fn to_q(two_theta: f64, wavelength: f64) -> f64 {
    4.0 * PI * (two_theta / 2.0).sin() / wavelength
}

/// q 转 2θ（弧度）
///
/// `qλ/4π > 1` 时位于 Ewald 球之外，返回 NaN。
pub fn to_angle(q: f64, wavelength: f64) -> f64 {
    2.0 * (q * wavelength / (4.0 * PI)).asin()
}

/// 批量度转弧度
pub fn to_radians_all(angles: &[f64]) -> Vec<f64> {
    angles.iter().map(|&a| to_radians(a)).collect()
}

/// 批量 2θ 转 q
pub fn to_q_all(two_theta: &[f64], wavelength: f64) -> Vec<f64> {
    two_theta.iter().map(|&t| to_q(t, wavelength)).collect()
}

/// 批量 q 转 2θ
pub fn to_angle_all(q: &[f64], wavelength: f64) -> Vec<f64> {
    q.iter().map(|&v| to_angle(v, wavelength)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cu_ka_reference_point() {
        // Cu Kα, 2θ = 30°: q = 4π sin(15°) / 0.15406 nm
        let q = to_q(to_radians(30.0), 0.15406);
        assert!((q - 21.1113).abs() < 1e-3, "q = {}", q);
    }

    #[test]
    fn test_round_trip() {
        for wavelength in [0.15406, 1.5406, 0.0424589] {
            let angles: Vec<f64> = (1..170).map(|d| to_radians(d as f64)).collect();
            let q = to_q_all(&angles, wavelength);
            let back = to_angle_all(&q, wavelength);
            for (a, b) in angles.iter().zip(back.iter()) {
                assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_outside_ewald_sphere_is_nan() {
        // q_max = 4π/λ
        let wavelength = 0.1;
        assert!(to_angle(4.0 * PI / wavelength * 1.01, wavelength).is_nan());
        assert!((to_angle(4.0 * PI / wavelength, wavelength) - PI).abs() < 1e-12);
    }
}
