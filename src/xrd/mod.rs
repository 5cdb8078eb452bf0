//! # XRD 图样比较模块
//!
//! 提供单位换算、插值、重采样与相似度计算。
//!
//! ## 子模块
//! - `conversion`: 2θ 与 q 的换算
//! - `interpolate`: 线性插值与三次样条
//! - `resample`: 两个图样对齐到公共网格
//! - `similarity`: Pearson 相关系数评分
//! - `export`: 排名报告与重采样数据导出
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `models/pattern.rs` 使用

pub mod conversion;
pub mod export;
pub mod interpolate;
pub mod resample;
pub mod similarity;

pub use resample::{CubicResampleConfig, GridPair, ResampleConfig};
pub use similarity::{align_patterns, score_patterns, ResampleMethod, ScoreAxis, Similarity};
