//! # 统一错误处理模块
//!
//! 定义 powder-match 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// powder-match 统一错误类型
#[derive(Error, Debug)]
pub enum PowderError {
    // ─────────────────────────────────────────────────────────────
    // 单位错误
    // ─────────────────────────────────────────────────────────────
    #[error("Do not recognize units '{tag}'. Select from {accepted}")]
    UnitError { tag: String, accepted: String },

    #[error("Pattern '{source_id}' has no wavelength; scattering-vector (q) data is unavailable")]
    MissingWavelength { source_id: String },

    // ─────────────────────────────────────────────────────────────
    // 重采样 / 相似度错误
    // ─────────────────────────────────────────────────────────────
    #[error("Reciprocal space axis missing: {0}")]
    MissingAxis(String),

    #[error("Data ranges do not overlap: [{min1}, {max1}] vs [{min2}, {max2}]")]
    NoOverlap {
        min1: f64,
        max1: f64,
        min2: f64,
        max2: f64,
    },

    #[error("Interpolation at x = {x} is outside the data range [{min}, {max}]")]
    OutOfDomain { x: f64, min: f64, max: f64 },

    #[error("{method} interpolation needs at least {required} points, got {found}")]
    InsufficientPoints {
        method: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Pearson correlation is undefined: {0}")]
    UndefinedCorrelation(String),

    #[error("Array length mismatch: {left} x-values vs {right} y-values")]
    LengthMismatch { left: usize, right: usize },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed input in {source_name} at line {line}: {reason}")]
    MalformedInput {
        source_name: String,
        line: usize,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, PowderError>;
