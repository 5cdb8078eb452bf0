//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `compare`: 比较实测图样与单个文献图样
//! - `rank`: 对目录中的全部文献图样评分并排名
//! - `esd`: 数值(esd) 写法的解析、格式化与舍入（嵌套子命令）
//! - `cite`: 按 DOI 查询参考文献
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: compare, rank, esd, cite

pub mod cite;
pub mod compare;
pub mod esd;
pub mod rank;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::time::Duration;

use crate::models::WavelengthSpec;
use crate::reference::LookupConfig;
use crate::xrd::{CubicResampleConfig, ResampleConfig, ResampleMethod, ScoreAxis};

/// powder-match - 粉末衍射图样文献匹配工具
#[derive(Parser)]
#[command(name = "powder-match")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Match measured powder diffraction patterns against literature references", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Compare a measured pattern with one reference pattern
    Compare(compare::CompareArgs),

    /// Score every reference pattern in a directory and rank them
    Rank(rank::RankArgs),

    /// Parse, format and round values written as number(esd)
    Esd(esd::EsdArgs),

    /// Look up formatted citations for DOIs
    Cite(cite::CiteArgs),
}

// ─────────────────────────────────────────────────────────────
// 共享参数
// ─────────────────────────────────────────────────────────────

/// 预定义辐射源波长 (Å)
pub fn get_predefined_wavelength(name: &str) -> Option<f64> {
    match name.trim().to_lowercase().as_str() {
        "cu-ka" | "cuka" => Some(1.5418),
        "cu-ka1" | "cuka1" => Some(1.5406),
        "cu-ka2" | "cuka2" => Some(1.5444),
        "mo-ka" | "moka" => Some(0.7107),
        "mo-ka1" | "moka1" => Some(0.7093),
        "co-ka" | "coka" => Some(1.7903),
        "fe-ka" | "feka" => Some(1.9373),
        "cr-ka" | "crka" => Some(2.2910),
        "ag-ka" | "agka" => Some(0.5609),
        _ => None,
    }
}

/// 解析波长输入（辐射源名称或数值）
///
/// 辐射源名称总是以 Å 给出，数值使用 `units`。
pub fn parse_wavelength(input: &str, units: &str) -> Result<WavelengthSpec, String> {
    if let Some(wl) = get_predefined_wavelength(input) {
        return Ok(WavelengthSpec::new(wl, "ang"));
    }
    input
        .trim()
        .parse::<f64>()
        .map(|value| WavelengthSpec::new(value, units))
        .map_err(|_| {
            format!(
                "Invalid wavelength '{}'. Use a number (e.g., 1.5406) or a name: cu-ka, cu-ka1, mo-ka, co-ka, fe-ka, cr-ka, ag-ka",
                input
            )
        })
}

/// 图样横轴与波长参数
#[derive(Args, Debug, Clone)]
pub struct PatternArgs {
    /// Units of the first column: deg, rad, invang, invnm
    #[arg(long, default_value = "deg")]
    pub x_units: String,

    /// Wavelength as a number or a source name (cu-ka, mo-ka, ...)
    #[arg(short, long)]
    pub wavelength: Option<String>,

    /// Units of a numeric wavelength: ang, nm
    #[arg(long, default_value = "ang")]
    pub wavelength_units: String,
}

impl PatternArgs {
    /// 解析后的波长
    pub fn wavelength_spec(&self) -> Result<Option<WavelengthSpec>, String> {
        self.wavelength
            .as_deref()
            .map(|w| parse_wavelength(w, &self.wavelength_units))
            .transpose()
    }
}

/// 重采样方式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum MethodArg {
    /// Linear interpolation of both patterns over the shared range
    #[default]
    Linear,
    /// Cubic spline of the reference on a 0.005 nm^-1 q grid
    Cubic,
}

/// 比较坐标轴
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum AxisArg {
    /// q when both patterns have a wavelength, otherwise 2θ
    #[default]
    Auto,
    /// Scattering vector q
    Q,
    /// Diffraction angle 2θ
    TwoTheta,
}

impl From<AxisArg> for ScoreAxis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::Auto => ScoreAxis::Auto,
            AxisArg::Q => ScoreAxis::Q,
            AxisArg::TwoTheta => ScoreAxis::TwoTheta,
        }
    }
}

/// 评分参数
#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Resampling method
    #[arg(long, value_enum, default_value_t = MethodArg::Linear)]
    pub method: MethodArg,

    /// Grid step (default 0.001 for linear, 0.005 for cubic)
    #[arg(long)]
    pub step: Option<f64>,

    /// Axis used for comparison
    #[arg(long, value_enum, default_value_t = AxisArg::Auto)]
    pub axis: AxisArg,
}

impl ScoreArgs {
    /// 转换为重采样配置
    pub fn resample_method(&self) -> ResampleMethod {
        match self.method {
            MethodArg::Linear => {
                let mut config = ResampleConfig::default();
                if let Some(step) = self.step {
                    config.step = step;
                }
                ResampleMethod::Linear(config)
            }
            MethodArg::Cubic => {
                let mut config = CubicResampleConfig::default();
                if let Some(step) = self.step {
                    config.step = step;
                }
                ResampleMethod::Cubic(config)
            }
        }
    }
}

/// Crossref 查询参数
#[derive(Args, Debug, Clone)]
pub struct LookupArgs {
    /// Contact address sent to Crossref
    #[arg(long, env = "POWDER_MATCH_MAILTO")]
    pub mailto: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Retries on network errors, 429 and 5xx responses
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// Crossref API base URL
    #[arg(long, default_value = "https://api.crossref.org", hide = true)]
    pub api_url: String,
}

impl LookupArgs {
    pub fn config(&self) -> LookupConfig {
        LookupConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout),
            retries: self.retries,
            mailto: self.mailto.clone(),
            ..LookupConfig::default()
        }
    }
}
