//! # 比较结果导出
//!
//! ## 支持格式
//! - 排名 CSV: rank, source_id, file, pearson, points, axis, citation, date
//! - 网格 CSV: x, user_intensity, reference_intensity（重采样后的公共网格）
//! - 网格 XY: 带 `#` 注释头的三列文本
//!
//! ## 依赖关系
//! - 被 `commands/compare.rs` 和 `commands/rank.rs` 调用
//! - 使用 `xrd/resample.rs` 的 GridPair
//! - 使用 `csv` + `serde` 写入 CSV 文件

use crate::error::{PowderError, Result};
use crate::xrd::GridPair;

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 排名报告中的一行
#[derive(Debug, Clone, Serialize)]
pub struct RankingRecord {
    pub rank: usize,
    pub source_id: String,
    pub file: String,
    pub pearson: f64,
    pub points: usize,
    pub axis: String,
    pub citation: Option<String>,
    pub date: Option<String>,
}

/// 重采样网格的一行
#[derive(Debug, Clone, Serialize)]
struct GridRecord {
    x: f64,
    user_intensity: f64,
    reference_intensity: f64,
}

fn write_error(path: &Path, source: std::io::Error) -> PowderError {
    PowderError::FileWriteError {
        path: path.display().to_string(),
        source,
    }
}

/// 导出排名报告为 CSV
pub fn ranking_to_csv(records: &[RankingRecord], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for record in records {
        wtr.serialize(record)?;
    }

    wtr.flush().map_err(|e| write_error(output_path, e))?;
    Ok(())
}

/// 导出重采样网格为 CSV
pub fn grid_to_csv(pair: &GridPair, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for ((x, user), (_, reference)) in pair.first.iter().zip(pair.second.iter()) {
        wtr.serialize(GridRecord {
            x: *x,
            user_intensity: *user,
            reference_intensity: *reference,
        })?;
    }

    wtr.flush().map_err(|e| write_error(output_path, e))?;
    Ok(())
}

/// 导出重采样网格为 XY 格式
pub fn grid_to_xy(pair: &GridPair, axis_label: &str, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| write_error(output_path, e))?;
    let mut out = BufWriter::new(file);

    let mut write_all = || -> std::io::Result<()> {
        writeln!(out, "# Resampled pattern pair")?;
        writeln!(out, "# Columns: {}, user intensity, reference intensity", axis_label)?;
        writeln!(out, "#")?;
        for ((x, user), (_, reference)) in pair.first.iter().zip(pair.second.iter()) {
            writeln!(out, "{:.6}\t{:.6}\t{:.6}", x, user, reference)?;
        }
        out.flush()
    };

    write_all().map_err(|e| write_error(output_path, e))
}
