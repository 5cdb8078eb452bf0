//! # 两列 XY 衍射数据解析器
//!
//! ## 格式说明
//! ```text
//! # source_id: 10.1107/S0108768102003476
//! # wavelength: 1.5406 ang
//! # x_units: deg
//! 10.000  152.3
//! 10.020  149.8
//! ...
//! ```
//! - 每个数据行恰好两列：横轴（2θ 或 q）与强度
//! - 空行和 `#` 注释行被跳过，`# key: value` 形式的注释作为元数据
//! - 任一数据行格式错误即整体失败，不静默跳过
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 和 `commands/` 使用
//! - 使用 `models/pattern.rs`

use crate::error::{PowderError, Result};
use crate::models::{PatternOptions, WavelengthSpec};

use std::fs;
use std::path::Path;

/// 注释行中的元数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyHeader {
    pub source_id: Option<String>,
    pub x_units: Option<String>,
    pub wavelength: Option<f64>,
    pub wavelength_units: Option<String>,
}

/// 解析得到的两列数据
#[derive(Debug, Clone, Default)]
pub struct XyData {
    pub header: XyHeader,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl XyData {
    /// 合并文件元数据与命令行默认值，生成图样构造参数
    ///
    /// 文件头中的值优先。
    pub fn pattern_options(&self, defaults: &PatternOptions) -> PatternOptions {
        let source_id = self
            .header
            .source_id
            .clone()
            .unwrap_or_else(|| defaults.source_id.clone());
        let x_units = self
            .header
            .x_units
            .clone()
            .unwrap_or_else(|| defaults.x_units.clone());

        let wavelength = match (self.header.wavelength, &defaults.wavelength) {
            (Some(value), default) => {
                let units = self
                    .header
                    .wavelength_units
                    .clone()
                    .or_else(|| default.as_ref().map(|w| w.units.clone()))
                    .unwrap_or_else(|| "ang".to_string());
                Some(WavelengthSpec::new(value, units))
            }
            (None, default) => default.clone(),
        };

        PatternOptions {
            source_id,
            x_units,
            wavelength,
        }
    }
}

/// 解析 XY 文件
pub fn parse_xy_file(path: &Path) -> Result<XyData> {
    let content = fs::read_to_string(path).map_err(|e| PowderError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut data = parse_xy_content(&content, &path.display().to_string())?;
    if data.header.source_id.is_none() {
        data.header.source_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string());
    }
    Ok(data)
}

/// 从字符串内容解析 XY 格式
pub fn parse_xy_content(content: &str, source_name: &str) -> Result<XyData> {
    let mut data = XyData::default();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            parse_header_line(comment, &mut data.header, source_name, line_no)?;
            continue;
        }

        let malformed = |reason: String| PowderError::MalformedInput {
            source_name: source_name.to_string(),
            line: line_no,
            reason,
        };

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(malformed(format!(
                "expected 2 columns, found {}",
                parts.len()
            )));
        }

        let x: f64 = parts[0]
            .parse()
            .map_err(|_| malformed(format!("'{}' is not a number", parts[0])))?;
        let y: f64 = parts[1]
            .parse()
            .map_err(|_| malformed(format!("'{}' is not a number", parts[1])))?;

        data.x.push(x);
        data.y.push(y);
    }

    if data.x.is_empty() {
        return Err(PowderError::MalformedInput {
            source_name: source_name.to_string(),
            line: 0,
            reason: "no data lines".to_string(),
        });
    }

    Ok(data)
}

/// 解析 `key: value` 形式的注释，其他注释忽略
fn parse_header_line(
    comment: &str,
    header: &mut XyHeader,
    source_name: &str,
    line_no: usize,
) -> Result<()> {
    let Some((key, value)) = comment.split_once(':') else {
        return Ok(());
    };
    let key = key.trim().to_lowercase().replace([' ', '-'], "_");
    let value = value.trim();

    match key.as_str() {
        "source_id" | "doi" | "id" => header.source_id = Some(value.to_string()),
        "x_units" => header.x_units = Some(value.to_string()),
        "wavelength_units" => header.wavelength_units = Some(value.to_string()),
        "wavelength" => {
            // "1.5406" 或 "1.5406 ang"
            let mut parts = value.splitn(2, char::is_whitespace);
            let number = parts.next().unwrap_or_default();
            let wavelength: f64 = number.parse().map_err(|_| PowderError::MalformedInput {
                source_name: source_name.to_string(),
                line: line_no,
                reason: format!("wavelength '{}' is not a number", number),
            })?;
            header.wavelength = Some(wavelength);
            if let Some(units) = parts.next().map(str::trim).filter(|u| !u.is_empty()) {
                header.wavelength_units = Some(units.to_string());
            }
        }
        _ => {}
    }

    Ok(())
}
