//! # 解析器模块
//!
//! 读取两列衍射数据文件并构造图样。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: xy

pub mod xy;

use crate::error::Result;
use crate::models::{PatternOptions, PowderPattern};
use std::path::Path;

/// 读取文件并构造图样，文件头中的元数据优先于 `defaults`
pub fn load_pattern(path: &Path, defaults: &PatternOptions) -> Result<PowderPattern> {
    let data = xy::parse_xy_file(path)?;
    let options = data.pattern_options(defaults);
    tracing::debug!(
        path = %path.display(),
        source_id = %options.source_id,
        points = data.x.len(),
        "loaded pattern"
    );
    PowderPattern::build(&options, data.x, data.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_pattern_with_header_wavelength() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.xy");
        fs::write(&path, "# wavelength: 1.5406 ang\n20 1\n30 5\n40 2\n").unwrap();

        let defaults = PatternOptions::new("", "deg");
        let pattern = load_pattern(&path, &defaults).unwrap();
        assert_eq!(pattern.source_id(), "ref");
        assert!((pattern.wavelength().unwrap() - 0.15406).abs() < 1e-12);
        assert_eq!(pattern.len(), 3);
    }

    #[test]
    fn test_load_pattern_unit_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xy");
        fs::write(&path, "# x_units: furlongs\n20 1\n30 5\n").unwrap();

        let defaults = PatternOptions::new("", "deg");
        assert!(matches!(
            load_pattern(&path, &defaults),
            Err(crate::error::PowderError::UnitError { .. })
        ));
    }
}
