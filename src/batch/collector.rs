//! # 文件收集器
//!
//! 根据输入路径和模式收集候选图样文件列表。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - 逗号分隔的多个 glob 模式
//! - 递归目录搜索
//!
//! ## 依赖关系
//! - 被 `commands/rank.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{PowderError, Result};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<String>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: vec!["*".to_string()],
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.patterns = pattern
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if self.patterns.is_empty() {
            self.patterns = vec!["*".to_string()];
        }
        self
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件（按路径排序）
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        if !self.input.is_dir() {
            return Err(PowderError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let patterns = self
            .patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    PowderError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| matches_any(&patterns, entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        Ok(files)
    }
}

/// 检查文件名是否匹配任一模式
fn matches_any(patterns: &[Pattern], path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => patterns.iter().any(|p| p.matches(name)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_with_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xy"), "1 2\n").unwrap();
        fs::write(dir.path().join("a.dat"), "1 2\n").unwrap();
        fs::write(dir.path().join("notes.md"), "-").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.xy"), "1 2\n").unwrap();

        let files = FileCollector::new(dir.path().to_path_buf())
            .with_pattern("*.xy, *.dat")
            .collect()
            .unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.dat", "b.xy"]);

        let files = FileCollector::new(dir.path().to_path_buf())
            .with_pattern("*.xy")
            .recursive(true)
            .collect()
            .unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_single_file_and_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.xy");
        fs::write(&file, "1 2\n").unwrap();

        let files = FileCollector::new(file.clone()).collect().unwrap();
        assert_eq!(files, vec![file]);

        assert!(FileCollector::new(dir.path().join("nope")).collect().is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileCollector::new(dir.path().to_path_buf())
            .with_pattern("[*.xy")
            .collect();
        assert!(matches!(err, Err(PowderError::InvalidArgument(_))));
    }
}
