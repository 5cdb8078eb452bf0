//! # 文献信息查询
//!
//! 根据文献标识（DOI）查询格式化的参考文献与发表日期。
//! 查询失败是常见情况，统一降级为 `None`，不返回错误。
//!
//! ## 子模块
//! - `crossref`: 基于 Crossref REST API 的实现
//!
//! ## 依赖关系
//! - 被 `commands/rank.rs` 和 `commands/cite.rs` 使用
//! - 使用 `chrono` 表示日期

pub mod crossref;

pub use crossref::{CrossrefResolver, LookupConfig};

use chrono::NaiveDate;
use serde::Serialize;

/// 参考文献
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    /// 格式化的引用文本
    pub citation: String,
    /// 发表日期，缺少月/日时取 6
    pub date: Option<NaiveDate>,
}

/// 文献查询接口
pub trait ReferenceResolver: Send + Sync {
    /// 查询文献，无法解析时返回 `None`
    fn resolve(&self, id: &str) -> Option<Reference>;
}

/// 离线模式，不做任何查询
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReferenceResolver;

impl ReferenceResolver for NoReferenceResolver {
    fn resolve(&self, _id: &str) -> Option<Reference> {
        None
    }
}
