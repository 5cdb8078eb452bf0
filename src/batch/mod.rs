//! # 批量评分模块
//!
//! 将一个实测图样与一批文献图样文件逐一比较。
//!
//! ## 流程
//! 1. `FileCollector` 按 glob 模式收集候选文件（排序后顺序确定）
//! 2. `BatchRunner` 在 rayon 线程池中对每个文件调用评分闭包
//! 3. 结果汇总为 `BatchResult<T>`：成功结果、跳过数、失败详情
//!
//! ## 依赖关系
//! - 被 `commands/rank.rs` 使用
//! - 子模块: collector, runner

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchResult, BatchRunner, ProcessResult};
