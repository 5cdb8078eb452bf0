//! # rank 子命令 CLI 定义
//!
//! 对目录中的文献图样评分并按相关系数排名
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rank.rs`

use super::compare::ReferenceArgs;
use super::{LookupArgs, PatternArgs, ScoreArgs};

use clap::Args;
use std::path::PathBuf;

/// rank 子命令参数
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Measured pattern (two-column text file)
    pub input: PathBuf,

    /// Directory (or single file) holding reference patterns
    #[arg(short, long)]
    pub refs: PathBuf,

    /// File patterns to match, comma separated
    #[arg(short, long, default_value = "*.xy,*.dat,*.txt")]
    pub pattern_glob: String,

    /// Search the reference directory recursively
    #[arg(short = 'R', long, default_value_t = false)]
    pub recursive: bool,

    #[command(flatten)]
    pub pattern: PatternArgs,

    #[command(flatten)]
    pub reference_defaults: ReferenceArgs,

    #[command(flatten)]
    pub score: ScoreArgs,

    /// Number of parallel jobs (0 = all CPUs)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Number of top candidates to show
    #[arg(long, default_value_t = 10)]
    pub top_n: usize,

    /// Write the full ranking to a CSV file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,

    /// Look up citations for the top candidates (source_id is used as DOI)
    #[arg(long, default_value_t = false)]
    pub cite: bool,

    #[command(flatten)]
    pub lookup: LookupArgs,
}
