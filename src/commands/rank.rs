//! # rank 子命令实现
//!
//! 将实测图样与目录中的全部文献图样比较，按 Pearson 相关系数降序排名。
//!
//! ## 功能
//! - 并行评分（rayon），实测图样只读共享
//! - 排名表格输出（tabled）
//! - 可选：对前 N 名查询参考文献（评分结束后在当前线程进行）
//! - 可选：完整排名导出为 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/rank.rs` 定义的 RankArgs
//! - 使用 `batch/` 模块收集文件并并行处理
//! - 使用 `reference/` 模块查询文献

use super::{axis_label, pattern_defaults};
use crate::batch::{BatchResult, BatchRunner, FileCollector, ProcessResult};
use crate::cli::rank::RankArgs;
use crate::error::Result;
use crate::models::{PatternOptions, PowderPattern};
use crate::parsers;
use crate::reference::{CrossrefResolver, Reference, ReferenceResolver};
use crate::utils::{output, progress};
use crate::xrd::export::{self, RankingRecord};
use crate::xrd::{self, ResampleMethod, ScoreAxis, Similarity};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::{Table, Tabled};

/// 单个候选的评分结果
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub path: PathBuf,
    pub source_id: String,
    pub similarity: Similarity,
    pub reference: Option<Reference>,
}

/// 表格行
#[derive(Debug, Clone, Tabled)]
struct RankRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Source")]
    source_id: String,
    #[tabled(rename = "Pearson")]
    pearson: String,
    #[tabled(rename = "Points")]
    points: usize,
    #[tabled(rename = "Axis")]
    axis: String,
    #[tabled(rename = "Reference")]
    citation: String,
}

/// 并行比较所需的只读配置
struct RankConfig {
    user: PowderPattern,
    user_path: Option<PathBuf>,
    reference_defaults: PatternOptions,
    axis: ScoreAxis,
    method: ResampleMethod,
}

/// 执行 rank 命令
pub fn execute(args: RankArgs) -> Result<()> {
    output::print_header("Reference Pattern Ranking");

    let (user_defaults, reference_defaults) =
        pattern_defaults(&args.pattern, &args.reference_defaults)?;
    let user = parsers::load_pattern(&args.input, &user_defaults)?;

    let files = FileCollector::new(args.refs.clone())
        .with_pattern(&args.pattern_glob)
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        output::print_warning(&format!(
            "No reference files found with pattern '{}'",
            args.pattern_glob
        ));
        return Ok(());
    }

    output::print_info(&format!(
        "Scoring '{}' against {} reference files",
        user.source_id(),
        files.len()
    ));

    let config = Arc::new(RankConfig {
        user,
        user_path: args.input.canonicalize().ok(),
        reference_defaults,
        axis: args.score.axis.into(),
        method: args.score.resample_method(),
    });

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |file| score_candidate(file, &config))?;

    report_failures(&result);
    let mut ranked = sort_candidates(result.successes);

    if ranked.is_empty() {
        output::print_warning("No reference pattern could be scored.");
        return Ok(());
    }

    let top_n = args.top_n.min(ranked.len());

    if args.cite {
        let resolver = CrossrefResolver::new(args.lookup.config())?;
        let spinner = progress::create_spinner("Looking up references");
        let found = attach_references(&mut ranked, &resolver, top_n);
        spinner.finish_and_clear();
        output::print_info(&format!("Resolved {}/{} references", found, top_n));
    }

    output::print_header(&format!("Top {} Reference Patterns by Pearson Correlation", top_n));
    let rows: Vec<RankRow> = ranked
        .iter()
        .take(top_n)
        .enumerate()
        .map(|(i, c)| RankRow {
            rank: i + 1,
            source_id: c.source_id.clone(),
            pearson: format!("{:.4}", c.similarity.pearson),
            points: c.similarity.points,
            axis: axis_label(c.similarity.axis).to_string(),
            citation: c
                .reference
                .as_ref()
                .map(|r| r.citation.clone())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    println!("{}", Table::new(&rows));

    if let Some(path) = &args.output_csv {
        export::ranking_to_csv(&ranking_records(&ranked), path)?;
        output::print_success(&format!("Full ranking saved to '{}'", path.display()));
    }

    Ok(())
}

/// 评分单个候选文件
fn score_candidate(path: &PathBuf, config: &RankConfig) -> ProcessResult<RankedCandidate> {
    if let Some(user_path) = &config.user_path {
        if path.canonicalize().ok().as_ref() == Some(user_path) {
            return ProcessResult::Skipped(format!("{} is the measured pattern", path.display()));
        }
    }

    let scored = parsers::load_pattern(path, &config.reference_defaults).and_then(|reference| {
        xrd::score_patterns(&config.user, &reference, config.axis, &config.method)
            .map(|similarity| (reference.source_id().to_string(), similarity))
    });

    match scored {
        Ok((source_id, similarity)) => ProcessResult::Success(RankedCandidate {
            path: path.clone(),
            source_id,
            similarity,
            reference: None,
        }),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "candidate rejected");
            ProcessResult::Failed(path.display().to_string(), e.to_string())
        }
    }
}

/// 按相关系数降序排列，相同分数保持文件顺序
pub fn sort_candidates(mut candidates: Vec<RankedCandidate>) -> Vec<RankedCandidate> {
    candidates.sort_by(|a, b| {
        b.similarity
            .pearson
            .partial_cmp(&a.similarity.pearson)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

/// 为前 `top_n` 名查询参考文献，返回成功数量
pub fn attach_references(
    candidates: &mut [RankedCandidate],
    resolver: &dyn ReferenceResolver,
    top_n: usize,
) -> usize {
    let mut found = 0;
    for candidate in candidates.iter_mut().take(top_n) {
        candidate.reference = resolver.resolve(&candidate.source_id);
        if candidate.reference.is_some() {
            found += 1;
        } else {
            tracing::warn!(source_id = %candidate.source_id, "no reference found");
        }
    }
    found
}

/// 生成 CSV 报告行
fn ranking_records(candidates: &[RankedCandidate]) -> Vec<RankingRecord> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| RankingRecord {
            rank: i + 1,
            source_id: c.source_id.clone(),
            file: c.path.display().to_string(),
            pearson: c.similarity.pearson,
            points: c.similarity.points,
            axis: axis_label(c.similarity.axis).to_string(),
            citation: c.reference.as_ref().map(|r| r.citation.clone()),
            date: c
                .reference
                .as_ref()
                .and_then(|r| r.date)
                .map(|d| d.format("%Y-%m-%d").to_string()),
        })
        .collect()
}

/// 打印统计与失败文件
fn report_failures<T>(result: &BatchResult<T>) {
    output::print_success(&format!(
        "Scoring complete: {} scored, {} skipped, {} failed",
        result.success(),
        result.skipped,
        result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", file_name(path), err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }
}

fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::NoReferenceResolver;
    use chrono::NaiveDate;
    use std::fs;

    struct FakeResolver;

    impl ReferenceResolver for FakeResolver {
        fn resolve(&self, id: &str) -> Option<Reference> {
            (id != "unknown").then(|| Reference {
                citation: format!("Paper about {}", id),
                date: NaiveDate::from_ymd_opt(2001, 6, 6),
            })
        }
    }

    fn peak(x: f64, center: f64) -> f64 {
        100.0 * (-(x - center).powi(2) / 0.2).exp() + 1.0
    }

    fn write_pattern(path: &Path, center: f64) {
        let body: String = (0..300)
            .map(|i| {
                let x = 10.0 + i as f64 * 0.1;
                format!("{:.3} {:.6}\n", x, peak(x, center))
            })
            .collect();
        fs::write(path, body).unwrap();
    }

    fn candidate(id: &str, pearson: f64) -> RankedCandidate {
        RankedCandidate {
            path: PathBuf::from(format!("{}.xy", id)),
            source_id: id.to_string(),
            similarity: Similarity {
                pearson,
                points: 10,
                axis: ScoreAxis::Q,
            },
            reference: None,
        }
    }

    #[test]
    fn test_sort_candidates_descending() {
        let sorted = sort_candidates(vec![
            candidate("a", 0.2),
            candidate("b", 0.9),
            candidate("c", -0.4),
            candidate("d", 0.9),
        ]);
        let ids: Vec<_> = sorted.iter().map(|c| c.source_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_attach_references_only_top_n() {
        let mut ranked = vec![candidate("x1", 0.9), candidate("unknown", 0.8), candidate("x3", 0.7)];
        let found = attach_references(&mut ranked, &FakeResolver, 2);
        assert_eq!(found, 1);
        assert_eq!(ranked[0].reference.as_ref().unwrap().citation, "Paper about x1");
        assert!(ranked[1].reference.is_none());
        assert!(ranked[2].reference.is_none());

        assert_eq!(attach_references(&mut ranked, &NoReferenceResolver, 3), 0);
    }

    #[test]
    fn test_ranking_pipeline_orders_by_score() {
        let dir = tempfile::tempdir().unwrap();
        let user_path = dir.path().join("sample.xy");
        write_pattern(&user_path, 25.0);

        let refs = dir.path().join("refs");
        fs::create_dir(&refs).unwrap();
        write_pattern(&refs.join("near.xy"), 25.2);
        write_pattern(&refs.join("exact.xy"), 25.0);
        write_pattern(&refs.join("far.xy"), 32.0);
        fs::write(refs.join("broken.xy"), "1 2 3\n").unwrap();

        let defaults = PatternOptions::new("", "deg").with_wavelength(1.5406, "ang");
        let config = Arc::new(RankConfig {
            user: parsers::load_pattern(&user_path, &defaults).unwrap(),
            user_path: user_path.canonicalize().ok(),
            reference_defaults: defaults,
            axis: ScoreAxis::Auto,
            method: ResampleMethod::default(),
        });

        let files = FileCollector::new(refs).with_pattern("*.xy").collect().unwrap();
        let result = BatchRunner::new(2)
            .quiet()
            .run(files, |file| score_candidate(file, &config))
            .unwrap();

        assert_eq!(result.failed, 1);
        let ranked = sort_candidates(result.successes);
        let ids: Vec<_> = ranked.iter().map(|c| c.source_id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "near", "far"]);
        assert!((ranked[0].similarity.pearson - 1.0).abs() < 1e-9);

        let records = ranking_records(&ranked);
        assert_eq!(records[2].rank, 3);
        assert_eq!(records[0].axis, "q");
    }

    #[test]
    fn test_measured_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let user_path = dir.path().join("sample.xy");
        write_pattern(&user_path, 25.0);

        let defaults = PatternOptions::new("", "deg");
        let config = RankConfig {
            user: parsers::load_pattern(&user_path, &defaults).unwrap(),
            user_path: user_path.canonicalize().ok(),
            reference_defaults: defaults,
            axis: ScoreAxis::Auto,
            method: ResampleMethod::default(),
        };

        assert!(matches!(
            score_candidate(&user_path, &config),
            ProcessResult::Skipped(_)
        ));
    }
}
