//! # cite 子命令实现
//!
//! 逐个查询 DOI 并打印格式化的参考文献。查询失败只给出警告。
//!
//! ## 依赖关系
//! - 使用 `cli/cite.rs` 定义的 CiteArgs
//! - 使用 `reference/` 模块

use crate::cli::cite::CiteArgs;
use crate::error::Result;
use crate::reference::{CrossrefResolver, ReferenceResolver};
use crate::utils::{output, progress};

/// 执行 cite 命令
pub fn execute(args: CiteArgs) -> Result<()> {
    let resolver = CrossrefResolver::new(args.lookup.config())?;

    for doi in &args.dois {
        let spinner = progress::create_spinner(&format!("Looking up {}", doi));
        let reference = resolver.resolve(doi);
        spinner.finish_and_clear();

        match reference {
            Some(reference) => {
                output::print_success(doi);
                println!("    {}", reference.citation);
                if let Some(date) = reference.date {
                    println!("    Published: {}", date.format("%Y-%m-%d"));
                }
            }
            None => output::print_warning(&format!("No reference found for '{}'", doi)),
        }
    }

    Ok(())
}
