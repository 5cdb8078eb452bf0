//! # powder-match - 粉末衍射图样文献匹配工具
//!
//! 将实测粉末 X 射线衍射图样与文献参考图样对齐、评分并排名，
//! 同时处理晶体学文献中 "数值(esd)" 形式的测量不确定度。
//!
//! ## 子命令
//! - `compare` - 比较实测图样与单个文献图样
//! - `rank`    - 对一批文献图样评分并排名，可查询参考文献
//! - `esd`     - 数值(esd) 写法的解析、格式化与舍入
//! - `cite`    - 按 DOI 查询参考文献
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/          (命令行参数定义)
//!   ├── commands/     (命令执行逻辑)
//!   │     ├── parsers/     (XY 数据解析)
//!   │     ├── models/      (图样与单位模型)
//!   │     ├── xrd/         (换算、重采样、相似度、导出)
//!   │     ├── uncertainty/ (esd 写法与舍入)
//!   │     ├── reference/   (文献查询)
//!   │     └── batch/       (并行批处理)
//!   ├── utils/        (工具函数)
//!   └── error.rs      (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod reference;
mod uncertainty;
mod utils;
mod xrd;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

/// 初始化日志，`RUST_LOG` 优先于 `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "powder_match=debug" } else { "powder_match=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
