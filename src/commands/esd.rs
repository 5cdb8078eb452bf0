//! # esd 子命令实现
//!
//! - `round`: 按 esd 有效数字舍入并以表格显示
//! - `parse`: 拆分 `343.44(45)` 写法
//! - `format`: 合并为 `343.44(45)` 写法，可先舍入
//!
//! ## 依赖关系
//! - 使用 `cli/esd.rs` 定义的参数
//! - 使用 `uncertainty/` 模块

use crate::cli::esd::{EsdArgs, EsdCommands, FormatArgs, NumbersArgs, ParseArgs};
use crate::error::Result;
use crate::uncertainty::{self, RoundedNumber};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 舍入结果表格行
#[derive(Debug, Clone, Tabled)]
struct RoundRow {
    #[tabled(rename = "Value")]
    value: f64,
    #[tabled(rename = "ESD")]
    esd: f64,
    #[tabled(rename = "Rounded value")]
    rounded_value: RoundedNumber,
    #[tabled(rename = "Rounded ESD")]
    rounded_esd: RoundedNumber,
    #[tabled(rename = "Notation")]
    notation: String,
}

/// 执行 esd 命令
pub fn execute(args: EsdArgs) -> Result<()> {
    match args.command {
        EsdCommands::Round(args) => execute_round(args),
        EsdCommands::Parse(args) => execute_parse(args),
        EsdCommands::Format(args) => execute_format(args),
    }
}

fn execute_round(args: NumbersArgs) -> Result<()> {
    let (values, esds) = uncertainty::round_number_esd(&args.numbers, &args.esds)?;
    let notation = uncertainty::mr_to_hr(&values, &esds)?;

    let rows: Vec<RoundRow> = args
        .numbers
        .iter()
        .zip(args.esds.iter())
        .zip(values.into_iter().zip(esds))
        .zip(notation)
        .map(|(((value, esd), (rounded_value, rounded_esd)), notation)| RoundRow {
            value: *value,
            esd: *esd,
            rounded_value,
            rounded_esd,
            notation,
        })
        .collect();

    println!("{}", Table::new(&rows));
    Ok(())
}

fn execute_parse(args: ParseArgs) -> Result<()> {
    let (numbers, esds) = uncertainty::hr_to_mr(&args.values)?;

    for ((text, number), esd) in args.values.iter().zip(numbers).zip(esds) {
        println!("{}\t{}\t{}", text, number, esd);
    }
    Ok(())
}

fn execute_format(args: FormatArgs) -> Result<()> {
    let NumbersArgs { numbers, esds } = args.numbers;
    let formatted = format_numbers(&numbers, &esds, args.round)?;

    if formatted.is_empty() {
        output::print_warning("Nothing to format.");
    }
    for line in formatted {
        println!("{}", line);
    }
    Ok(())
}

/// 合并为人类可读写法，`round` 为真时先按 esd 舍入
fn format_numbers(numbers: &[f64], esds: &[f64], round: bool) -> Result<Vec<String>> {
    if round {
        let (values, esds) = uncertainty::round_number_esd(numbers, esds)?;
        uncertainty::mr_to_hr(&values, &esds)
    } else {
        uncertainty::mr_to_hr(numbers, esds)
    }
}
