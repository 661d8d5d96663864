use std::{error::Error, fs, process::ExitCode};

use clap::Parser;
use sasc::report::Report;

/// Builds the LR(0) or SLR(1) table of a grammar and traces the parse of an input.
#[derive(clap::Parser)]
#[clap(version, about)]
struct AppArgs {
    /// lr0 or slr
    #[clap(short, long, default_value = "slr")]
    analysis: String,

    /// Print the report as JSON
    #[clap(long)]
    json: bool,

    /// Fail when the table has conflicts
    #[clap(long)]
    deny_conflicts: bool,

    /// Productions such as "E->E+T. E->T. T->id.", or @path
    grammar: String,

    /// The input to parse, or @path
    input: String,
}

fn read_argument(value: &str) -> std::io::Result<String> {
    match value.strip_prefix('@') {
        Some(path) => fs::read_to_string(path),
        None => Ok(value.to_string()),
    }
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::init();

    let args = AppArgs::parse();
    let grammar = read_argument(&args.grammar)?;
    let input = read_argument(&args.input)?;

    let report = Report::analyze(&grammar, &args.analysis, &input);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for production in &report.grammar {
            println!("{}", production);
        }
        println!();

        if let Some(table) = &report.parsing_table {
            println!("{} table:", table.analysis);
            println!("{}", table);
            for conflict in &table.conflicts {
                println!("{}", conflict);
            }
        }

        if !report.steps.is_empty() {
            println!("{}", report.steps);
        }

        if let Some(error) = &report.error {
            eprintln!("error[{}]: {}", error.kind, error.details);
        }
    }

    if args.deny_conflicts && report.has_conflicts() {
        log::error!("the table has conflicts");
        return Ok(ExitCode::FAILURE);
    }

    Ok(if report.is_accepted() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
