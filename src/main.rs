mod cli;
mod config;
mod error;
mod expand;
mod grade_group;
mod inference;
mod mapping;
mod merge;
mod normalize;
mod output;
mod pipeline;
mod preflight;
mod readers;
mod row_ids;
mod types;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands, MergeArgs};
use config::{discover_config, MergeConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use types::{Result, RAW_EXPORT_SKIP_ROWS};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("survey_merge=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Some(Commands::Merge(args)) => run_merge(&args),
        None => run_merge(&MergeArgs::default()),
        Some(Commands::Mappings { raw_file }) => print_mappings(raw_file.as_deref()),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\nError running merge: {}", e);
            eprintln!("\nPlease check your input files and configuration settings.");
            ExitCode::FAILURE
        }
    }
}

fn run_merge(args: &MergeArgs) -> Result<ExitCode> {
    let file = discover_config(args.config.as_deref())?;
    let config = MergeConfig::resolve(file, args.overrides())?;

    let problems = preflight::check_inputs(&config);
    if !problems.is_empty() {
        eprintln!("\nCannot start merge:");
        for problem in &problems {
            eprintln!("  - {}", problem);
        }
        return Ok(ExitCode::FAILURE);
    }

    let today = chrono::Local::now().date_naive();
    let summary = pipeline::combine_survey_data(&config, today)?;
    info!(rows = summary.new_rows, "merge complete");

    output::print_summary(&summary, args.json)?;
    Ok(ExitCode::SUCCESS)
}

fn print_mappings(raw_file: Option<&Path>) -> Result<ExitCode> {
    let headers = match raw_file {
        Some(path) => readers::read_table(path, RAW_EXPORT_SKIP_ROWS)?.headers,
        None => Vec::new(),
    };

    for column in mapping::describe(mapping::column_mappings(), &headers) {
        let found = match (&column.header, raw_file) {
            (Some(header), _) => format!("  [{}]", header),
            (None, Some(_)) => "  [missing]".to_string(),
            (None, None) => String::new(),
        };
        println!(
            "{:>3}  {} / {}{}",
            column.position, column.target.survey, column.target.measure, found
        );
    }

    if raw_file.is_some() {
        mapping::validate_against(mapping::column_mappings(), &headers)?;
    }
    Ok(ExitCode::SUCCESS)
}
