//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the aggregator
//! - prints reports and writes optional exports

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, SampleArgs, WeekArgs};
use crate::domain::RunConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `wk` binary.
pub fn run() -> Result<(), AppError> {
    // A project-local `.env` may set RUST_LOG.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(?cli, "parsed arguments");

    match cli.command {
        Command::Week(args) => handle_week(&args),
        Command::Sample(args) => handle_sample(&args),
    }
}

fn handle_week(args: &WeekArgs) -> Result<(), AppError> {
    let config = run_config_from_args(args);
    let run = pipeline::run_week(&config)?;

    print!("{}", crate::report::format_ingest_summary(&run.ingest));
    println!();
    print!("{}", crate::report::format_week(&run.result, config.precision));

    let rejected = crate::report::format_row_errors(&run.ingest);
    if !rejected.is_empty() {
        println!();
        print!("{rejected}");
    }

    if let Some(path) = &config.export {
        crate::io::export::export_result(path, &run.result)?;
    }

    Ok(())
}

fn handle_sample(args: &SampleArgs) -> Result<(), AppError> {
    let outcomes = crate::data::run_reference_weeks()?;
    let passed = outcomes.iter().filter(|o| o.matches).count();

    for outcome in &outcomes {
        println!(
            "=== {} [{}] ===",
            outcome.week.name,
            if outcome.matches { "ok" } else { "MISMATCH" }
        );
        let expected = outcome
            .week
            .expected
            .iter()
            .map(|v| v.map(|x| format!("{:.*}", args.precision, x)).unwrap_or_else(|| "-".to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Expected (Mon..Sun): {expected}");
        print!("{}", crate::report::format_week(&outcome.result, args.precision));
        println!();
    }

    println!("{passed}/{} reference weeks match", outcomes.len());
    crate::data::check_reference_outcomes(&outcomes)
}

pub fn run_config_from_args(args: &WeekArgs) -> RunConfig {
    RunConfig {
        input_path: args.input.clone(),
        input_format: args.format,
        on_invalid: args.on_invalid,
        precision: args.precision,
        export: args.export.clone(),
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "weekfill=info",
        1 => "weekfill=debug",
        _ => "weekfill=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
