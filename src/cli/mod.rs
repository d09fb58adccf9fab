//! Command-line parsing for the weekday aggregator.
//!
//! Argument parsing stays here; the aggregation code never sees clap types.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::{InputFormat, InvalidPolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "wk", version, about = "Weekday aggregation with circular gap filling")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate a file of dated values by weekday and fill the gaps.
    Week(WeekArgs),
    /// Run the built-in reference weeks and show expected vs computed values.
    Sample(SampleArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct WeekArgs {
    /// CSV (`date,value` columns) or JSON (`{"YYYY-MM-DD": number}`) file.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Input encoding.
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// What to do with rows that have a bad date or value.
    #[arg(long, value_enum, default_value_t = InvalidPolicy::Abort)]
    pub on_invalid: InvalidPolicy,

    /// Decimals shown in the table.
    #[arg(long, default_value_t = 4)]
    pub precision: usize,

    /// Write the result to CSV or JSON (chosen by extension).
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Decimals shown in the tables.
    #[arg(long, default_value_t = 4)]
    pub precision: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_defaults() {
        let cli = Cli::parse_from(["wk", "week", "data.csv"]);
        let Command::Week(args) = cli.command else {
            panic!("expected week subcommand");
        };
        assert_eq!(args.input, PathBuf::from("data.csv"));
        assert_eq!(args.format, InputFormat::Auto);
        assert_eq!(args.on_invalid, InvalidPolicy::Abort);
        assert_eq!(args.precision, 4);
        assert!(args.export.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn week_flags() {
        let cli = Cli::parse_from([
            "wk",
            "-vv",
            "week",
            "in.txt",
            "--format",
            "json",
            "--on-invalid",
            "skip",
            "--export",
            "out.json",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Week(args) = cli.command else {
            panic!("expected week subcommand");
        };
        assert_eq!(args.format, InputFormat::Json);
        assert_eq!(args.on_invalid, InvalidPolicy::Skip);
        assert_eq!(args.export, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(Cli::try_parse_from(["wk", "week", "a.csv", "--on-invalid", "ignore"]).is_err());
    }
}
