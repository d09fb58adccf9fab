//! The `wk week` pipeline: ingest -> aggregate -> fill.
//!
//! Printing and exporting stay in `app`; this returns the computed outputs.

use tracing::info;

use crate::domain::{RunConfig, WeeklyResult};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_observations};
use crate::weekly::aggregate_week;

/// All computed outputs of a single `wk week` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub result: WeeklyResult,
}

/// Load the configured input and aggregate it.
pub fn run_week(config: &RunConfig) -> Result<RunOutput, AppError> {
    let ingest = load_observations(config)?;
    Ok(run_week_with_data(ingest))
}

/// Aggregate already-ingested observations.
pub fn run_week_with_data(ingest: IngestedData) -> RunOutput {
    let result = aggregate_week(&ingest.observations);
    info!(
        anchors = result.anchor_count(),
        interpolated = result.interpolated_count(),
        complete = result.is_complete(),
        "week aggregated"
    );
    RunOutput { ingest, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InputFormat, InvalidPolicy, Weekday};
    use crate::io::ingest::read_csv;
    use std::path::PathBuf;

    #[test]
    fn csv_rows_flow_through_to_the_week() {
        let input = "date,value\n2020-01-01,6\n2020-01-04,12\n2020-01-05,14\n2020-01-06,2\n2020-01-07,4\n";
        let ingest = read_csv(input.as_bytes(), InvalidPolicy::Abort).unwrap();
        let run = run_week_with_data(ingest);
        assert_eq!(run.result.get(Weekday::Thu), Some(8.0));
        assert_eq!(run.result.get(Weekday::Fri), Some(10.0));
        assert_eq!(run.ingest.rows_used(), 5);
    }

    #[test]
    fn missing_input_file_is_a_usage_error() {
        let config = RunConfig {
            input_path: PathBuf::from("/nonexistent/weekfill/input.csv"),
            input_format: InputFormat::Auto,
            on_invalid: InvalidPolicy::Abort,
            precision: 4,
            export: None,
        };
        let err = run_week(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
