//! Built-in reference weeks with known answers.
//!
//! Used by `wk sample` to show the aggregator on small, hand-checkable inputs.

use crate::domain::{DAYS, WeeklyResult};
use crate::error::AppError;
use crate::weekly::aggregate_dated;

/// Absolute tolerance when comparing interpolated values.
const TOLERANCE: f64 = 1e-9;

/// Exit code for `wk sample` when a computed week differs from its expectation.
pub const MISMATCH_EXIT_CODE: u8 = 5;

#[derive(Debug, Clone, Copy)]
pub struct ReferenceWeek {
    pub name: &'static str,
    pub entries: &'static [(&'static str, f64)],
    /// Expected value per weekday, Mon → Sun.
    pub expected: [Option<f64>; DAYS],
}

#[derive(Debug, Clone)]
pub struct ReferenceOutcome {
    pub week: ReferenceWeek,
    pub result: WeeklyResult,
    pub matches: bool,
}

pub const REFERENCE_WEEKS: [ReferenceWeek; 5] = [
    ReferenceWeek {
        name: "full week, repeated Wednesday",
        entries: &[
            ("2020-01-01", 4.0),
            ("2020-01-02", 4.0),
            ("2020-01-03", 6.0),
            ("2020-01-04", 8.0),
            ("2020-01-05", 2.0),
            ("2020-01-06", -6.0),
            ("2020-01-07", 2.0),
            ("2020-01-08", -2.0),
        ],
        expected: [Some(-6.0), Some(2.0), Some(2.0), Some(4.0), Some(6.0), Some(8.0), Some(2.0)],
    },
    ReferenceWeek {
        name: "Thursday and Friday missing",
        entries: &[
            ("2020-01-01", 6.0),
            ("2020-01-04", 12.0),
            ("2020-01-05", 14.0),
            ("2020-01-06", 2.0),
            ("2020-01-07", 4.0),
        ],
        expected: [Some(2.0), Some(4.0), Some(6.0), Some(8.0), Some(10.0), Some(12.0), Some(14.0)],
    },
    ReferenceWeek {
        name: "Monday to Sunday line",
        entries: &[("2020-01-06", 10.0), ("2020-01-12", 20.0)],
        expected: [
            Some(10.0),
            Some(10.0 + 10.0 / 6.0),
            Some(10.0 + 20.0 / 6.0),
            Some(15.0),
            Some(10.0 + 40.0 / 6.0),
            Some(10.0 + 50.0 / 6.0),
            Some(20.0),
        ],
    },
    ReferenceWeek {
        name: "two weeks of Mondays and Tuesdays",
        entries: &[
            ("2020-01-06", 5.0),
            ("2020-01-13", 10.0),
            ("2020-01-07", 3.0),
            ("2020-01-14", 7.0),
        ],
        // Tue=10 -> Mon=15 across five missing days, step 5/6.
        expected: [
            Some(15.0),
            Some(10.0),
            Some(10.0 + 5.0 / 6.0),
            Some(10.0 + 10.0 / 6.0),
            Some(12.5),
            Some(10.0 + 20.0 / 6.0),
            Some(10.0 + 25.0 / 6.0),
        ],
    },
    ReferenceWeek {
        name: "single anchor",
        entries: &[("2020-01-09", 5.0)],
        expected: [None, None, None, Some(5.0), None, None, None],
    },
];

/// Run every reference week through the aggregator.
pub fn run_reference_weeks() -> Result<Vec<ReferenceOutcome>, AppError> {
    REFERENCE_WEEKS
        .iter()
        .map(|week| {
            let result = aggregate_dated(week.entries.iter().copied())?;
            let matches = result
                .days
                .iter()
                .zip(week.expected)
                .all(|(got, want)| approx_eq(got.value(), want));
            Ok(ReferenceOutcome {
                week: *week,
                result,
                matches,
            })
        })
        .collect()
}

/// Fail with `MISMATCH_EXIT_CODE` if any reference week did not match.
pub fn check_reference_outcomes(outcomes: &[ReferenceOutcome]) -> Result<(), AppError> {
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| !o.matches)
        .map(|o| o.week.name)
        .collect();
    if failed.is_empty() {
        return Ok(());
    }
    Err(AppError::new(
        MISMATCH_EXIT_CODE,
        format!("Reference weeks did not match: {}.", failed.join(", ")),
    ))
}

fn approx_eq(got: Option<f64>, want: Option<f64>) -> bool {
    match (got, want) {
        (Some(a), Some(b)) => (a - b).abs() < TOLERANCE,
        (None, None) => true,
        _ => false,
    }
}
