//! The weekly aggregator.
//!
//! Two phases, each usable on its own:
//!
//! - `aggregate`: sum observations per weekday (`WeekTotals`)
//! - `fill_gaps`: circular linear interpolation between anchors
//!
//! `aggregate_week` runs both on typed observations; `aggregate_dated` is the
//! string-keyed entry point and fails on the first unparseable date.

pub mod aggregate;
pub mod fill;

pub use aggregate::*;
pub use fill::*;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Observation, WeeklyResult};
use crate::error::InputError;

/// Only ISO calendar dates are accepted.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Aggregate and gap-fill a set of observations.
pub fn aggregate_week(observations: &[Observation]) -> WeeklyResult {
    let totals = aggregate(observations);
    let days = fill_gaps(&totals);
    let result = WeeklyResult {
        days,
        counts: totals.counts,
    };

    debug!(
        observations = observations.len(),
        anchors = result.anchor_count(),
        interpolated = result.interpolated_count(),
        "aggregated week"
    );

    result
}

/// Aggregate `(YYYY-MM-DD, value)` pairs.
///
/// Aborts on the first bad date or non-finite value; nothing is aggregated in
/// that case.
pub fn aggregate_dated<'a, I>(entries: I) -> Result<WeeklyResult, InputError>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let observations = entries
        .into_iter()
        .map(|(date, value)| {
            let date_parsed = parse_date(date)?;
            if !value.is_finite() {
                return Err(InputError::NonNumeric {
                    date: date.to_string(),
                    raw: value.to_string(),
                });
            }
            Ok(Observation::new(date_parsed, value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(aggregate_week(&observations))
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// chrono alone accepts unpadded fields and signed years, so the shape is
/// checked first: exactly `dddd-dd-dd`.
pub fn parse_date(s: &str) -> Result<NaiveDate, InputError> {
    let invalid = || InputError::InvalidDate {
        input: s.to_string(),
    };

    let trimmed = s.trim();
    if !is_iso_date_shape(trimmed) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

fn is_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
