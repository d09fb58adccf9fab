//! Formatted terminal output.
//!
//! Kept apart from the aggregator so the numbers stay testable and output
//! changes are localized.

use crate::domain::{DAYS, DayValue, WeeklyResult};
use crate::io::ingest::IngestedData;

/// Weekday table, Mon → Sun.
pub fn format_week(result: &WeeklyResult, precision: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:<4} {:>14}  {:<12} {:>4}\n", "Day", "Value", "Source", "Obs"));
    out.push_str(&format!("{}\n", "-".repeat(38)));

    for (day, value) in result.iter() {
        let shown = match value {
            DayValue::Missing => "-".to_string(),
            other => format!("{:.*}", precision, other.value().unwrap_or(f64::NAN)),
        };
        out.push_str(&format!(
            "{:<4} {:>14}  {:<12} {:>4}\n",
            day.label(),
            shown,
            value.kind_label(),
            result.counts[day.index()],
        ));
    }

    out.push_str(&format!(
        "\nAnchors: {} | Interpolated: {} | Missing: {}\n",
        result.anchor_count(),
        result.interpolated_count(),
        DAYS - result.anchor_count() - result.interpolated_count(),
    ));
    if result.anchor_count() == 1 {
        out.push_str("Only one weekday has data; nothing to interpolate from.\n");
    }

    out
}

/// One-line ingest summary.
pub fn format_ingest_summary(data: &IngestedData) -> String {
    format!(
        "Rows: read={} used={} rejected={}\n",
        data.rows_read,
        data.rows_used(),
        data.row_errors.len()
    )
}

/// List of rejected rows (empty string when nothing was rejected).
pub fn format_row_errors(data: &IngestedData) -> String {
    if data.row_errors.is_empty() {
        return String::new();
    }

    let mut out = String::from("Rejected rows:\n");
    for err in &data.row_errors {
        out.push_str(&format!("  {err}\n"));
    }
    out
}
