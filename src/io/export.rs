//! Export a weekly result to CSV or JSON.
//!
//! - CSV: one row per weekday (`day,value,kind,observations`), empty value when missing
//! - JSON: `{ "Mon": 1.0, ..., "Sun": null }`

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::domain::WeeklyResult;
use crate::error::AppError;

/// Write `result` to `path`, choosing JSON for `.json` and CSV otherwise.
pub fn export_result(path: &Path, result: &WeeklyResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export '{}': {e}", path.display())))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        write_result_json(file, result)?;
    } else {
        write_result_csv(file, result)?;
    }

    info!(path = %path.display(), "exported weekly result");
    Ok(())
}

pub fn write_result_csv<W: Write>(mut out: W, result: &WeeklyResult) -> Result<(), AppError> {
    writeln!(out, "day,value,kind,observations")
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for (day, value) in result.iter() {
        writeln!(
            out,
            "{},{},{},{}",
            day.label(),
            value.value().map(|v| v.to_string()).unwrap_or_default(),
            value.kind_label(),
            result.counts[day.index()],
        )
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}

pub fn write_result_json<W: Write>(out: W, result: &WeeklyResult) -> Result<(), AppError> {
    serde_json::to_writer_pretty(out, result)
        .map_err(|e| AppError::new(4, format!("Failed to write export JSON: {e}")))
}
