//! Observation ingest and validation.
//!
//! Turns a CSV or JSON file into a clean list of `Observation`s:
//!
//! - CSV: header row with `date` and `value` (case-insensitive, extra columns ignored)
//! - JSON: one object mapping `YYYY-MM-DD` to a number
//!
//! Dates must parse and values must be finite numbers before anything reaches
//! the aggregator. What happens to a bad row is decided by `InvalidPolicy`.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{InputFormat, InvalidPolicy, Observation, RunConfig};
use crate::error::{AppError, InputError};
use crate::weekly::parse_date;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based file line for CSV input; `None` for JSON entries.
    pub line: Option<usize>,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Ingest output: usable observations + what was dropped.
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedData {
    pub fn rows_used(&self) -> usize {
        self.observations.len()
    }
}

/// Load observations from `config.input_path`.
pub fn load_observations(config: &RunConfig) -> Result<IngestedData, AppError> {
    let path = &config.input_path;
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open input '{}': {e}", path.display())))?;

    let format = resolve_format(config.input_format, path);
    let data = match format {
        InputFormat::Json => read_json(file, config.on_invalid)?,
        _ => read_csv(file, config.on_invalid)?,
    };

    info!(
        path = %path.display(),
        format = ?format,
        rows_read = data.rows_read,
        rows_used = data.rows_used(),
        "loaded observations"
    );
    Ok(data)
}

/// `Auto` picks JSON for `.json` files and CSV for everything else.
pub fn resolve_format(format: InputFormat, path: &Path) -> InputFormat {
    match format {
        InputFormat::Auto => {
            let is_json = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            if is_json { InputFormat::Json } else { InputFormat::Csv }
        }
        other => other,
    }
}

/// Read `date,value` rows from any CSV source.
pub fn read_csv<R: Read>(source: R, policy: InvalidPolicy) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    let date_idx = required_column(&header_map, "date")?;
    let value_idx = required_column(&header_map, "value")?;

    let mut data = IngestedData::default();
    let mut seen = HashSet::new();

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        data.rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| {
                parse_record(&record, date_idx, value_idx, &mut seen).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(obs) => data.observations.push(obs),
            Err(message) => reject(&mut data, policy, RowError { line: Some(line), message })?,
        }
    }

    ensure_some_rows_used(&data)?;
    Ok(data)
}

/// Read a `{ "YYYY-MM-DD": number }` object from any JSON source.
///
/// A date key that appears twice is rejected, as in CSV input.
pub fn read_json<R: Read>(source: R, policy: InvalidPolicy) -> Result<IngestedData, AppError> {
    let JsonEntries(entries) = serde_json::from_reader::<_, JsonEntries>(source)
        .map_err(|e| AppError::new(2, format!("Invalid JSON input: {e}")))?;

    let mut data = IngestedData::default();
    let mut seen = HashSet::new();

    for (key, value) in &entries {
        data.rows_read += 1;
        match parse_entry(key, value, &mut seen) {
            Ok(obs) => data.observations.push(obs),
            Err(e) => reject(
                &mut data,
                policy,
                RowError {
                    line: None,
                    message: e.to_string(),
                },
            )?,
        }
    }

    ensure_some_rows_used(&data)?;
    Ok(data)
}

/// Object entries in document order, duplicate keys included.
///
/// `serde_json::Map` keeps only the last value for a repeated key.
struct JsonEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for JsonEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(JsonEntriesVisitor)
    }
}

struct JsonEntriesVisitor;

impl<'de> Visitor<'de> for JsonEntriesVisitor {
    type Value = JsonEntries;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("an object mapping YYYY-MM-DD dates to numbers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonEntries, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
            entries.push(entry);
        }
        Ok(JsonEntries(entries))
    }
}

fn parse_record(
    record: &StringRecord,
    date_idx: usize,
    value_idx: usize,
    seen: &mut HashSet<NaiveDate>,
) -> Result<Observation, InputError> {
    let raw_date = record.get(date_idx).unwrap_or("");
    let date = parse_date(raw_date)?;
    let raw_value = record.get(value_idx).unwrap_or("");
    let value = parse_value(raw_date, raw_value)?;

    if !seen.insert(date) {
        return Err(InputError::DuplicateDate {
            date: date.to_string(),
        });
    }
    Ok(Observation::new(date, value))
}

fn parse_entry(
    key: &str,
    value: &Value,
    seen: &mut HashSet<NaiveDate>,
) -> Result<Observation, InputError> {
    let date = parse_date(key)?;
    let number = value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::NonNumeric {
            date: key.to_string(),
            raw: value.to_string(),
        })?;

    if !seen.insert(date) {
        return Err(InputError::DuplicateDate {
            date: date.to_string(),
        });
    }
    Ok(Observation::new(date, number))
}

fn parse_value(date: &str, raw: &str) -> Result<f64, InputError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::NonNumeric {
            date: date.to_string(),
            raw: raw.to_string(),
        })
}

fn reject(data: &mut IngestedData, policy: InvalidPolicy, err: RowError) -> Result<(), AppError> {
    match policy {
        InvalidPolicy::Abort => Err(AppError::new(2, err.to_string())),
        InvalidPolicy::Skip => {
            warn!(row = %err, "skipping invalid observation");
            data.row_errors.push(err);
            Ok(())
        }
    }
}

/// An empty file is fine (all-missing week); a file where every row was bad is not.
fn ensure_some_rows_used(data: &IngestedData) -> Result<(), AppError> {
    if data.rows_read > 0 && data.rows_used() == 0 {
        return Err(AppError::new(
            3,
            format!("No valid observations remain ({} rows rejected).", data.row_errors.len()),
        ));
    }
    Ok(())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn required_column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| AppError::new(2, format!("Missing required column: `{name}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Weekday;

    #[test]
    fn csv_with_bom_and_extra_columns() {
        let input = "\u{feff}Date,Note,VALUE\n2020-01-06,first,5\n2020-01-13,,10.5\n";
        let data = read_csv(input.as_bytes(), InvalidPolicy::Abort).unwrap();
        assert_eq!(data.rows_read, 2);
        assert_eq!(data.rows_used(), 2);
        assert_eq!(data.observations[1].value, 10.5);
        assert_eq!(data.observations[0].weekday(), Weekday::Mon);
    }

    #[test]
    fn csv_missing_value_column_is_a_usage_error() {
        let err = read_csv("date,amount\n2020-01-06,1\n".as_bytes(), InvalidPolicy::Abort).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("value"));
    }

    #[test]
    fn abort_policy_stops_on_bad_date() {
        let input = "date,value\n2020-01-06,1\n2020/01/07,2\n";
        let err = read_csv(input.as_bytes(), InvalidPolicy::Abort).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("line 3:"));
    }

    #[test]
    fn skip_policy_collects_row_errors() {
        let input = "date,value\n2020-01-06,1\nnot-a-date,2\n2020-01-07,abc\n2020-01-06,3\n2020-01-08,4\n";
        let data = read_csv(input.as_bytes(), InvalidPolicy::Skip).unwrap();
        assert_eq!(data.rows_read, 5);
        assert_eq!(data.rows_used(), 2);
        assert_eq!(data.row_errors.len(), 3);
        assert!(data.row_errors[1].message.contains("abc"));
        assert!(data.row_errors[2].message.contains("more than once"));
    }

    #[test]
    fn skip_policy_with_nothing_usable_fails() {
        let input = "date,value\nbad,1\n";
        let err = read_csv(input.as_bytes(), InvalidPolicy::Skip).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn empty_csv_is_not_an_error() {
        let data = read_csv("date,value\n".as_bytes(), InvalidPolicy::Abort).unwrap();
        assert_eq!(data.rows_read, 0);
        assert!(data.observations.is_empty());
    }

    #[test]
    fn non_finite_csv_value_is_rejected() {
        let input = "date,value\n2020-01-06,NaN\n";
        let err = read_csv(input.as_bytes(), InvalidPolicy::Abort).unwrap_err();
        assert!(err.to_string().contains("not a finite number"));
    }

    #[test]
    fn json_object_is_read() {
        let input = r#"{ "2020-01-01": 4, "2020-01-08": -2.5 }"#;
        let data = read_json(input.as_bytes(), InvalidPolicy::Abort).unwrap();
        assert_eq!(data.rows_used(), 2);
        let total: f64 = data.observations.iter().map(|o| o.value).sum();
        assert_eq!(total, 1.5);
    }

    #[test]
    fn json_string_value_is_a_type_error() {
        let input = r#"{ "2020-01-01": "4" }"#;
        let err = read_json(input.as_bytes(), InvalidPolicy::Abort).unwrap_err();
        assert!(err.to_string().contains("not a finite number"));
    }

    #[test]
    fn json_repeated_date_key_is_rejected() {
        let input = r#"{ "2020-01-06": 1, "2020-01-06": 2 }"#;
        let err = read_json(input.as_bytes(), InvalidPolicy::Abort).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("2020-01-06 appears more than once"));
    }

    #[test]
    fn json_repeated_date_key_is_skipped_keeping_the_first() {
        let input = r#"{ "2020-01-06": 1, "2020-01-07": 5, "2020-01-06": 2 }"#;
        let data = read_json(input.as_bytes(), InvalidPolicy::Skip).unwrap();
        assert_eq!(data.rows_read, 3);
        assert_eq!(data.rows_used(), 2);
        assert_eq!(data.observations[0].value, 1.0);
        assert_eq!(data.row_errors.len(), 1);
    }

    #[test]
    fn json_unpadded_date_key_is_rejected() {
        let input = r#"{ "2020-1-6": 1 }"#;
        let err = read_json(input.as_bytes(), InvalidPolicy::Abort).unwrap_err();
        assert!(err.to_string().contains("Invalid date '2020-1-6'"));
    }

    #[test]
    fn json_must_be_an_object() {
        let err = read_json("[1, 2]".as_bytes(), InvalidPolicy::Abort).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn auto_format_follows_extension() {
        assert_eq!(resolve_format(InputFormat::Auto, Path::new("w.JSON")), InputFormat::Json);
        assert_eq!(resolve_format(InputFormat::Auto, Path::new("w.csv")), InputFormat::Csv);
        assert_eq!(resolve_format(InputFormat::Auto, Path::new("week")), InputFormat::Csv);
        assert_eq!(resolve_format(InputFormat::Json, Path::new("w.csv")), InputFormat::Json);
    }
}
