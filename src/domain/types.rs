//! Shared domain types.
//!
//! These types are intentionally small and `Copy` where possible so the
//! aggregator can work on fixed arrays instead of maps:
//!
//! - `Weekday` indexes every per-day array (`[T; 7]`)
//! - `DayValue` keeps track of where a number came from
//! - `WeeklyResult` is always exactly seven entries, Mon → Sun

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Number of days in the canonical week.
pub const DAYS: usize = 7;

/// Day of the week, in canonical (ISO) order starting Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; DAYS] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Monday = 0 … Sunday = 6.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of `index`, wrapping modulo 7.
    pub fn from_index(idx: usize) -> Weekday {
        Weekday::ALL[idx % DAYS]
    }

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// Weekday of a proleptic Gregorian date. No time zone is involved.
    pub fn from_date(date: NaiveDate) -> Weekday {
        Weekday::from_index(date.weekday().num_days_from_monday() as usize)
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One dated input value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    pub fn weekday(&self) -> Weekday {
        Weekday::from_date(self.date)
    }
}

/// Value of a single weekday in the output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DayValue {
    /// Sum of the source observations for this weekday (an anchor).
    Observed(f64),
    /// Linearly interpolated between the surrounding anchors.
    Interpolated(f64),
    /// No data and nothing to interpolate from.
    #[default]
    Missing,
}

impl DayValue {
    pub fn value(self) -> Option<f64> {
        match self {
            DayValue::Observed(v) | DayValue::Interpolated(v) => Some(v),
            DayValue::Missing => None,
        }
    }

    pub fn is_anchor(self) -> bool {
        matches!(self, DayValue::Observed(_))
    }

    pub fn kind_label(self) -> &'static str {
        match self {
            DayValue::Observed(_) => "observed",
            DayValue::Interpolated(_) => "interpolated",
            DayValue::Missing => "missing",
        }
    }
}

/// Aggregated + gap-filled week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyResult {
    pub days: [DayValue; DAYS],
    /// How many source observations landed on each weekday.
    pub counts: [usize; DAYS],
}

impl WeeklyResult {
    pub fn get(&self, day: Weekday) -> Option<f64> {
        self.days[day.index()].value()
    }

    pub fn day(&self, day: Weekday) -> DayValue {
        self.days[day.index()]
    }

    /// `(weekday, value)` pairs in Mon → Sun order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, DayValue)> + '_ {
        Weekday::ALL.iter().map(|&d| (d, self.days[d.index()]))
    }

    pub fn anchor_count(&self) -> usize {
        self.days.iter().filter(|d| d.is_anchor()).count()
    }

    pub fn interpolated_count(&self) -> usize {
        self.days
            .iter()
            .filter(|d| matches!(d, DayValue::Interpolated(_)))
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.days.iter().all(|d| d.value().is_some())
    }
}

/// Serialized as `{ "Mon": 1.0, ..., "Sun": null }`, always in Mon → Sun order.
impl Serialize for WeeklyResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DAYS))?;
        for (day, value) in self.iter() {
            map.serialize_entry(day.label(), &value.value())?;
        }
        map.end()
    }
}

/// Input file encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Pick from the file extension (`.json` → JSON, anything else → CSV).
    Auto,
    /// Header row with `date` and `value` columns.
    Csv,
    /// A single object mapping `YYYY-MM-DD` to a number.
    Json,
}

/// What to do with an observation that cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPolicy {
    /// Stop at the first bad row (matches the library API).
    Abort,
    /// Drop bad rows and report them after the table.
    Skip,
}

/// Resolved settings for a `wk week` run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub input_format: InputFormat,
    pub on_invalid: InvalidPolicy,
    pub precision: usize,
    pub export: Option<PathBuf>,
}
