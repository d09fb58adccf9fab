//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the canonical week (`Weekday`, `DAYS`)
//! - input points (`Observation`) and outputs (`DayValue`, `WeeklyResult`)
//! - run configuration (`RunConfig`, `InputFormat`, `InvalidPolicy`)

pub mod types;

pub use types::*;
