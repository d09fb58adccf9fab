//! `weekfill` library crate.
//!
//! Buckets dated values by weekday, sums same-weekday values, and fills
//! weekdays without data by linear interpolation around the circular week.
//!
//! ```
//! use weekfill::domain::Weekday;
//! use weekfill::weekly::aggregate_dated;
//!
//! let week = aggregate_dated([("2020-01-06", 10.0), ("2020-01-08", 20.0)])?;
//! assert_eq!(week.get(Weekday::Tue), Some(15.0));
//! # Ok::<(), weekfill::error::InputError>(())
//! ```
//!
//! The binary (`wk`) is a thin wrapper around this library.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod weekly;
