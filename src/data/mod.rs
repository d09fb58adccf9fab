//! Built-in data sets.

pub mod sample;

pub use sample::*;
