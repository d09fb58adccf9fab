//! Error types.
//!
//! - `InputError`: what went wrong with a single observation (bad date, bad value).
//! - `AppError`: what the `wk` binary reports, with the process exit code to use.

use std::fmt;

/// A problem with one input observation.
///
/// `InvalidDate` is the parse error of the string-keyed API; `NonNumeric` is the
/// type error raised at the ingest boundary before aggregation starts.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    InvalidDate { input: String },
    NonNumeric { date: String, raw: String },
    DuplicateDate { date: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::InvalidDate { input } => {
                write!(f, "Invalid date '{input}'. Expected YYYY-MM-DD.")
            }
            InputError::NonNumeric { date, raw } => {
                write!(f, "Value for {date} is not a finite number: '{raw}'.")
            }
            InputError::DuplicateDate { date } => {
                write!(f, "Date {date} appears more than once.")
            }
        }
    }
}

impl std::error::Error for InputError {}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_map_to_usage_exit_code() {
        let err: AppError = InputError::InvalidDate {
            input: "2020-13-01".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("2020-13-01"));
    }
}
