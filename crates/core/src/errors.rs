//! Core error types for project investment analysis.
//!
//! Only structural problems surface as errors. Numerical degeneracy inside the
//! metric calculators (no sign change, diverging root search, zero bases) is
//! reported through sentinel values and status fields instead.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Message rendered to presentation layers when a project has no records.
pub const INSUFFICIENT_DATA_MESSAGE: &str = "insufficient data for this project";

/// Root error type for the analysis engine.
#[derive(Error, Debug)]
pub enum Error {
    /// The project has no financial records, so nothing can be computed.
    #[error("insufficient data for this project")]
    InsufficientData { project_id: String },

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Raised by data-access collaborators; the message is storage-agnostic.
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Calculation failed: {0}")]
    Calculation(#[from] CalculatorError),
}

impl Error {
    /// True when the error is the "no financial records" condition that
    /// callers render as a structured error result.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Error::InsufficientData { .. })
    }
}

/// Errors raised while assembling cash flows.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Period {0} is not part of the period index")]
    UnknownPeriod(String),

    #[error("Cash flow assembly failed: {0}")]
    CashFlow(String),

    #[error("{0} exceeds the supported decimal range")]
    Overflow(String),
}

/// Validation errors for period keys, records and numeric input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid period '{0}': expected YYYY-MM-DD or year.month")]
    InvalidPeriod(String),

    #[error("Mixed period formats in one project: '{first}' and '{second}'")]
    MixedPeriodFormats { first: String, second: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse date: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfigValue(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_renders_user_message() {
        let err = Error::InsufficientData {
            project_id: "p-1".to_string(),
        };
        assert_eq!(err.to_string(), INSUFFICIENT_DATA_MESSAGE);
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn overflow_names_the_quantity() {
        let err: Error = CalculatorError::Overflow("projected revenue".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Calculation failed: projected revenue exceeds the supported decimal range"
        );
        assert!(!err.is_insufficient_data());
    }

    #[test]
    fn chrono_errors_become_validation_errors() {
        let parse_err = chrono::NaiveDate::parse_from_str("nope", "%Y-%m-%d").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::DateTimeParse(_))
        ));
        assert!(!err.is_insufficient_data());
    }
}
