//! Error types for the sales_forecast crate
//!
//! Every variant is terminal for the current pipeline run. Nothing is
//! retried and no partial forecast is ever returned.

use chrono::NaiveDate;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A required column is absent from the table header
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    /// The table has a header but no data rows
    #[error("Input table has no rows")]
    EmptyInput,

    /// Rows whose date cell could not be parsed (0-based data row indices)
    #[error("Unparseable dates in rows {0:?}")]
    InvalidDateRows(Vec<usize>),

    /// Rows whose value cell is missing or not numeric (0-based data row indices)
    #[error("Non-numeric values in rows {0:?}")]
    InvalidValueRows(Vec<usize>),

    /// Too few rows survived after dropping invalid ones
    #[error("Only {valid} valid rows remain after dropping invalid rows, need at least {required}")]
    InsufficientValidRows { valid: usize, required: usize },

    /// Two rows share the same date
    #[error("Duplicate timestamp {0}")]
    DuplicateTimestamp(NaiveDate),

    /// The normalized series is too short to fit any model
    #[error("Series has {found} observations, need at least {required}")]
    TooFewObservations { found: usize, required: usize },

    /// The sampling period could not be inferred from the dates
    #[error("Cannot infer a sampling period: {0}")]
    UndeterminedPeriod(String),

    /// Forecast horizon must be positive
    #[error("Forecast horizon must be greater than zero")]
    InvalidHorizon,

    /// A forecast component does not have one element per horizon step
    #[error("Expected {expected} {what}, got {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Calendar arithmetic left the representable date range
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// Whatever the fitting capability reported
    #[error("Model fitting failed: {0}")]
    ModelFittingFailed(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from reading or writing CSV
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from parsing a JSON configuration
    #[error("Config error: {0}")]
    ConfigError(#[from] serde_json::Error),

    /// Error from series math helpers
    #[error("Math error: {0}")]
    MathError(#[from] series_math::MathError),

    /// Error from Polars operations
    #[cfg(feature = "polars")]
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(feature = "polars")]
impl From<polars::prelude::PolarsError> for ForecastError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
