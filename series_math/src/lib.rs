//! # Series Math
//!
//! Numeric building blocks for univariate time series.
//! This crate provides rolling window statistics, differencing and
//! the summary statistics used by the forecasting pipeline.

use thiserror::Error;

pub mod differencing;
pub mod moving_averages;
pub mod statistics;
pub mod volatility;

pub use differencing::{difference, integrate, log_transform};
pub use moving_averages::rolling_mean;
pub use statistics::{autocovariance, mean, median, variance};
pub use volatility::rolling_std;

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
