//! Model-ready time series

use crate::error::{ForecastError, Result};
use crate::period::Period;
use chrono::NaiveDate;
use serde::Serialize;

/// Minimum number of observations any estimator needs
pub const MIN_OBSERVATIONS: usize = 2;

/// Dated observations with strictly increasing dates and finite values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeIndexedSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    period: Period,
}

impl TimeIndexedSeries {
    /// Create a series, checking ordering, length and finiteness
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>, period: Period) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::LengthMismatch {
                what: "values",
                expected: dates.len(),
                found: values.len(),
            });
        }
        if dates.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::TooFewObservations {
                found: dates.len(),
                required: MIN_OBSERVATIONS,
            });
        }
        for w in dates.windows(2) {
            if w[0] == w[1] {
                return Err(ForecastError::DuplicateTimestamp(w[1]));
            }
            if w[0] > w[1] {
                return Err(ForecastError::InvalidParameter(format!(
                    "Dates must be increasing, {} comes after {}",
                    w[1], w[0]
                )));
            }
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Value at position {} is not finite",
                pos
            )));
        }

        Ok(Self {
            dates,
            values,
            period,
        })
    }

    /// Same dates and period with replacement values
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self> {
        Self::new(self.dates.clone(), values, self.period)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// `(date, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}
