//! Rolling standard deviation
//!
//! Uses the sample estimator (divisor `n - 1`), matching what most
//! dataframe libraries report for a rolling window.

use crate::moving_averages::SimpleMovingAverage;
use crate::{MathError, Result};

/// Sample standard deviation over the last `period` values
#[derive(Debug, Clone)]
pub struct StandardDeviation {
    sma: SimpleMovingAverage,
}

impl StandardDeviation {
    /// Create a new StandardDeviation with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(
                "Period must be at least 2 for a sample standard deviation".to_string(),
            ));
        }

        Ok(Self {
            sma: SimpleMovingAverage::new(period)?,
        })
    }

    pub fn update(&mut self, value: f64) {
        self.sma.update(value);
    }

    /// Current standard deviation, `None` until the window is full
    pub fn value(&self) -> Option<f64> {
        let mean = self.sma.value()?;
        let n = self.sma.period() as f64;
        let sum_sq: f64 = self
            .sma
            .window()
            .map(|&value| {
                let diff = value - mean;
                diff * diff
            })
            .sum();

        Some((sum_sq / (n - 1.0)).sqrt())
    }
}

/// Rolling sample standard deviation of `values`
pub fn rolling_std(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut std_dev = StandardDeviation::new(window)?;
    Ok(values
        .iter()
        .map(|&v| {
            std_dev.update(v);
            std_dev.value()
        })
        .collect())
}
