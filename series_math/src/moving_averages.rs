//! Rolling mean over a fixed window
//!
//! The output of [`rolling_mean`] is aligned with its input: position `i`
//! holds the mean of the window ending at `i`, or `None` while the window
//! is still filling up.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average over the last `period` values
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period + 1),
            sum: 0.0,
        })
    }

    /// Push a new value, evicting the oldest once the window is full
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Current mean, `None` until `period` values have been seen
    pub fn value(&self) -> Option<f64> {
        if self.values.len() < self.period {
            return None;
        }
        Some(self.sum / self.period as f64)
    }

    /// Values currently inside the window, oldest first
    pub fn window(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Rolling mean of `values` with the given window size
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = SimpleMovingAverage::new(window)?;
    Ok(values
        .iter()
        .map(|&v| {
            sma.update(v);
            sma.value()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_fills_before_reporting() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();
        sma.update(10.0);
        sma.update(11.0);
        assert_eq!(sma.value(), None);

        sma.update(12.0);
        assert!((sma.value().unwrap() - 11.0).abs() < 1e-12);

        sma.update(13.0);
        assert!((sma.value().unwrap() - 12.0).abs() < 1e-12);
        assert_eq!(sma.window().count(), 3);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(SimpleMovingAverage::new(0).is_err());
        assert!(rolling_mean(&[1.0, 2.0], 0).is_err());
    }

    #[test]
    fn test_rolling_mean_alignment() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(out, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }
}
