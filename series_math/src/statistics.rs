//! Summary statistics

use crate::{MathError, Result};

pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Mean of an empty series".to_string(),
        ));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divisor `n`)
pub fn variance(values: &[f64]) -> Result<f64> {
    autocovariance(values, 0)
}

/// Autocovariance at `lag`, normalised by `n` as in the usual ACF estimator
pub fn autocovariance(values: &[f64], lag: usize) -> Result<f64> {
    if values.len() <= lag {
        return Err(MathError::InsufficientData(format!(
            "Autocovariance at lag {} needs more than {} values",
            lag,
            values.len()
        )));
    }
    let m = mean(values)?;
    let sum: f64 = values
        .iter()
        .zip(values.iter().skip(lag))
        .map(|(a, b)| (a - m) * (b - m))
        .sum();
    Ok(sum / values.len() as f64)
}

pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Median of an empty series".to_string(),
        ));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}
