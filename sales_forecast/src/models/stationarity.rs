//! KPSS level-stationarity test and differencing-order selection

use crate::error::{ForecastError, Result};
use series_math::{autocovariance, difference, mean, variance};

/// Upper-tail critical values of the level KPSS statistic, by significance level
const KPSS_CRITICAL: [(f64, f64); 4] = [(0.10, 0.347), (0.05, 0.463), (0.025, 0.574), (0.01, 0.739)];

/// Outcome of a KPSS test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpssResult {
    pub statistic: f64,
    pub critical_value: f64,
    pub lags: usize,
}

impl KpssResult {
    /// The null of stationarity is rejected at the chosen level
    pub fn needs_differencing(&self) -> bool {
        self.statistic > self.critical_value
    }
}

/// Critical value at `alpha`, interpolated between tabulated levels
pub fn kpss_critical_value(alpha: f64) -> Result<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Significance level must be between 0 and 1, got {}",
            alpha
        )));
    }

    let (first_alpha, first_value) = KPSS_CRITICAL[0];
    if alpha >= first_alpha {
        return Ok(first_value);
    }
    for pair in KPSS_CRITICAL.windows(2) {
        let (hi_alpha, hi_value) = pair[0];
        let (lo_alpha, lo_value) = pair[1];
        if alpha >= lo_alpha {
            let weight = (hi_alpha - alpha) / (hi_alpha - lo_alpha);
            return Ok(hi_value + weight * (lo_value - hi_value));
        }
    }
    Ok(KPSS_CRITICAL[KPSS_CRITICAL.len() - 1].1)
}

/// KPSS test for level stationarity with a short Bartlett lag window
pub fn kpss(values: &[f64], alpha: f64) -> Result<KpssResult> {
    let n = values.len();
    if n < 3 {
        return Err(ForecastError::TooFewObservations {
            found: n,
            required: 3,
        });
    }
    let critical_value = kpss_critical_value(alpha)?;

    let m = mean(values)?;
    let resid: Vec<f64> = values.iter().map(|v| v - m).collect();

    let mut partial = 0.0;
    let eta: f64 = resid
        .iter()
        .map(|e| {
            partial += e;
            partial * partial
        })
        .sum::<f64>()
        / (n * n) as f64;

    let lags = ((3.0 * (n as f64).sqrt() / 13.0).floor() as usize).min(n - 1);
    let mut long_run = variance(&resid)?;
    for lag in 1..=lags {
        let weight = 1.0 - lag as f64 / (lags as f64 + 1.0);
        long_run += 2.0 * weight * autocovariance(&resid, lag)?;
    }

    // A constant series is trivially stationary
    let statistic = if long_run > 0.0 { eta / long_run } else { 0.0 };

    Ok(KpssResult {
        statistic,
        critical_value,
        lags,
    })
}

/// Number of differences, from `start_d` up to `max_d`, until KPSS no longer
/// rejects stationarity at `alpha`
pub fn ndiffs(values: &[f64], start_d: usize, max_d: usize, alpha: f64) -> Result<usize> {
    if start_d > max_d {
        return Err(ForecastError::InvalidParameter(format!(
            "start_d ({}) exceeds max_d ({})",
            start_d, max_d
        )));
    }

    let mut d = start_d;
    let mut current = difference(values, d)?;
    while d < max_d && current.len() >= 3 && kpss(&current, alpha)?.needs_differencing() {
        current = difference(&current, 1)?;
        d += 1;
    }
    Ok(d)
}
