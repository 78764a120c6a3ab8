//! ARIMA models for time series forecasting
//!
//! Estimation is conditional least squares in two stages (Hannan-Rissanen):
//! a long autoregression supplies innovation estimates, then the ARMA
//! coefficients are regressed on lagged values and lagged innovations.
//! A constant is estimated when `d < 2`.
//!
//! The likelihood is evaluated on every differenced observation, with
//! pre-sample values taken as zero. Orders sharing `d` are therefore scored
//! on the same sample, and their AIC ranking does not change when the data
//! is rescaled.

use crate::error::{ForecastError, Result};
use crate::models::linalg::least_squares;
use crate::models::{ArimaOrder, FittedModel, ModelFitter, ModelForecast, ModelSummary};
use series_math::{difference, integrate};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

/// Fits ARIMA models by conditional least squares
#[derive(Debug, Clone, Copy, Default)]
pub struct ArimaFitter;

/// ARIMA model fitted to a series
#[derive(Debug, Clone)]
pub struct FittedArima {
    order: ArimaOrder,
    /// AR coefficients, lag 1 first
    ar: Vec<f64>,
    /// MA coefficients, lag 1 first
    ma: Vec<f64>,
    /// Mean of the differenced series (zero when no constant)
    mean: f64,
    sigma2: f64,
    aic: f64,
    /// Original-scale history
    history: Vec<f64>,
    /// Demeaned differenced history
    centered: Vec<f64>,
    /// In-sample innovations aligned with `centered`
    residuals: Vec<f64>,
}

fn fail(msg: String) -> ForecastError {
    ForecastError::ModelFittingFailed(msg)
}

/// Regress `z_t` on lagged `z` and lagged `e` for `t` in `start..z.len()`
fn lagged_regression(
    z: &[f64],
    e: &[f64],
    p: usize,
    q: usize,
    start: usize,
) -> Option<(Vec<f64>, Vec<f64>)> {
    let mut design = Vec::with_capacity(z.len().saturating_sub(start));
    let mut target = Vec::with_capacity(design.capacity());
    for t in start..z.len() {
        let mut row = Vec::with_capacity(p + q);
        row.extend((1..=p).map(|i| z[t - i]));
        row.extend((1..=q).map(|j| e[t - j]));
        design.push(row);
        target.push(z[t]);
    }
    let beta = least_squares(&design, &target)?;
    Some((beta[..p].to_vec(), beta[p..].to_vec()))
}

/// Conditional innovations `e_t = z_t - sum(ar * z) - sum(ma * e)`, with
/// pre-sample `z` and `e` taken as zero
fn css_residuals(z: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let mut e = vec![0.0; z.len()];
    for t in 0..z.len() {
        let mut fitted = 0.0;
        for (i, phi) in ar.iter().enumerate().take(t) {
            fitted += phi * z[t - 1 - i];
        }
        for (j, theta) in ma.iter().enumerate().take(t) {
            fitted += theta * e[t - 1 - j];
        }
        e[t] = z[t] - fitted;
    }
    e
}

/// `-2 log L + 2 (k + 1)` for Gaussian innovations with variance `sigma2`
fn gaussian_aic(n: usize, sigma2: f64, n_params: usize) -> f64 {
    let n = n as f64;
    n * ((2.0 * PI * sigma2).ln() + 1.0) + 2.0 * (n_params + 1) as f64
}

impl ArimaFitter {
    pub fn new() -> Self {
        Self
    }

    pub fn fit_arima(&self, values: &[f64], order: ArimaOrder) -> Result<FittedArima> {
        let ArimaOrder { p, d, q } = order;
        let w = difference(values, d).map_err(|e| fail(format!("{}: {}", order, e)))?;
        let n = w.len();
        let with_mean = d < 2;
        let n_params = p + q + usize::from(with_mean);

        if n < p + q + 2 || n <= n_params + 1 {
            return Err(fail(format!(
                "Insufficient data for {}: {} observations after differencing",
                order, n
            )));
        }

        let mean = if with_mean {
            w.iter().sum::<f64>() / n as f64
        } else {
            0.0
        };
        let z: Vec<f64> = w.iter().map(|v| v - mean).collect();

        let (ar, ma) = if p == 0 && q == 0 {
            (Vec::new(), Vec::new())
        } else if q == 0 {
            lagged_regression(&z, &[], p, 0, p)
                .ok_or_else(|| fail(format!("{}: singular AR regression", order)))?
        } else {
            let long = ((n as f64).ln().ceil() as usize).max(p + q).max(1);
            let start = long + q.max(p.saturating_sub(long));
            if n <= start + p + q {
                return Err(fail(format!(
                    "Insufficient data for {}: long autoregression needs more than {} observations",
                    order,
                    start + p + q
                )));
            }
            let (long_ar, _) = lagged_regression(&z, &[], long, 0, long)
                .ok_or_else(|| fail(format!("{}: singular long autoregression", order)))?;
            let innovations = css_residuals(&z, &long_ar, &[]);
            lagged_regression(&z, &innovations, p, q, start)
                .ok_or_else(|| fail(format!("{}: singular ARMA regression", order)))?
        };

        let residuals = css_residuals(&z, &ar, &ma);
        let sse: f64 = residuals.iter().map(|e| e * e).sum();
        let sigma2 = (sse / n as f64).max(f64::MIN_POSITIVE);
        let aic = gaussian_aic(n, sigma2, n_params);

        if !aic.is_finite() || ar.iter().chain(ma.iter()).any(|c| !c.is_finite()) {
            return Err(fail(format!("{}: estimation diverged", order)));
        }

        Ok(FittedArima {
            order,
            ar,
            ma,
            mean,
            sigma2,
            aic,
            history: values.to_vec(),
            centered: z,
            residuals,
        })
    }
}

impl ModelFitter for ArimaFitter {
    fn fit(&self, values: &[f64], order: ArimaOrder) -> Result<Box<dyn FittedModel>> {
        Ok(Box::new(self.fit_arima(values, order)?))
    }
}

impl FittedArima {
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Psi weights of the integrated model, `psi[0] = 1`
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        // AR polynomial of phi(B) (1 - B)^d, as coefficients of B^1..
        let mut poly = vec![1.0];
        poly.extend(self.ar.iter().map(|phi| -phi));
        for _ in 0..self.order.d {
            let mut next = vec![0.0; poly.len() + 1];
            for (i, c) in poly.iter().enumerate() {
                next[i] += c;
                next[i + 1] -= c;
            }
            poly = next;
        }
        let ar_star: Vec<f64> = poly[1..].iter().map(|c| -c).collect();

        let mut psi = vec![0.0; horizon];
        if horizon > 0 {
            psi[0] = 1.0;
        }
        for j in 1..horizon {
            let mut value = self.ma.get(j - 1).copied().unwrap_or(0.0);
            for (k, a) in ar_star.iter().enumerate().take(j) {
                value += a * psi[j - 1 - k];
            }
            psi[j] = value;
        }
        psi
    }
}

impl FittedModel for FittedArima {
    fn order(&self) -> ArimaOrder {
        self.order
    }

    fn aic(&self) -> f64 {
        self.aic
    }

    fn sigma2(&self) -> f64 {
        self.sigma2
    }

    fn summary(&self) -> ModelSummary {
        ModelSummary {
            order: self.order,
            constant: (self.order.d < 2).then_some(self.mean()),
            ar: self.ar_coefficients().to_vec(),
            ma: self.ma_coefficients().to_vec(),
            sigma2: self.sigma2,
            aic: self.aic,
        }
    }

    fn forecast(&self, horizon: usize, confidence_level: Option<f64>) -> Result<ModelForecast> {
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon);
        }

        let mut z = self.centered.clone();
        let mut e = self.residuals.clone();
        let mut differenced = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let t = z.len();
            let mut next = 0.0;
            for (i, phi) in self.ar.iter().enumerate() {
                if t > i {
                    next += phi * z[t - 1 - i];
                }
            }
            for (j, theta) in self.ma.iter().enumerate() {
                if t > j {
                    next += theta * e[t - 1 - j];
                }
            }
            z.push(next);
            e.push(0.0);
            differenced.push(next + self.mean);
        }

        let values = integrate(&differenced, &self.history, self.order.d)?;
        let forecast = ModelForecast::new(values);

        let Some(level) = confidence_level else {
            return Ok(forecast);
        };
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Confidence level must be between 0 and 1, got {}",
                level
            )));
        }

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::ModelFittingFailed(e.to_string()))?;
        let z_score = normal.inverse_cdf(1.0 - (1.0 - level) / 2.0);

        let mut cumulative = 0.0;
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (psi, point) in self.psi_weights(horizon).iter().zip(&forecast.values) {
            cumulative += psi * psi;
            let margin = z_score * (self.sigma2 * cumulative).sqrt();
            lower.push(point - margin);
            upper.push(point + margin);
        }

        Ok(forecast.with_intervals(lower, upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal as Gaussian};

    fn ar1_series(phi: f64, n: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let noise = Gaussian::new(0.0, 1.0).unwrap();
        let mut values = vec![0.0];
        for t in 1..n {
            values.push(phi * values[t - 1] + noise.sample(&mut rng));
        }
        values
    }

    #[test]
    fn test_recovers_ar1_coefficient() {
        let series = ar1_series(0.7, 400);
        let fitted = ArimaFitter.fit_arima(&series, ArimaOrder::new(1, 0, 0)).unwrap();
        assert!((fitted.ar_coefficients()[0] - 0.7).abs() < 0.1);
    }

    #[test]
    fn test_white_noise_forecast_is_mean() {
        let series = vec![10.0, 12.0, 8.0, 11.0, 9.0, 10.0];
        let fitted = ArimaFitter.fit_arima(&series, ArimaOrder::new(0, 0, 0)).unwrap();
        let fc = fitted.forecast(3, None).unwrap();
        for v in fc.values {
            assert_relative_eq!(v, 10.0, epsilon = 1e-9);
        }
        assert!(fc.lower.is_none());
    }

    #[test]
    fn test_random_walk_with_drift_extends_trend() {
        let series: Vec<f64> = (0..20).map(|t| 100.0 + 5.0 * t as f64).collect();
        let fitted = ArimaFitter.fit_arima(&series, ArimaOrder::new(0, 1, 0)).unwrap();
        let fc = fitted.forecast(2, Some(0.95)).unwrap();
        assert_relative_eq!(fc.values[0], 200.0, epsilon = 1e-9);
        assert_relative_eq!(fc.values[1], 205.0, epsilon = 1e-9);
    }

    #[test]
    fn test_interval_widens_with_horizon() {
        let series = ar1_series(0.5, 120);
        let fitted = ArimaFitter.fit_arima(&series, ArimaOrder::new(1, 1, 1)).unwrap();
        let fc = fitted.forecast(5, Some(0.95)).unwrap();
        let lower = fc.lower.unwrap();
        let upper = fc.upper.unwrap();
        let widths: Vec<f64> = upper.iter().zip(&lower).map(|(u, l)| u - l).collect();
        assert!(widths.windows(2).all(|w| w[1] >= w[0]));
        for ((l, v), u) in lower.iter().zip(&fc.values).zip(&upper) {
            assert!(l < v && v < u);
        }
    }

    #[test]
    fn test_random_walk_psi_weights_are_one() {
        let series: Vec<f64> = ar1_series(0.2, 60);
        let fitted = ArimaFitter.fit_arima(&series, ArimaOrder::new(0, 1, 0)).unwrap();
        assert_eq!(fitted.psi_weights(4), vec![1.0; 4]);
    }

    #[test]
    fn test_summary_reports_coefficients() {
        let series = ar1_series(0.6, 200);
        let fitted = ArimaFitter.fit_arima(&series, ArimaOrder::new(1, 0, 1)).unwrap();
        let summary = fitted.summary();
        assert_eq!(summary.order, ArimaOrder::new(1, 0, 1));
        assert_eq!(summary.ar.len(), 1);
        assert_eq!(summary.ma.len(), 1);
        assert_eq!(summary.constant, Some(fitted.mean()));
        assert_relative_eq!(summary.aic, fitted.aic());

        let twice = ArimaFitter.fit_arima(&series, ArimaOrder::new(0, 2, 1)).unwrap();
        assert_eq!(twice.summary().constant, None);
    }

    #[test]
    fn test_aic_shifts_uniformly_under_rescaling() {
        let series = ar1_series(0.5, 80);
        let scaled: Vec<f64> = series.iter().map(|v| v * 1000.0).collect();
        let orders = [
            ArimaOrder::new(0, 0, 0),
            ArimaOrder::new(1, 0, 0),
            ArimaOrder::new(3, 0, 0),
            ArimaOrder::new(1, 0, 1),
        ];
        // Same sample for every order, so rescaling adds n * ln(c^2) to each AIC
        let shift = 80.0 * (1000.0f64 * 1000.0).ln();
        for order in orders {
            let raw = ArimaFitter.fit_arima(&series, order).unwrap().aic();
            let big = ArimaFitter.fit_arima(&scaled, order).unwrap().aic();
            assert_relative_eq!(big - raw, shift, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_too_short_series() {
        let err = ArimaFitter
            .fit_arima(&[1.0, 2.0, 3.0], ArimaOrder::new(1, 1, 1))
            .unwrap_err();
        assert!(matches!(err, ForecastError::ModelFittingFailed(_)));
    }

    #[test]
    fn test_bad_confidence_level() {
        let series = ar1_series(0.5, 50);
        let fitted = ArimaFitter.fit_arima(&series, ArimaOrder::new(1, 0, 0)).unwrap();
        assert!(fitted.forecast(2, Some(1.5)).is_err());
        assert!(fitted.forecast(0, None).is_err());
    }
}
