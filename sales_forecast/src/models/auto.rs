//! Automatic ARIMA order selection
//!
//! The differencing degree comes from repeated KPSS tests. The AR and MA
//! orders come from either a stepwise neighbourhood walk over (p, q) or an
//! exhaustive grid, ranked by AIC. Candidates that fail to fit are skipped.

use crate::error::{ForecastError, Result};
use crate::models::stationarity::ndiffs;
use crate::models::{ArimaFitter, ArimaOrder, ModelFitter, OrderSearch};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bounds and switches for the automatic order search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoArimaConfig {
    pub start_p: usize,
    pub start_d: usize,
    pub start_q: usize,
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
    /// Upper bound on `p + q`
    pub max_order: usize,
    pub seasonal: bool,
    /// Seasonal period; only 1 is supported
    pub m: usize,
    /// Stepwise walk instead of the full grid
    pub stepwise: bool,
    /// Log every candidate at debug level
    pub trace: bool,
    /// Significance level of the KPSS test
    pub alpha: f64,
    /// Cap on stepwise iterations
    pub max_steps: usize,
}

impl Default for AutoArimaConfig {
    fn default() -> Self {
        Self {
            start_p: 0,
            start_d: 0,
            start_q: 0,
            max_p: 3,
            max_d: 2,
            max_q: 3,
            max_order: 5,
            seasonal: false,
            m: 1,
            stepwise: true,
            trace: true,
            alpha: 0.05,
            max_steps: 100,
        }
    }
}

impl AutoArimaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.seasonal && self.m > 1 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal order search is not supported".to_string(),
            ));
        }
        if self.start_p > self.max_p || self.start_q > self.max_q || self.start_d > self.max_d {
            return Err(ForecastError::InvalidParameter(format!(
                "Start orders ({},{},{}) exceed maxima ({},{},{})",
                self.start_p, self.start_d, self.start_q, self.max_p, self.max_d, self.max_q
            )));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "alpha must be between 0 and 1, got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    fn allows(&self, p: usize, q: usize) -> bool {
        p <= self.max_p && q <= self.max_q && p + q <= self.max_order
    }
}

/// Order search backed by a [`ModelFitter`]
#[derive(Debug, Clone, Default)]
pub struct StepwiseSearch<F: ModelFitter = ArimaFitter> {
    fitter: F,
}

impl StepwiseSearch<ArimaFitter> {
    pub fn new() -> Self {
        Self {
            fitter: ArimaFitter,
        }
    }
}

impl<F: ModelFitter> StepwiseSearch<F> {
    pub fn with_fitter(fitter: F) -> Self {
        Self { fitter }
    }
}

/// AIC of fitted candidates, so no order is fitted twice
struct Candidates<'a, F: ModelFitter> {
    fitter: &'a F,
    values: &'a [f64],
    d: usize,
    trace: bool,
    scores: HashMap<(usize, usize), Option<f64>>,
}

impl<'a, F: ModelFitter> Candidates<'a, F> {
    fn score(&mut self, p: usize, q: usize) -> Option<f64> {
        if let Some(score) = self.scores.get(&(p, q)) {
            return *score;
        }
        let order = ArimaOrder::new(p, self.d, q);
        let score = match self.fitter.fit(self.values, order) {
            Ok(model) => {
                if self.trace {
                    debug!("{}: AIC={:.3}", order, model.aic());
                }
                Some(model.aic())
            }
            Err(e) => {
                if self.trace {
                    debug!("{}: skipped ({})", order, e);
                }
                None
            }
        };
        self.scores.insert((p, q), score);
        score
    }

    fn best(&self) -> Option<((usize, usize), f64)> {
        self.scores
            .iter()
            .filter_map(|(k, v)| v.map(|aic| (*k, aic)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }
}

impl<F: ModelFitter> OrderSearch for StepwiseSearch<F> {
    fn search_order(&self, values: &[f64], constraints: &AutoArimaConfig) -> Result<ArimaOrder> {
        constraints.validate()?;
        let d = ndiffs(values, constraints.start_d, constraints.max_d, constraints.alpha)?;

        let mut candidates = Candidates {
            fitter: &self.fitter,
            values,
            d,
            trace: constraints.trace,
            scores: HashMap::new(),
        };

        if constraints.stepwise {
            let starts = [
                (constraints.start_p, constraints.start_q),
                (0, 0),
                (1, 0),
                (0, 1),
            ];
            for (p, q) in starts {
                let (p, q) = (p.min(constraints.max_p), q.min(constraints.max_q));
                if constraints.allows(p, q) {
                    candidates.score(p, q);
                }
            }

            for _ in 0..constraints.max_steps {
                let Some(((p, q), best_aic)) = candidates.best() else {
                    break;
                };
                let mut improved = false;
                for (dp, dq) in [(-1, 0), (1, 0), (0, -1), (0, 1), (-1, -1), (1, 1), (-1, 1), (1, -1)] {
                    let np = p as i64 + dp;
                    let nq = q as i64 + dq;
                    if np < 0 || nq < 0 {
                        continue;
                    }
                    let (np, nq) = (np as usize, nq as usize);
                    if !constraints.allows(np, nq) {
                        continue;
                    }
                    if let Some(aic) = candidates.score(np, nq) {
                        if aic < best_aic {
                            improved = true;
                        }
                    }
                }
                if !improved {
                    break;
                }
            }
        } else {
            for p in constraints.start_p..=constraints.max_p {
                for q in constraints.start_q..=constraints.max_q {
                    if constraints.allows(p, q) {
                        candidates.score(p, q);
                    }
                }
            }
        }

        let ((p, q), aic) = candidates.best().ok_or_else(|| {
            ForecastError::ModelFittingFailed(format!(
                "No candidate order with d={} could be fitted",
                d
            ))
        })?;
        let order = ArimaOrder::new(p, d, q);
        debug!("Best model: {} AIC={:.3}", order, aic);
        Ok(order)
    }
}
