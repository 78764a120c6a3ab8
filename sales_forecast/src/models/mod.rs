//! Model fitting capability
//!
//! The pipeline only talks to the traits in this module. [`ArimaFitter`]
//! and [`StepwiseSearch`] are the shipped implementations; tests swap in
//! their own.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

pub mod arima;
pub mod auto;
mod linalg;
pub mod stationarity;

pub use arima::{ArimaFitter, FittedArima};
pub use auto::{AutoArimaConfig, StepwiseSearch};

/// Structural order of an ARIMA model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive lags
    pub p: usize,
    /// Differencing degree
    pub d: usize,
    /// Moving-average lags
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// How the model order is chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    /// Use this order as is
    Fixed(ArimaOrder),
    /// Search for an order within these constraints
    Auto(AutoArimaConfig),
}

impl Default for ModelSpec {
    fn default() -> Self {
        ModelSpec::Auto(AutoArimaConfig::default())
    }
}

/// Estimated parameters of a fitted model, as shown next to the forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub order: ArimaOrder,
    /// Mean (`d = 0`) or drift (`d = 1`) of the differenced series
    pub constant: Option<f64>,
    /// AR coefficients, lag 1 first
    pub ar: Vec<f64>,
    /// MA coefficients, lag 1 first
    pub ma: Vec<f64>,
    pub sigma2: f64,
    pub aic: f64,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.order)?;
        if let Some(constant) = self.constant {
            writeln!(f, "  {:<8} {:>14.4}", "const", constant)?;
        }
        for (i, phi) in self.ar.iter().enumerate() {
            writeln!(f, "  {:<8} {:>14.4}", format!("ar.L{}", i + 1), phi)?;
        }
        for (i, theta) in self.ma.iter().enumerate() {
            writeln!(f, "  {:<8} {:>14.4}", format!("ma.L{}", i + 1), theta)?;
        }
        writeln!(f, "  {:<8} {:>14.4}", "sigma2", self.sigma2)?;
        write!(f, "  {:<8} {:>14.4}", "AIC", self.aic)
    }
}

/// Raw model output for `horizon` steps, on the scale the model was fitted on
#[derive(Debug, Clone, PartialEq)]
pub struct ModelForecast {
    pub values: Vec<f64>,
    pub lower: Option<Vec<f64>>,
    pub upper: Option<Vec<f64>>,
}

impl ModelForecast {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            lower: None,
            upper: None,
        }
    }

    pub fn with_intervals(mut self, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        self.lower = Some(lower);
        self.upper = Some(upper);
        self
    }

    /// Apply `f` to the point forecast and both bounds
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            values: self.values.into_iter().map(&f).collect(),
            lower: self.lower.map(|l| l.into_iter().map(&f).collect()),
            upper: self.upper.map(|u| u.into_iter().map(&f).collect()),
        }
    }

    /// Fail with `ModelFittingFailed` if any estimate or bound is NaN or infinite
    pub fn ensure_finite(&self) -> Result<()> {
        let bounds = self.lower.iter().chain(self.upper.iter()).flatten();
        match self.values.iter().chain(bounds).find(|v| !v.is_finite()) {
            Some(v) => Err(ForecastError::ModelFittingFailed(format!(
                "Forecast contains a non-finite value ({})",
                v
            ))),
            None => Ok(()),
        }
    }
}

/// A model that has been fitted to a series
pub trait FittedModel: Debug {
    fn order(&self) -> ArimaOrder;

    /// Akaike information criterion of the fit
    fn aic(&self) -> f64;

    /// Innovation variance estimate
    fn sigma2(&self) -> f64;

    /// Forecast `horizon` steps ahead. Bounds are produced when a
    /// confidence level in (0, 1) is given.
    fn forecast(&self, horizon: usize, confidence_level: Option<f64>) -> Result<ModelForecast>;

    /// Parameter summary. Models without coefficients report only the
    /// order and fit statistics.
    fn summary(&self) -> ModelSummary {
        ModelSummary {
            order: self.order(),
            constant: None,
            ar: Vec::new(),
            ma: Vec::new(),
            sigma2: self.sigma2(),
            aic: self.aic(),
        }
    }
}

/// Fits a model of a given order to a series
pub trait ModelFitter: Debug {
    fn fit(&self, values: &[f64], order: ArimaOrder) -> Result<Box<dyn FittedModel>>;
}

/// Chooses a model order for a series
pub trait OrderSearch: Debug {
    fn search_order(&self, values: &[f64], constraints: &AutoArimaConfig) -> Result<ArimaOrder>;
}

/// Wrap any error from the fitting capability as `ModelFittingFailed`
pub(crate) fn fitting_failure(err: ForecastError) -> ForecastError {
    match err {
        ForecastError::ModelFittingFailed(_) => err,
        other => ForecastError::ModelFittingFailed(other.to_string()),
    }
}
