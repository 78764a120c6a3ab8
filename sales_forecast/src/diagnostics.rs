//! Stationarity report shown next to the forecast
//!
//! Rolling mean and standard deviation plus a KPSS test on the series as
//! it will be fitted.

use crate::error::Result;
use crate::models::stationarity::{kpss, KpssResult};
use crate::series::TimeIndexedSeries;
use chrono::NaiveDate;
use serde::Serialize;

/// Default rolling window, two years of monthly data
pub const DEFAULT_WINDOW: usize = 24;

#[derive(Debug, Clone, Serialize)]
pub struct StationarityReport {
    pub dates: Vec<NaiveDate>,
    pub rolling_mean: Vec<Option<f64>>,
    pub rolling_std: Vec<Option<f64>>,
    pub kpss_statistic: f64,
    pub kpss_critical_value: f64,
    pub kpss_lags: usize,
    pub is_stationary: bool,
}

/// Build the report with the given rolling window and KPSS significance level
pub fn stationarity_report(
    series: &TimeIndexedSeries,
    window: usize,
    alpha: f64,
) -> Result<StationarityReport> {
    let values = series.values();
    let rolling_mean = series_math::rolling_mean(values, window)?;
    let rolling_std = series_math::rolling_std(values, window)?;
    let KpssResult {
        statistic,
        critical_value,
        lags,
    } = kpss(values, alpha)?;

    Ok(StationarityReport {
        dates: series.dates().to_vec(),
        rolling_mean,
        rolling_std,
        kpss_statistic: statistic,
        kpss_critical_value: critical_value,
        kpss_lags: lags,
        is_stationary: statistic <= critical_value,
    })
}
