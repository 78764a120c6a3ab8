//! Value transforms applied before fitting and undone after forecasting

use crate::error::{ForecastError, Result};
use crate::models::ModelForecast;
use crate::series::TimeIndexedSeries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTransform {
    #[default]
    Identity,
    /// Natural log; every value must be positive
    Log,
}

impl ValueTransform {
    pub fn apply(self, series: &TimeIndexedSeries) -> Result<TimeIndexedSeries> {
        match self {
            ValueTransform::Identity => Ok(series.clone()),
            ValueTransform::Log => {
                let logged = series_math::log_transform(series.values())
                    .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
                series.with_values(logged)
            }
        }
    }

    /// Map a forecast made on the transformed scale back to the original scale
    pub fn invert(self, forecast: ModelForecast) -> ModelForecast {
        match self {
            ValueTransform::Identity => forecast,
            ValueTransform::Log => forecast.map(f64::exp),
        }
    }
}
