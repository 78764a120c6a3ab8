//! Pipeline configuration
//!
//! Loaded from JSON. Missing keys fall back to the `sales` preset.

use crate::error::{ForecastError, Result};
use crate::models::{ArimaOrder, AutoArimaConfig, ModelSpec};
use crate::normalize::{DateFormat, InvalidRowPolicy};
use crate::period::Period;
use crate::transform::ValueTransform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything one pipeline run needs to know about its input and model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub date_column: String,
    pub value_column: String,
    pub date_format: DateFormat,
    pub on_invalid_row: InvalidRowPolicy,
    /// Inferred from the dates when absent
    pub period: Option<Period>,
    pub horizon: usize,
    /// Interval coverage; no bounds are produced when absent
    pub confidence_level: Option<f64>,
    pub transform: ValueTransform,
    pub model: ModelSpec,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::sales()
    }
}

impl PipelineConfig {
    /// Monthly sales uploads: `Month` as `Jan-24`, `Sales Amt`, fixed ARIMA(1,1,1)
    pub fn sales() -> Self {
        Self {
            date_column: "Month".to_string(),
            value_column: "Sales Amt".to_string(),
            date_format: DateFormat::MonthAbbrevShortYear,
            on_invalid_row: InvalidRowPolicy::Fail,
            period: None,
            horizon: 12,
            confidence_level: Some(0.95),
            transform: ValueTransform::Identity,
            model: ModelSpec::Fixed(ArimaOrder::new(1, 1, 1)),
        }
    }

    /// Count uploads: ISO dates, log-transformed `Count`, automatic order search
    pub fn counts() -> Self {
        Self {
            date_column: "Month".to_string(),
            value_column: "Count".to_string(),
            date_format: DateFormat::IsoDate,
            on_invalid_row: InvalidRowPolicy::Fail,
            period: None,
            horizon: 30,
            confidence_level: Some(0.95),
            transform: ValueTransform::Log,
            model: ModelSpec::Auto(AutoArimaConfig::default()),
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "sales" => Ok(Self::sales()),
            "counts" => Ok(Self::counts()),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown preset '{}', expected 'sales' or 'counts'",
                other
            ))),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Columns the validator must find
    pub fn required_columns(&self) -> [&str; 2] {
        [self.date_column.as_str(), self.value_column.as_str()]
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidHorizon);
        }
        if let Some(level) = self.confidence_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(ForecastError::InvalidParameter(format!(
                    "confidence_level must be between 0 and 1, got {}",
                    level
                )));
            }
        }
        if let Some(period @ (Period::Daily | Period::Weekly)) = self.period {
            if !self.date_format.has_day() {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} period needs a date format with days, got {}",
                    period, self.date_format
                )));
            }
        }
        if self.date_column == self.value_column {
            return Err(ForecastError::InvalidParameter(
                "date_column and value_column must differ".to_string(),
            ));
        }
        if let ModelSpec::Auto(auto) = &self.model {
            auto.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{"value_column": "Count", "horizon": 6, "on_invalid_row": "drop"}"#,
        )
        .unwrap();
        assert_eq!(config.value_column, "Count");
        assert_eq!(config.date_column, "Month");
        assert_eq!(config.horizon, 6);
        assert_eq!(config.on_invalid_row, InvalidRowPolicy::Drop);
    }

    #[test]
    fn test_json_round_trip() {
        let config = PipelineConfig::counts();
        let parsed = PipelineConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"horizon": 0}"#),
            Err(ForecastError::InvalidHorizon)
        ));
        assert!(PipelineConfig::from_json_str(r#"{"confidence_level": 1.2}"#).is_err());
        assert!(matches!(
            PipelineConfig::from_json_str("{not json"),
            Err(ForecastError::ConfigError(_))
        ));
        assert!(PipelineConfig::preset("weekly").is_err());
    }

    #[test]
    fn test_sub_monthly_period_needs_day_format() {
        for period in [Period::Daily, Period::Weekly] {
            let config = PipelineConfig {
                period: Some(period),
                ..PipelineConfig::sales()
            };
            assert!(matches!(
                config.validate(),
                Err(ForecastError::InvalidParameter(_))
            ));

            let config = PipelineConfig {
                period: Some(period),
                date_format: DateFormat::IsoDate,
                ..PipelineConfig::sales()
            };
            assert!(config.validate().is_ok());
        }

        let quarterly = PipelineConfig {
            period: Some(Period::Quarterly),
            ..PipelineConfig::sales()
        };
        assert!(quarterly.validate().is_ok());
    }
}
