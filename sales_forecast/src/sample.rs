//! Demo input generated on request
//!
//! Nothing touches the filesystem here. Callers ask for the sample when a
//! user wants one and decide themselves where the text goes.

use crate::config::PipelineConfig;
use crate::error::{ForecastError, Result};
use crate::normalize::DateFormat;
use crate::period::Period;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Shape of a generated sample table
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSpec {
    pub date_column: String,
    pub value_column: String,
    pub date_format: DateFormat,
    pub period: Period,
    pub start: NaiveDate,
    pub periods: usize,
    pub base: f64,
    /// Added per step
    pub trend: f64,
    pub noise_std: f64,
    pub seed: u64,
}

impl SampleSpec {
    /// Sample matching the columns and date layout of a configuration
    pub fn for_config(config: &PipelineConfig, periods: usize, seed: u64) -> Self {
        let period = config.period.unwrap_or(match config.date_format {
            DateFormat::IsoDate => Period::Daily,
            _ => Period::Monthly,
        });
        Self {
            date_column: config.date_column.clone(),
            value_column: config.value_column.clone(),
            date_format: config.date_format,
            period,
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            periods,
            base: 5000.0,
            trend: 75.0,
            noise_std: 400.0,
            seed,
        }
    }
}

/// Render the sample table as CSV text
pub fn sample_csv(spec: &SampleSpec) -> Result<String> {
    if spec.periods == 0 {
        return Err(ForecastError::InvalidParameter(
            "Sample must have at least one period".to_string(),
        ));
    }
    let noise = Normal::new(0.0, spec.noise_std)
        .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(spec.seed);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([spec.date_column.as_str(), spec.value_column.as_str()])?;
    for step in 0..spec.periods {
        let offset = u32::try_from(step)
            .map_err(|_| ForecastError::InvalidParameter("Too many sample periods".to_string()))?;
        let date = spec.period.add_steps(spec.start, offset).ok_or_else(|| {
            ForecastError::DateOutOfRange(format!("sample step {} after {}", step, spec.start))
        })?;
        let value = (spec.base + spec.trend * step as f64 + noise.sample(&mut rng))
            .round()
            .max(1.0);
        writer.write_record([spec.date_format.format(date), value.to_string()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ForecastError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ForecastError::InvalidParameter(e.to_string()))
}
