//! End-to-end forecast pipeline
//!
//! validate -> normalize -> transform -> choose order -> fit -> forecast
//! -> invert transform -> assemble. Each run is independent and keeps no
//! state once it returns.

use crate::assemble::{assemble, ForecastResult};
use crate::config::PipelineConfig;
use crate::data::RawTable;
use crate::error::Result;
use crate::models::{
    fitting_failure, ArimaFitter, ModelFitter, ModelSpec, ModelSummary, OrderSearch,
    StepwiseSearch,
};
use crate::normalize::SeriesNormalizer;
use crate::series::TimeIndexedSeries;
use crate::validate::validate;
use log::info;

/// Everything a successful run produces
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    /// The normalized input, on the original scale
    pub series: TimeIndexedSeries,
    /// Order, coefficients and fit statistics of the model used
    pub summary: ModelSummary,
    pub forecast: ForecastResult,
}

/// Runs uploads through validation, fitting and assembly
#[derive(Debug)]
pub struct ForecastPipeline<F = ArimaFitter, S = StepwiseSearch>
where
    F: ModelFitter,
    S: OrderSearch,
{
    config: PipelineConfig,
    fitter: F,
    search: S,
}

impl ForecastPipeline {
    /// Pipeline with the built-in ARIMA fitter and stepwise search
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_components(config, ArimaFitter, StepwiseSearch::new())
    }
}

impl<F: ModelFitter, S: OrderSearch> ForecastPipeline<F, S> {
    pub fn with_components(config: PipelineConfig, fitter: F, search: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fitter,
            search,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validate and normalize without fitting anything
    pub fn prepare(&self, table: &RawTable) -> Result<TimeIndexedSeries> {
        let config = &self.config;
        let validated = validate(table, &config.required_columns())?;
        info!(
            "Validated table with {} rows and columns {:?}",
            table.len(),
            config.required_columns()
        );

        SeriesNormalizer::new(
            config.date_column.as_str(),
            config.value_column.as_str(),
            config.date_format,
        )
        .with_invalid_rows(config.on_invalid_row)
        .with_period(config.period)
        .normalize(&validated)
    }

    pub fn run(&self, table: &RawTable) -> Result<ForecastOutcome> {
        let series = self.prepare(table)?;
        let config = &self.config;
        let model_input = config.transform.apply(&series)?;

        let order = match &config.model {
            ModelSpec::Fixed(order) => *order,
            ModelSpec::Auto(constraints) => {
                let order = self
                    .search
                    .search_order(model_input.values(), constraints)
                    .map_err(fitting_failure)?;
                info!("Order search selected {}", order);
                order
            }
        };

        let model = self
            .fitter
            .fit(model_input.values(), order)
            .map_err(fitting_failure)?;
        info!(
            "Fitted {} on {} observations (AIC {:.3})",
            model.order(),
            model_input.len(),
            model.aic()
        );

        let raw = model
            .forecast(config.horizon, config.confidence_level)
            .map_err(fitting_failure)?;
        let raw = config.transform.invert(raw);
        raw.ensure_finite()?;

        let forecast = assemble(
            series.last_date(),
            series.period(),
            config.horizon,
            &raw.values,
            raw.lower.as_deref(),
            raw.upper.as_deref(),
        )?;
        info!(
            "Forecast {} {} steps after {}",
            forecast.len(),
            series.period(),
            series.last_date()
        );

        Ok(ForecastOutcome {
            series,
            summary: model.summary(),
            forecast,
        })
    }
}
