//! # Sales Forecast
//!
//! Turn an uploaded table of dated sales or counts into an ARIMA forecast.
//!
//! ## Pipeline
//!
//! - **Validate**: required columns exist and the table has rows
//! - **Normalize**: parse dates, coerce values, sort, reject duplicates,
//!   agree on a sampling period
//! - **Fit**: fixed ARIMA order or automatic order search, behind the
//!   [`ModelFitter`] and [`OrderSearch`] traits
//! - **Assemble**: date the forecast with calendar-aware steps after the
//!   last observation
//!
//! Every stage returns a [`ForecastError`] on bad input and no partial
//! forecast is produced.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_forecast::{ForecastPipeline, PipelineConfig, RawTable};
//!
//! let table = RawTable::from_path("sales.csv")?;
//! let pipeline = ForecastPipeline::new(PipelineConfig::sales())?;
//! let outcome = pipeline.run(&table)?;
//!
//! for point in outcome.forecast.iter() {
//!     println!("{} {:.0}", point.date, point.value);
//! }
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod assemble;
pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod models;
pub mod normalize;
pub mod period;
pub mod pipeline;
pub mod sample;
pub mod series;
pub mod transform;
pub mod validate;

// Re-export commonly used types
pub use crate::assemble::{assemble, ForecastPoint, ForecastResult};
pub use crate::config::PipelineConfig;
pub use crate::data::RawTable;
pub use crate::error::{ForecastError, Result};
pub use crate::models::{
    ArimaFitter, ArimaOrder, AutoArimaConfig, FittedModel, ModelFitter, ModelForecast, ModelSpec,
    ModelSummary, OrderSearch, StepwiseSearch,
};
pub use crate::normalize::{DateFormat, InvalidRowPolicy, SeriesNormalizer};
pub use crate::period::Period;
pub use crate::pipeline::{ForecastOutcome, ForecastPipeline};
pub use crate::series::TimeIndexedSeries;
pub use crate::transform::ValueTransform;
pub use crate::validate::{validate, ValidatedTable};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
