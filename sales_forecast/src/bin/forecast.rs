//! # forecast
//!
//! Command-line front end for the sales_forecast pipeline.

use clap::{Parser, Subcommand};
use log::error;
use sales_forecast::diagnostics::{stationarity_report, DEFAULT_WINDOW};
use sales_forecast::export::{write_combined_csv, write_forecast_csv};
use sales_forecast::sample::{sample_csv, SampleSpec};
use sales_forecast::{ForecastPipeline, PipelineConfig, RawTable, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "forecast")]
#[command(about = "ARIMA forecasts for uploaded sales and count tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CSV file, fit a model and write the forecast
    Run {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// JSON configuration file (overrides --preset)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Built-in configuration (sales, counts)
        #[arg(short, long, default_value = "sales")]
        preset: String,

        /// Number of periods to forecast
        #[arg(long)]
        horizon: Option<usize>,

        /// Output CSV file (stdout when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include the history rows ahead of the forecast
        #[arg(long)]
        with_history: bool,
    },

    /// Print a generated sample input
    Sample {
        /// Built-in configuration whose columns the sample uses
        #[arg(short, long, default_value = "sales")]
        preset: String,

        /// Number of rows
        #[arg(long, default_value = "36")]
        periods: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output CSV file (stdout when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rolling statistics and KPSS test for an input file
    Diagnose {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// JSON configuration file (overrides --preset)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Built-in configuration (sales, counts)
        #[arg(short, long, default_value = "sales")]
        preset: String,

        /// Rolling window size
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: usize,
    },
}

fn load_config(config: Option<&Path>, preset: &str) -> Result<PipelineConfig> {
    match config {
        Some(path) => PipelineConfig::from_path(path),
        None => PipelineConfig::preset(preset),
    }
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    })
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            input,
            config,
            preset,
            horizon,
            output,
            with_history,
        } => {
            let mut config = load_config(config.as_deref(), &preset)?;
            if let Some(horizon) = horizon {
                config.horizon = horizon;
            }
            let date_format = config.date_format;

            let table = RawTable::from_path(&input)?;
            let pipeline = ForecastPipeline::new(config)?;
            let outcome = pipeline.run(&table)?;
            eprintln!(
                "Fitted on {} observations from {} to {}",
                outcome.series.len(),
                outcome.series.first_date(),
                outcome.series.last_date()
            );
            eprintln!("{}", outcome.summary);

            let writer = open_output(output.as_deref())?;
            if with_history {
                write_combined_csv(writer, &outcome.series, &outcome.forecast, date_format)
            } else {
                write_forecast_csv(writer, &outcome.forecast, date_format)
            }
        }
        Commands::Sample {
            preset,
            periods,
            seed,
            output,
        } => {
            let config = PipelineConfig::preset(&preset)?;
            let text = sample_csv(&SampleSpec::for_config(&config, periods, seed))?;
            match output {
                Some(path) => fs::write(path, text)?,
                None => io::stdout().write_all(text.as_bytes())?,
            }
            Ok(())
        }
        Commands::Diagnose {
            input,
            config,
            preset,
            window,
        } => {
            let config = load_config(config.as_deref(), &preset)?;
            let table = RawTable::from_path(&input)?;
            let pipeline = ForecastPipeline::new(config)?;
            let series = pipeline.prepare(&table)?;
            let series = pipeline.config().transform.apply(&series)?;
            let report = stationarity_report(&series, window, 0.05)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
