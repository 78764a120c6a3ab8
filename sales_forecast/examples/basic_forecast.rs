use sales_forecast::diagnostics::{stationarity_report, DEFAULT_WINDOW};
use sales_forecast::sample::{sample_csv, SampleSpec};
use sales_forecast::{ForecastPipeline, PipelineConfig, RawTable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Sales Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    let config = PipelineConfig::sales();
    let date_format = config.date_format;

    // Three years of monthly sales
    let text = sample_csv(&SampleSpec::for_config(&config, 36, 42))?;
    let table = RawTable::from_reader(text.as_bytes())?;
    println!("Sample table: {} rows, columns {:?}\n", table.len(), table.headers());

    let pipeline = ForecastPipeline::new(config)?;
    let series = pipeline.prepare(&table)?;
    let report = stationarity_report(&series, DEFAULT_WINDOW, 0.05)?;
    println!(
        "KPSS statistic {:.3} (critical {:.3}): {}",
        report.kpss_statistic,
        report.kpss_critical_value,
        if report.is_stationary {
            "stationary"
        } else {
            "needs differencing"
        }
    );

    let outcome = pipeline.run(&table)?;
    println!("{}\n", outcome.summary);

    println!("{:<8} {:>10} {:>10} {:>10}", "Month", "Forecast", "Lower", "Upper");
    for point in outcome.forecast.iter() {
        println!(
            "{:<8} {:>10.0} {:>10.0} {:>10.0}",
            date_format.format(point.date),
            point.value,
            point.lower.unwrap_or(f64::NAN),
            point.upper.unwrap_or(f64::NAN)
        );
    }

    Ok(())
}
