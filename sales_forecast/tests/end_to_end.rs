use chrono::Duration;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::export::{forecast_to_csv_string, write_combined_csv, FORECAST_HEADER};
use sales_forecast::sample::{sample_csv, SampleSpec};
use sales_forecast::{
    assemble, DateFormat, ForecastPipeline, ModelSpec, Period, PipelineConfig, RawTable,
};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

fn sample_table(config: &PipelineConfig, periods: usize) -> RawTable {
    let text = sample_csv(&SampleSpec::for_config(config, periods, 42)).unwrap();
    RawTable::from_reader(text.as_bytes()).unwrap()
}

#[test]
fn test_sales_preset_on_generated_sample() {
    let config = PipelineConfig::sales();
    let table = sample_table(&config, 36);
    let outcome = ForecastPipeline::new(config).unwrap().run(&table).unwrap();

    assert_eq!(outcome.series.len(), 36);
    assert_eq!(outcome.series.period(), Period::Monthly);
    assert_eq!(outcome.forecast.len(), 12);
    assert_eq!(
        outcome.forecast.dates()[0],
        Period::Monthly.add_steps(outcome.series.last_date(), 1).unwrap()
    );
    assert!(outcome.forecast.has_intervals());
    for point in outcome.forecast.iter() {
        assert!(point.value.is_finite());
        assert!(point.lower.unwrap() <= point.value);
        assert!(point.value <= point.upper.unwrap());
    }
}

#[test]
fn test_counts_preset_searches_and_stays_positive() {
    let config = PipelineConfig::counts();
    let table = sample_table(&config, 60);
    let outcome = ForecastPipeline::new(config).unwrap().run(&table).unwrap();

    assert_eq!(outcome.series.period(), Period::Daily);
    assert_eq!(outcome.forecast.len(), 30);
    assert_eq!(
        outcome.forecast.dates()[0],
        outcome.series.last_date() + Duration::days(1)
    );
    let order = outcome.summary.order;
    assert!(order.p <= 3 && order.d <= 2 && order.q <= 3);
    assert_eq!(outcome.summary.ar.len(), order.p);
    assert_eq!(outcome.summary.ma.len(), order.q);
    // Log scale forecasts come back strictly positive
    for point in outcome.forecast.iter() {
        assert!(point.lower.unwrap() > 0.0);
    }
}

#[test]
fn test_pipeline_from_files() {
    let mut input = NamedTempFile::new().unwrap();
    writeln!(input, "Month,Sales Amt").unwrap();
    for (month, value) in [
        ("Jan-23", "4,100"),
        ("Feb-23", "4,250"),
        ("Mar-23", "4,300"),
        ("Apr-23", "4,420"),
        ("May-23", "4,510"),
        ("Jun-23", "4,580"),
        ("Jul-23", "4,700"),
        ("Aug-23", "4,790"),
        ("Sep-23", "4,850"),
        ("Oct-23", "4,990"),
    ] {
        writeln!(input, "{},\"{}\"", month, value).unwrap();
    }

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"{{"horizon": 3, "confidence_level": null, "model": {{"fixed": {{"p": 0, "d": 1, "q": 0}}}}}}"#
    )
    .unwrap();

    let config = PipelineConfig::from_path(config_file.path()).unwrap();
    assert_eq!(config.model, ModelSpec::Fixed(sales_forecast::ArimaOrder::new(0, 1, 0)));

    let table = RawTable::from_path(input.path()).unwrap();
    let outcome = ForecastPipeline::new(config).unwrap().run(&table).unwrap();

    let text = forecast_to_csv_string(&outcome.forecast, DateFormat::MonthAbbrevShortYear).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], FORECAST_HEADER.join(","));
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("Nov-23,"));
    assert!(lines[3].starts_with("Jan-24,"));
    // No confidence level, so the bound cells stay empty
    assert!(lines[1].ends_with(",,"));
}

#[rstest]
#[case("sales", "Month,Sales Amt")]
#[case("counts", "Month,Count")]
fn test_sample_header_follows_preset(#[case] preset: &str, #[case] header: &str) {
    let config = PipelineConfig::preset(preset).unwrap();
    let text = sample_csv(&SampleSpec::for_config(&config, 5, 3)).unwrap();
    assert_eq!(text.lines().next(), Some(header));
    assert_eq!(text.lines().count(), 6);
}

#[test]
fn test_combined_export_writes_history_then_forecast() {
    let table = RawTable::from_rows(
        ["Month", "Sales Amt"],
        [["Jan-24", "5319"], ["Feb-24", "9990"], ["Mar-24", "7597"]],
    )
    .unwrap();
    let pipeline = ForecastPipeline::new(PipelineConfig::sales()).unwrap();
    let history = pipeline.prepare(&table).unwrap();
    let forecast = assemble(history.last_date(), history.period(), 1, &[8000.0], None, None).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("combined.csv");
    write_combined_csv(
        fs::File::create(&path).unwrap(),
        &history,
        &forecast,
        DateFormat::MonthAbbrevShortYear,
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Date,Kind,Value,Lower CI,Upper CI\n\
         Jan-24,history,5319,,\n\
         Feb-24,history,9990,,\n\
         Mar-24,history,7597,,\n\
         Apr-24,forecast,8000,,\n"
    );
}
