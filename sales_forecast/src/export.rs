//! CSV export of a forecast
//!
//! Columns are `Date,Forecast,Lower CI,Upper CI`. Absent bounds are written
//! as empty cells.

use crate::assemble::ForecastResult;
use crate::error::{ForecastError, Result};
use crate::normalize::DateFormat;
use crate::series::TimeIndexedSeries;
use std::io::Write;

pub const FORECAST_HEADER: [&str; 4] = ["Date", "Forecast", "Lower CI", "Upper CI"];

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the forecast rows, dates rendered with `date_format`
pub fn write_forecast_csv<W: Write>(
    writer: W,
    result: &ForecastResult,
    date_format: DateFormat,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(FORECAST_HEADER)?;
    for point in result.iter() {
        csv_writer.write_record([
            date_format.format(point.date),
            point.value.to_string(),
            optional(point.lower),
            optional(point.upper),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// History followed by forecast in one table, with a `Kind` column
pub fn write_combined_csv<W: Write>(
    writer: W,
    history: &TimeIndexedSeries,
    result: &ForecastResult,
    date_format: DateFormat,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Date", "Kind", "Value", "Lower CI", "Upper CI"])?;
    for (date, value) in history.iter() {
        csv_writer.write_record([
            date_format.format(date),
            "history".to_string(),
            value.to_string(),
            String::new(),
            String::new(),
        ])?;
    }
    for point in result.iter() {
        csv_writer.write_record([
            date_format.format(point.date),
            "forecast".to_string(),
            point.value.to_string(),
            optional(point.lower),
            optional(point.upper),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn forecast_to_csv_string(result: &ForecastResult, date_format: DateFormat) -> Result<String> {
    let mut buf = Vec::new();
    write_forecast_csv(&mut buf, result, date_format)?;
    String::from_utf8(buf).map_err(|e| ForecastError::InvalidParameter(e.to_string()))
}
