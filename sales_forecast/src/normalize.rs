//! Turn a validated table into a [`TimeIndexedSeries`]
//!
//! Dates are parsed with one of a closed set of [`DateFormat`]s and values
//! are coerced to `f64`. What happens to rows that fail either step is
//! decided by a single [`InvalidRowPolicy`].

use crate::error::{ForecastError, Result};
use crate::period::Period;
use crate::series::{TimeIndexedSeries, MIN_OBSERVATIONS};
use crate::validate::ValidatedTable;
use chrono::NaiveDate;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accepted layouts for the date column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `Jan-24`
    MonthAbbrevShortYear,
    /// `Jan-2024`
    MonthAbbrevYear,
    /// `2024-01`
    IsoYearMonth,
    /// `2024-01-31`
    IsoDate,
}

impl DateFormat {
    /// Parse a cell. Month-only layouts resolve to the first of the month.
    pub fn parse(self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        match self {
            DateFormat::MonthAbbrevShortYear => {
                NaiveDate::parse_from_str(&format!("01-{}", text), "%d-%b-%y").ok()
            }
            DateFormat::MonthAbbrevYear => {
                NaiveDate::parse_from_str(&format!("01-{}", text), "%d-%b-%Y").ok()
            }
            DateFormat::IsoYearMonth => {
                NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d").ok()
            }
            DateFormat::IsoDate => NaiveDate::parse_from_str(text, "%Y-%m-%d").ok(),
        }
    }

    /// Render a date the way this layout would have written it
    pub fn format(self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }

    /// chrono pattern used for rendering
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::MonthAbbrevShortYear => "%b-%y",
            DateFormat::MonthAbbrevYear => "%b-%Y",
            DateFormat::IsoYearMonth => "%Y-%m",
            DateFormat::IsoDate => "%Y-%m-%d",
        }
    }

    /// Whether the layout carries a day of month
    pub fn has_day(self) -> bool {
        matches!(self, DateFormat::IsoDate)
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

impl FromStr for DateFormat {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "%b-%y" | "month_abbrev_short_year" => Ok(DateFormat::MonthAbbrevShortYear),
            "%b-%Y" | "month_abbrev_year" => Ok(DateFormat::MonthAbbrevYear),
            "%Y-%m" | "iso_year_month" => Ok(DateFormat::IsoYearMonth),
            "%Y-%m-%d" | "iso_date" => Ok(DateFormat::IsoDate),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unsupported date format: {}",
                other
            ))),
        }
    }
}

/// What to do with rows whose date or value cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRowPolicy {
    /// Reject the whole table, listing the offending rows
    #[default]
    Fail,
    /// Skip offending rows and continue if enough remain
    Drop,
}

static THOUSANDS_GROUPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap());

/// Coerce a value cell to a finite number.
///
/// Commas are only accepted as thousands separators (`5,319`, `1,234.5`).
/// Anything else containing a comma, such as `1,5`, is not a number.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let parsed = if text.contains(',') {
        if !THOUSANDS_GROUPED.is_match(text) {
            return None;
        }
        text.replace(',', "").parse::<f64>()
    } else {
        text.parse::<f64>()
    };
    parsed.ok().filter(|v| v.is_finite())
}

/// Converts a validated table into a dated series
#[derive(Debug, Clone)]
pub struct SeriesNormalizer {
    date_column: String,
    value_column: String,
    date_format: DateFormat,
    on_invalid_row: InvalidRowPolicy,
    period: Option<Period>,
}

impl SeriesNormalizer {
    pub fn new(
        date_column: impl Into<String>,
        value_column: impl Into<String>,
        date_format: DateFormat,
    ) -> Self {
        Self {
            date_column: date_column.into(),
            value_column: value_column.into(),
            date_format,
            on_invalid_row: InvalidRowPolicy::default(),
            period: None,
        }
    }

    pub fn with_invalid_rows(mut self, policy: InvalidRowPolicy) -> Self {
        self.on_invalid_row = policy;
        self
    }

    /// Fix the period instead of inferring it from the dates
    pub fn with_period(mut self, period: Option<Period>) -> Self {
        self.period = period;
        self
    }

    pub fn normalize(&self, table: &ValidatedTable<'_>) -> Result<TimeIndexedSeries> {
        let date_idx = table.column_index(&self.date_column)?;
        let value_idx = table.column_index(&self.value_column)?;
        let raw = table.table();

        let mut bad_dates = Vec::new();
        let mut bad_values = Vec::new();
        let mut rows: Vec<(NaiveDate, f64)> = Vec::with_capacity(raw.len());

        for row in 0..raw.len() {
            let date = raw
                .cell(row, date_idx)
                .and_then(|c| self.date_format.parse(c));
            let value = raw.cell(row, value_idx).and_then(parse_value);

            if date.is_none() {
                bad_dates.push(row);
            }
            if value.is_none() {
                bad_values.push(row);
            }
            if let (Some(date), Some(value)) = (date, value) {
                rows.push((date, value));
            }
        }

        let dropped = raw.len() - rows.len();
        match self.on_invalid_row {
            InvalidRowPolicy::Fail => {
                if !bad_dates.is_empty() {
                    return Err(ForecastError::InvalidDateRows(bad_dates));
                }
                if !bad_values.is_empty() {
                    return Err(ForecastError::InvalidValueRows(bad_values));
                }
            }
            InvalidRowPolicy::Drop if dropped > 0 => {
                warn!(
                    "Dropping {} invalid rows (dates {:?}, values {:?})",
                    dropped, bad_dates, bad_values
                );
                if rows.len() < MIN_OBSERVATIONS {
                    return Err(ForecastError::InsufficientValidRows {
                        valid: rows.len(),
                        required: MIN_OBSERVATIONS,
                    });
                }
            }
            InvalidRowPolicy::Drop => {}
        }

        rows.sort_by_key(|(date, _)| *date);
        if let Some(w) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ForecastError::DuplicateTimestamp(w[0].0));
        }
        if rows.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::TooFewObservations {
                found: rows.len(),
                required: MIN_OBSERVATIONS,
            });
        }

        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = rows.into_iter().unzip();
        let period = match self.period {
            Some(period) => period,
            None => Period::infer(&dates)?,
        };

        info!(
            "Normalized {} observations from {} to {} ({} period)",
            dates.len(),
            dates[0],
            dates[dates.len() - 1],
            period
        );
        TimeIndexedSeries::new(dates, values, period)
    }
}
