//! Forecast assembly
//!
//! Attaches forward dates to the raw numbers a fitted model produces.

use crate::error::{ForecastError, Result};
use crate::period::Period;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecast step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Dated forecast, one point per horizon step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
}

impl ForecastResult {
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// True when every point carries both bounds
    pub fn has_intervals(&self) -> bool {
        self.points
            .iter()
            .all(|p| p.lower.is_some() && p.upper.is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter()
    }
}

fn check_length(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(ForecastError::LengthMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Build a dated forecast starting one period after `last_date`.
///
/// Step `k` is dated `last_date + k * period`, measured from `last_date`
/// each time. Bounds are optional and checked for length when given.
pub fn assemble(
    last_date: NaiveDate,
    period: Period,
    horizon: usize,
    points: &[f64],
    lower: Option<&[f64]>,
    upper: Option<&[f64]>,
) -> Result<ForecastResult> {
    if horizon == 0 {
        return Err(ForecastError::InvalidHorizon);
    }
    check_length("point estimates", horizon, points.len())?;
    if let Some(lower) = lower {
        check_length("lower bounds", horizon, lower.len())?;
    }
    if let Some(upper) = upper {
        check_length("upper bounds", horizon, upper.len())?;
    }

    let mut out = Vec::with_capacity(horizon);
    for (i, &value) in points.iter().enumerate() {
        let step = u32::try_from(i + 1).map_err(|_| {
            ForecastError::DateOutOfRange(format!("horizon step {} is too large", i + 1))
        })?;
        let date = period.add_steps(last_date, step).ok_or_else(|| {
            ForecastError::DateOutOfRange(format!(
                "{} + {} {} steps",
                last_date, step, period
            ))
        })?;

        out.push(ForecastPoint {
            date,
            value,
            lower: lower.map(|l| l[i]),
            upper: upper.map(|u| u[i]),
        });
    }

    Ok(ForecastResult { points: out })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zero_horizon() {
        let err = assemble(ymd(2024, 3, 1), Period::Monthly, 0, &[], None, None).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidHorizon));
    }

    #[test]
    fn test_bounds_length_checked() {
        let err = assemble(
            ymd(2024, 3, 1),
            Period::Monthly,
            2,
            &[1.0, 2.0],
            Some(&[0.5][..]),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ForecastError::LengthMismatch {
                what: "lower bounds",
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_points_without_bounds() {
        let result = assemble(ymd(2024, 3, 1), Period::Weekly, 2, &[1.0, 2.0], None, None).unwrap();
        assert_eq!(result.dates(), vec![ymd(2024, 3, 8), ymd(2024, 3, 15)]);
        assert!(!result.has_intervals());
        assert!(result.iter().all(|p| p.lower.is_none() && p.upper.is_none()));
    }
}
