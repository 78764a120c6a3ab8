//! Sampling period of a series and calendar-aware stepping
//!
//! Month-based periods step with `chrono::Months`, never with a fixed day
//! count, and every step is measured from the same anchor so month-end
//! dates do not drift (Jan-31, Feb-29, Mar-31, ...).

use crate::error::{ForecastError, Result};
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nominal spacing between consecutive observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    /// Date `steps` periods after `anchor`, or `None` on overflow
    pub fn add_steps(self, anchor: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            Period::Daily => anchor.checked_add_days(Days::new(u64::from(steps))),
            Period::Weekly => anchor.checked_add_days(Days::new(u64::from(steps) * 7)),
            Period::Monthly => anchor.checked_add_months(Months::new(steps)),
            Period::Quarterly => anchor.checked_add_months(Months::new(steps.checked_mul(3)?)),
            Period::Yearly => anchor.checked_add_months(Months::new(steps.checked_mul(12)?)),
        }
    }

    /// Infer the period from sorted dates using the median gap in days
    pub fn infer(dates: &[NaiveDate]) -> Result<Period> {
        if dates.len() < 2 {
            return Err(ForecastError::UndeterminedPeriod(
                "need at least two dates".to_string(),
            ));
        }

        let gaps: Vec<f64> = dates
            .windows(2)
            .map(|w| (w[1] - w[0]).num_days() as f64)
            .collect();
        let median_gap = series_math::median(&gaps)?;

        match median_gap {
            g if (1.0..=1.5).contains(&g) => Ok(Period::Daily),
            g if (6.5..=7.5).contains(&g) => Ok(Period::Weekly),
            g if (28.0..=31.0).contains(&g) => Ok(Period::Monthly),
            g if (89.0..=92.0).contains(&g) => Ok(Period::Quarterly),
            g if (365.0..=366.0).contains(&g) => Ok(Period::Yearly),
            g => Err(ForecastError::UndeterminedPeriod(format!(
                "median gap of {} days matches no supported period",
                g
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

impl FromStr for Period {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Period::Daily),
            "weekly" | "w" => Ok(Period::Weekly),
            "monthly" | "m" => Ok(Period::Monthly),
            "quarterly" | "q" => Ok(Period::Quarterly),
            "yearly" | "annual" | "y" => Ok(Period::Yearly),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unsupported period: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_end_does_not_drift() {
        let anchor = ymd(2024, 1, 31);
        assert_eq!(Period::Monthly.add_steps(anchor, 1), Some(ymd(2024, 2, 29)));
        assert_eq!(Period::Monthly.add_steps(anchor, 2), Some(ymd(2024, 3, 31)));
        assert_eq!(Period::Quarterly.add_steps(anchor, 1), Some(ymd(2024, 4, 30)));
        assert_eq!(Period::Yearly.add_steps(ymd(2024, 2, 29), 1), Some(ymd(2025, 2, 28)));
    }

    #[test]
    fn test_infer_monthly_and_daily() {
        let monthly = [ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1)];
        assert_eq!(Period::infer(&monthly).unwrap(), Period::Monthly);

        let daily = [ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 4), ymd(2024, 1, 5)];
        assert_eq!(Period::infer(&daily).unwrap(), Period::Daily);
    }

    #[test]
    fn test_infer_rejects_irregular_gap() {
        let dates = [ymd(2024, 1, 1), ymd(2024, 1, 15)];
        assert!(matches!(
            Period::infer(&dates),
            Err(ForecastError::UndeterminedPeriod(_))
        ));
    }

    #[test]
    fn test_parse_period_names() {
        assert_eq!("Monthly".parse::<Period>().unwrap(), Period::Monthly);
        assert!("fortnightly".parse::<Period>().is_err());
    }
}
