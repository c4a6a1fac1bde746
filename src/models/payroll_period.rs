//! Payroll period model.
//!
//! This module contains the [`PayrollPeriod`] type, the calendar month a
//! payroll run is calculated for.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A monthly payroll period.
///
/// The period's start date selects which configuration snapshot applies.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayrollPeriod { year: 2024, month: 2 };
///
/// assert_eq!(period.start_date().unwrap(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(period.end_date().unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(period.to_string(), "2024-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl PayrollPeriod {
    /// Returns the first day of the period.
    pub fn start_date(&self) -> EngineResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(EngineError::InvalidPeriod {
            year: self.year,
            month: self.month,
        })
    }

    /// Returns the last day of the period (inclusive).
    pub fn end_date(&self) -> EngineResult<NaiveDate> {
        let start = self.start_date()?;
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };

        next_month
            .and_then(|d| d.pred_opt())
            .ok_or(EngineError::InvalidPeriod {
                year: self.year,
                month: self.month,
            })
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_date_for_december_rolls_year() {
        let period = PayrollPeriod {
            year: 2024,
            month: 12,
        };
        assert_eq!(
            period.end_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_end_date_for_non_leap_february() {
        let period = PayrollPeriod {
            year: 2025,
            month: 2,
        };
        assert_eq!(
            period.end_date().unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_invalid_month_returns_error() {
        let period = PayrollPeriod {
            year: 2024,
            month: 13,
        };
        match period.start_date() {
            Err(EngineError::InvalidPeriod { year, month }) => {
                assert_eq!(year, 2024);
                assert_eq!(month, 13);
            }
            other => panic!("Expected InvalidPeriod, got {:?}", other),
        }
        assert!(period.end_date().is_err());
    }

    #[test]
    fn test_deserialize_period() {
        let period: PayrollPeriod = serde_json::from_str(r#"{"year": 2024, "month": 7}"#).unwrap();
        assert_eq!(period.to_string(), "2024-07");
    }
}
