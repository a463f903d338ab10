//! Calendar months at billing granularity.
//!
//! Dues are charged per calendar month, so every date that enters the
//! calculators is first pinned to the first day of its month. Day-of-month
//! and time-of-day never influence how much is owed.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{DuesError, Result};

/// a calendar month, normalized to its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingMonth(NaiveDate);

impl BillingMonth {
    /// create from year and 1-based month
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(BillingMonth)
            .ok_or_else(|| DuesError::InvalidDate {
                message: format!("{}-{:02} is not a valid month", year, month),
            })
    }

    /// january 1970, anchor for single-rule schedules
    pub fn epoch() -> Self {
        BillingMonth(NaiveDate::default())
    }

    /// the month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        // day 1 of an existing date's month always exists
        BillingMonth(date - chrono::Duration::days(i64::from(date.day0())))
    }

    /// the month containing `timestamp` (UTC)
    pub fn from_datetime(timestamp: DateTime<Utc>) -> Self {
        Self::from_date(timestamp.date_naive())
    }

    /// current month according to the time provider
    pub fn current(time_provider: &SafeTimeProvider) -> Self {
        Self::from_datetime(time_provider.now())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// following month, `None` past the end of the calendar
    pub fn succ(&self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(BillingMonth)
    }

    /// preceding month, `None` before the start of the calendar
    pub fn pred(&self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(BillingMonth)
    }

    /// move by a signed number of months
    pub fn checked_add(&self, months: i64) -> Option<Self> {
        let magnitude = u32::try_from(months.unsigned_abs()).ok()?;
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(magnitude))
        } else {
            self.0.checked_sub_months(Months::new(magnitude))
        };
        shifted.map(BillingMonth)
    }

    /// signed number of months from `self` to `other` (0 when equal)
    pub fn months_until(&self, other: BillingMonth) -> i64 {
        other.ordinal() - self.ordinal()
    }

    fn ordinal(&self) -> i64 {
        i64::from(self.0.year()) * 12 + i64::from(self.0.month0())
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), self.0.month())
    }
}

impl FromStr for BillingMonth {
    type Err = DuesError;

    /// accepts `YYYY-MM` or a full `YYYY-MM-DD` date (the day is dropped)
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }

        let (year, month) = s.split_once('-').ok_or_else(|| DuesError::InvalidDate {
            message: format!("expected YYYY-MM, got '{}'", s),
        })?;
        let year = year.parse::<i32>().map_err(|_| DuesError::InvalidDate {
            message: format!("invalid year in '{}'", s),
        })?;
        let month = month.parse::<u32>().map_err(|_| DuesError::InvalidDate {
            message: format!("invalid month in '{}'", s),
        })?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for BillingMonth {
    type Error = DuesError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<BillingMonth> for String {
    fn from(month: BillingMonth) -> Self {
        month.to_string()
    }
}

impl From<NaiveDate> for BillingMonth {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;

    fn month(y: i32, m: u32) -> BillingMonth {
        BillingMonth::new(y, m).unwrap()
    }

    #[test]
    fn test_normalizes_to_first_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let m = BillingMonth::from_date(date);
        assert_eq!(m.first_day(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());

        let ts = Utc.with_ymd_and_hms(2025, 12, 15, 23, 59, 0).unwrap();
        assert_eq!(BillingMonth::from_datetime(ts), month(2025, 12));
    }

    #[test]
    fn test_succ_and_pred_cross_year() {
        assert_eq!(month(2024, 12).succ(), Some(month(2025, 1)));
        assert_eq!(month(2025, 1).pred(), Some(month(2024, 12)));
        assert_eq!(month(2024, 1).checked_add(14), Some(month(2025, 3)));
        assert_eq!(month(2024, 1).checked_add(-1), Some(month(2023, 12)));
    }

    #[test]
    fn test_months_until() {
        assert_eq!(month(2024, 11).months_until(month(2025, 2)), 3);
        assert_eq!(month(2025, 2).months_until(month(2024, 11)), -3);
        assert_eq!(month(2025, 2).months_until(month(2025, 2)), 0);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("2025-07".parse::<BillingMonth>().unwrap(), month(2025, 7));
        assert_eq!("2025-07-19".parse::<BillingMonth>().unwrap(), month(2025, 7));
        assert_eq!(month(987, 4).to_string(), "0987-04");

        assert!("2025-13".parse::<BillingMonth>().is_err());
        assert!("july".parse::<BillingMonth>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&month(2024, 2)).unwrap();
        assert_eq!(json, "\"2024-02\"");

        let back: BillingMonth = serde_json::from_str("\"2024-02-29\"").unwrap();
        assert_eq!(back, month(2024, 2));
    }

    #[test]
    fn test_current_follows_time_provider() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap(),
        ));
        let control = time.test_control().unwrap();
        assert_eq!(BillingMonth::current(&time), month(2025, 1));

        control.advance(chrono::Duration::days(1));
        assert_eq!(BillingMonth::current(&time), month(2025, 2));
    }
}
