//! Data models for the bookstore

pub mod book;
pub mod loan;
pub mod sale;

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// Re-export commonly used types
pub use book::{Book, BookFilter, BookInput, BookQuery, BookSort, NewBook, StockAdjustment};
pub use loan::{BorrowerEmail, CreateLoan, Loan, LoanDetails, LoanStatus, NewLoan};
pub use sale::{CreateSale, NewSale, Sale, SaleDetails};

/// Storage and wire format for every timestamp column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// UTC wall-clock time truncated to whole seconds.
///
/// Persisted as `TEXT` so both database engines sort it lexicographically in
/// chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().naive_utc().trunc_subsecs(0))
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// `None` when the result leaves chrono's representable range
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value.trunc_subsecs(0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map(Self)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = chrono::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
            .into()
    }

    #[test]
    fn test_storage_format() {
        let ts = at(2024, 3, 9, 7, 5, 1);
        assert_eq!(ts.to_string(), "2024-03-09 07:05:01");
        assert_eq!("2024-03-09 07:05:01".parse::<Timestamp>().unwrap(), ts);
    }

    #[test]
    fn test_now_has_no_subseconds() {
        let now = Timestamp::now();
        assert_eq!(now.as_naive().nanosecond(), 0);
    }

    #[test]
    fn test_add_days_crosses_month() {
        let ts = at(2024, 1, 30, 12, 0, 0);
        assert_eq!(ts.checked_add_days(3).unwrap(), at(2024, 2, 2, 12, 0, 0));
    }

    #[test]
    fn test_add_days_overflow() {
        assert!(Timestamp::now().checked_add_days(i64::MAX).is_none());
    }

    #[test]
    fn test_serde_uses_storage_format() {
        let ts = at(2008, 8, 1, 0, 0, 0);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2008-08-01 00:00:00\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
        assert!(serde_json::from_str::<Timestamp>("\"2008-08-01T00:00:00Z\"").is_err());
    }
}
