//! Month-granularity date model
//!
//! Subscriptions and query windows are expressed in whole calendar months.
//! A [`Month`] is a `(year, month)` pair with no day or time component,
//! written as `MM-YYYY` on every textual boundary.
//!
//! # Examples
//!
//! ```
//! use subtrack_core::month::{Month, months_between};
//!
//! let start: Month = "11-2023".parse().unwrap();
//! let end: Month = "02-2024".parse().unwrap();
//!
//! // Both endpoints count
//! assert_eq!(months_between(start, end).unwrap(), 4);
//! assert_eq!(months_between(start, start).unwrap(), 1);
//! assert_eq!(end.to_string(), "02-2024");
//! ```

use chrono::Datelike;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not a valid `MM-YYYY` month
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid month '{input}': {reason}")]
pub struct MonthParseError {
    /// The rejected input
    pub input: String,
    /// What was wrong with it
    pub reason: &'static str,
}

/// Error raised by month arithmetic on misordered arguments
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthError {
    /// The range end precedes its start
    #[error("range end {end} precedes start {start}")]
    ReversedRange {
        /// Range start
        start: Month,
        /// Range end
        end: Month,
    },
}

/// A calendar month
///
/// Field order matters: the derived `Ord` compares the year first, then the
/// month, which is the total order months need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month, returning `None` when `month` is outside 1–12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing a chrono date or datetime
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse a strict `MM-YYYY` string
    ///
    /// Leading zeros are required: `"03-2024"` parses, `"3-2024"` does not.
    pub fn parse(input: &str) -> Result<Self, MonthParseError> {
        let fail = |reason| MonthParseError {
            input: input.to_string(),
            reason,
        };

        let bytes = input.as_bytes();
        if bytes.len() != 7 || bytes[2] != b'-' {
            return Err(fail("expected MM-YYYY"));
        }
        let (month_digits, year_digits) = (&bytes[..2], &bytes[3..]);
        if !month_digits.iter().chain(year_digits).all(u8::is_ascii_digit) {
            return Err(fail("expected MM-YYYY"));
        }

        let month = digits_value(month_digits);
        let year = digits_value(year_digits) as i32;
        Self::new(year, month).ok_or_else(|| fail("month must be between 01 and 12"))
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of the year, 1–12
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Months elapsed since January of year 0
    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

fn digits_value(digits: &[u8]) -> u32 {
    digits
        .iter()
        .fold(0, |acc, d| acc * 10 + u32::from(d - b'0'))
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Number of months from `start` to `end`, counting both endpoints
///
/// `months_between(m, m)` is 1. Passing `start > end` is a contract
/// violation and returns [`MonthError::ReversedRange`].
pub fn months_between(start: Month, end: Month) -> Result<u32, MonthError> {
    if start > end {
        return Err(MonthError::ReversedRange { start, end });
    }
    // Bounded by the u32 month and i32 year ranges, so the difference fits
    Ok((end.ordinal() - start.ordinal() + 1) as u32)
}

/// An inclusive, non-empty range of months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthRange {
    start: Month,
    end: Month,
}

impl MonthRange {
    /// Create a range, rejecting `end < start`
    pub fn new(start: Month, end: Month) -> Result<Self, MonthError> {
        if start > end {
            return Err(MonthError::ReversedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First month of the range
    pub fn start(&self) -> Month {
        self.start
    }

    /// Last month of the range
    pub fn end(&self) -> Month {
        self.end
    }

    /// Number of months covered, always at least 1
    pub fn month_count(&self) -> u32 {
        // Construction guarantees start <= end
        months_between(self.start, self.end).unwrap_or(0)
    }

    /// Clip the interval `[start, end]` to this range
    ///
    /// Returns `None` when the clipped interval is empty, including when the
    /// input interval is itself reversed.
    pub fn clip(&self, start: Month, end: Month) -> Option<MonthRange> {
        let effective_start = start.max(self.start);
        let effective_end = end.min(self.end);
        MonthRange::new(effective_start, effective_end).ok()
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn m(s: &str) -> Month {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_valid() {
        let month = Month::parse("03-2024").unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 3);
        assert_eq!(Month::parse("12-1999").unwrap(), Month::new(1999, 12).unwrap());
    }

    #[test]
    fn test_parse_rejects_loose_formats() {
        for input in [
            "3-2024", "03-24", "2024-03", " 03-2024", "03-2024 ", "03/2024", "0a-2024", "", "+3-2024",
        ] {
            assert!(Month::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_rejects_month_out_of_range() {
        let err = Month::parse("13-2024").unwrap_err();
        assert_eq!(err.reason, "month must be between 01 and 12");
        assert!(Month::parse("00-2024").is_err());
    }

    #[test]
    fn test_ordering_is_year_then_month() {
        assert!(m("12-2023") < m("01-2024"));
        assert!(m("02-2024") > m("01-2024"));
        assert_eq!(m("06-2024").max(m("05-2025")), m("05-2025"));
    }

    #[test]
    fn test_months_between_inclusive() {
        assert_eq!(months_between(m("03-2024"), m("03-2024")).unwrap(), 1);
        assert_eq!(months_between(m("01-2024"), m("12-2024")).unwrap(), 12);
        assert_eq!(months_between(m("11-2023"), m("02-2024")).unwrap(), 4);
    }

    #[test]
    fn test_months_between_reversed_is_error() {
        let err = months_between(m("05-2024"), m("01-2024")).unwrap_err();
        assert_eq!(
            err,
            MonthError::ReversedRange {
                start: m("05-2024"),
                end: m("01-2024")
            }
        );
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(Month::from_date(&date), m("06-2024"));
    }

    #[test]
    fn test_range_clip() {
        let window = MonthRange::new(m("02-2024"), m("02-2024")).unwrap();
        assert_eq!(
            window.clip(m("01-2024"), m("03-2024")),
            Some(MonthRange::new(m("02-2024"), m("02-2024")).unwrap())
        );
        assert_eq!(window.clip(m("03-2024"), m("06-2024")), None);

        // Reversed input interval never produces a range
        let wide = MonthRange::new(m("01-2023"), m("12-2023")).unwrap();
        assert_eq!(wide.clip(m("01-2024"), m("06-2024")), None);
    }

    #[test]
    fn test_range_rejects_reversed() {
        assert!(MonthRange::new(m("05-2024"), m("01-2024")).is_err());
        let range = MonthRange::new(m("01-2024"), m("05-2024")).unwrap();
        assert_eq!(range.month_count(), 5);
    }

    #[test]
    fn test_serde_uses_textual_form() {
        let json = serde_json::to_string(&m("07-2025")).unwrap();
        assert_eq!(json, "\"07-2025\"");
        let parsed: Month = serde_json::from_str("\"09-2020\"").unwrap();
        assert_eq!(parsed, m("09-2020"));
        assert!(serde_json::from_str::<Month>("\"9-2020\"").is_err());
    }
}
