//! Round Timestamp Types
//!
//! Every simulation round is one month. Rounds carry both the monotonic round
//! counter and a human-readable calendar date.
//!
//! # Example
//!
//! ```
//! use labor_events::{MarketDate, RoundStamp};
//!
//! let stamp = RoundStamp::from_round(14);
//! assert_eq!(stamp.date, MarketDate::new(2, 3));
//! assert_eq!(stamp.date.to_string(), "year_2.month_03");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of rounds (months) in a simulated year.
pub const MONTHS_PER_YEAR: u64 = 12;

/// Human-readable calendar date of a round.
///
/// Serializes to strings like "year_3.month_07".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarketDate {
    pub year: u32,
    pub month: u8,
}

impl MarketDate {
    pub fn new(year: u32, month: u8) -> Self {
        Self { year, month }
    }

    /// Maps a 0-based round index onto the calendar.
    pub fn from_round(round: u64) -> Self {
        Self {
            year: (round / MONTHS_PER_YEAR) as u32 + 1,
            month: (round % MONTHS_PER_YEAR) as u8 + 1,
        }
    }
}

impl fmt::Display for MarketDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year_{}.month_{:02}", self.year, self.month)
    }
}

/// Error type for parsing MarketDate from strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseDateError {
    InvalidFormat(String),
    InvalidYear(String),
    InvalidMonth(String),
}

impl fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDateError::InvalidFormat(s) => {
                write!(f, "invalid date format: '{}', expected 'year_N.month_MM'", s)
            }
            ParseDateError::InvalidYear(s) => write!(f, "invalid year: '{}'", s),
            ParseDateError::InvalidMonth(s) => write!(f, "invalid month: '{}'", s),
        }
    }
}

impl std::error::Error for ParseDateError {}

impl FromStr for MarketDate {
    type Err = ParseDateError;

    /// Parses a MarketDate from a string like "year_3.month_07".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year_part, month_part) = s
            .split_once('.')
            .ok_or_else(|| ParseDateError::InvalidFormat(s.to_string()))?;

        let year = year_part
            .strip_prefix("year_")
            .ok_or_else(|| ParseDateError::InvalidFormat(s.to_string()))?
            .parse::<u32>()
            .map_err(|_| ParseDateError::InvalidYear(year_part.to_string()))?;

        let month = month_part
            .strip_prefix("month_")
            .ok_or_else(|| ParseDateError::InvalidFormat(s.to_string()))?
            .parse::<u8>()
            .map_err(|_| ParseDateError::InvalidMonth(month_part.to_string()))?;

        if month == 0 || month as u64 > MONTHS_PER_YEAR {
            return Err(ParseDateError::InvalidMonth(month_part.to_string()));
        }

        Ok(MarketDate { year, month })
    }
}

impl Serialize for MarketDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MarketDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A point in simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStamp {
    /// 0-based round counter.
    pub round: u64,
    pub date: MarketDate,
}

impl RoundStamp {
    pub fn from_round(round: u64) -> Self {
        Self {
            round,
            date: MarketDate::from_round(round),
        }
    }
}

impl fmt::Display for RoundStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {} ({})", self.round, self.date)
    }
}
