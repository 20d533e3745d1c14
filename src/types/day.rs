//! Day classification types for the business calendar.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a calendar date for volume modeling.
///
/// Derived purely from the date; never stored. Weekend days get their own
/// variants because Saturday and Sunday traffic scale differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl DayType {
    /// Classify a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
            _ => Self::Weekday,
        }
    }

    /// Parse a day type from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weekday" => Some(Self::Weekday),
            "saturday" => Some(Self::Saturday),
            "sunday" => Some(Self::Sunday),
            _ => None,
        }
    }

    /// Whether this day falls on a weekend.
    pub fn is_weekend(&self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekday => write!(f, "weekday"),
            Self::Saturday => write!(f, "saturday"),
            Self::Sunday => write!(f, "sunday"),
        }
    }
}

/// Direction for business-day shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftDirection {
    /// Later dates.
    Forward,
    /// Earlier dates.
    Backward,
}

/// Inclusive day-type counts over a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTypeCounts {
    /// Number of Monday-through-Friday days.
    pub business_days: u64,
    /// Number of Saturdays.
    pub saturdays: u64,
    /// Number of Sundays.
    pub sundays: u64,
}

impl DayTypeCounts {
    /// Total days counted.
    pub fn total(&self) -> u64 {
        self.business_days + self.saturdays + self.sundays
    }
}
