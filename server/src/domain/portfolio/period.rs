//! Time period filters
//!
//! Periods use calendar arithmetic (chrono month/year subtraction), not
//! fixed-day approximations, so month-length and leap-year boundaries behave
//! the way a calendar does.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An unrecognized period literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time period: {0}")]
pub struct InvalidTimePeriod(pub String);

/// Supported lookback periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum TimePeriod {
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "1year")]
    OneYear,
    #[serde(rename = "3years")]
    ThreeYears,
    #[serde(rename = "5years")]
    FiveYears,
    #[serde(rename = "10years")]
    TenYears,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 6] = [
        Self::ThirtyDays,
        Self::ThreeMonths,
        Self::OneYear,
        Self::ThreeYears,
        Self::FiveYears,
        Self::TenYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThirtyDays => "30days",
            Self::ThreeMonths => "3months",
            Self::OneYear => "1year",
            Self::ThreeYears => "3years",
            Self::FiveYears => "5years",
            Self::TenYears => "10years",
        }
    }

    /// The inclusive start date for this period, looking back from `now`
    pub fn start_date(&self, now: DateTime<Utc>) -> NaiveDate {
        let today = now.date_naive();
        let start = match self {
            Self::ThirtyDays => today.checked_sub_days(Days::new(30)),
            Self::ThreeMonths => today.checked_sub_months(Months::new(3)),
            Self::OneYear => today.checked_sub_months(Months::new(12)),
            Self::ThreeYears => today.checked_sub_months(Months::new(36)),
            Self::FiveYears => today.checked_sub_months(Months::new(60)),
            Self::TenYears => today.checked_sub_months(Months::new(120)),
        };
        // Subtraction only fails below year -262144; clamp to today
        start.unwrap_or(today)
    }
}

impl FromStr for TimePeriod {
    type Err = InvalidTimePeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "30days" => Ok(Self::ThirtyDays),
            "3months" => Ok(Self::ThreeMonths),
            "1year" => Ok(Self::OneYear),
            "3years" => Ok(Self::ThreeYears),
            "5years" => Ok(Self::FiveYears),
            "10years" => Ok(Self::TenYears),
            other => Err(InvalidTimePeriod(other.to_string())),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
