//! Lookback windows for rate history

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum HistoryPeriod {
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    FiveYears,
}

impl Display for HistoryPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                HistoryPeriod::FiveDays => "5D",
                HistoryPeriod::OneMonth => "1M",
                HistoryPeriod::ThreeMonths => "3M",
                HistoryPeriod::SixMonths => "6M",
                HistoryPeriod::OneYear => "1Y",
                HistoryPeriod::FiveYears => "5Y",
            }
        )
    }
}

impl HistoryPeriod {
    pub fn to_duration(&self) -> Duration {
        match self {
            HistoryPeriod::FiveDays => Duration::days(5),
            HistoryPeriod::OneMonth => Duration::days(30),
            HistoryPeriod::ThreeMonths => Duration::days(91),
            HistoryPeriod::SixMonths => Duration::days(182),
            HistoryPeriod::OneYear => Duration::days(365),
            HistoryPeriod::FiveYears => Duration::days(365 * 5),
        }
    }

    /// First day of the window ending on `end`.
    pub fn start_from(&self, end: NaiveDate) -> NaiveDate {
        end - self.to_duration()
    }
}

impl FromStr for HistoryPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "5D" => Ok(HistoryPeriod::FiveDays),
            "1M" => Ok(HistoryPeriod::OneMonth),
            "3M" => Ok(HistoryPeriod::ThreeMonths),
            "6M" => Ok(HistoryPeriod::SixMonths),
            "1Y" => Ok(HistoryPeriod::OneYear),
            "5Y" => Ok(HistoryPeriod::FiveYears),
            _ => Err(anyhow::anyhow!("Invalid history period: {}", s)),
        }
    }
}
