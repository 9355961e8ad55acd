use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PayrollError;

/// One salary month, rendered as `YYYY-MM` everywhere (API, database, logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SalaryPeriod {
    year: i32,
    month: u32,
}

impl SalaryPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, PayrollError> {
        if !(1..=12).contains(&month) {
            return Err(PayrollError::validation(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        if !(1970..=2100).contains(&year) {
            return Err(PayrollError::validation(format!(
                "year must be between 1970 and 2100, got {}",
                year
            )));
        }
        Ok(SalaryPeriod { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        SalaryPeriod {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated year/month")
    }

    /// Last calendar day of the month; the as-of date for compensation resolution.
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .expect("validated year/month")
            .pred_opt()
            .expect("first of month has a predecessor")
    }

    pub fn total_calendar_days(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for SalaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for SalaryPeriod {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PayrollError::validation(format!("invalid period '{}', expected YYYY-MM", s)))?;
        let year: i32 = year
            .parse()
            .map_err(|_| PayrollError::validation(format!("invalid year in period '{}'", s)))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PayrollError::validation(format!("invalid month in period '{}'", s)))?;
        SalaryPeriod::new(year, month)
    }
}

impl Serialize for SalaryPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SalaryPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Cutoff policy for payroll generation.
///
/// Past months are always open. The current month opens on `cutoff_day` so the
/// full month's attendance is captured before anyone is paid. Future months are
/// rejected outright.
#[derive(Debug, Clone, Copy)]
pub struct GenerationPolicy {
    cutoff_day: u32,
}

pub const DEFAULT_CUTOFF_DAY: u32 = 25;

impl GenerationPolicy {
    /// Fails unless `cutoff_day` is a real day of month; a cutoff of 0 would
    /// disable the policy and one past 31 would never arrive.
    pub fn new(cutoff_day: u32) -> Result<Self, PayrollError> {
        if !(1..=31).contains(&cutoff_day) {
            return Err(PayrollError::validation(format!(
                "cutoff day must be between 1 and 31, got {}",
                cutoff_day
            )));
        }
        Ok(GenerationPolicy { cutoff_day })
    }

    pub fn check(&self, period: SalaryPeriod, today: NaiveDate) -> Result<(), PayrollError> {
        let current = SalaryPeriod::from_date(today);
        if period > current {
            return Err(PayrollError::FuturePeriod(period));
        }
        if period == current && today.day() < self.cutoff_day {
            return Err(PayrollError::BeforeCutoff {
                period,
                cutoff_day: self.cutoff_day,
            });
        }
        Ok(())
    }
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        GenerationPolicy {
            cutoff_day: DEFAULT_CUTOFF_DAY,
        }
    }
}
