use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PayrollError;
use crate::payroll::period::SalaryPeriod;

/// Weekdays that count as working days when deriving `total_working_days`
/// for a month. Defaults to Monday through Friday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDaysConfig {
    weekdays: HashSet<Weekday>,
}

impl WorkingDaysConfig {
    pub fn from_weekdays(weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        WorkingDaysConfig {
            weekdays: weekdays.into_iter().collect(),
        }
    }

    /// Parses a comma-separated weekday list, e.g. `"Mon,Tue,Wed,Thu,Fri"`.
    pub fn parse_list(s: &str) -> Result<Self, PayrollError> {
        let mut weekdays = HashSet::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let weekday: Weekday = part.parse().map_err(|_| {
                PayrollError::validation(format!("invalid weekday '{}' in working days list", part))
            })?;
            weekdays.insert(weekday);
        }
        Ok(WorkingDaysConfig { weekdays })
    }

    pub fn is_working(&self, date: NaiveDate) -> bool {
        self.weekdays.contains(&date.weekday())
    }

    pub fn working_days_in(&self, period: &SalaryPeriod) -> u32 {
        let last = period.last_day();
        let mut day = period.first_day();
        let mut count = 0;
        while day <= last {
            if self.weekdays.contains(&day.weekday()) {
                count += 1;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        count
    }
}

impl Default for WorkingDaysConfig {
    fn default() -> Self {
        WorkingDaysConfig::from_weekdays([
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ])
    }
}

/// Aggregated attendance for one staff member and one salary month, as supplied
/// by the attendance subsystem. `lop_days` arrives already reconciled against
/// approved leave; a day on approved leave is never loss-of-pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSummary {
    #[schema(example = 31)]
    pub total_calendar_days: u32,
    #[schema(example = 22)]
    pub total_working_days: u32,
    #[schema(example = 20)]
    pub present_days: u32,
    #[schema(example = 1)]
    pub late_days: u32,
    #[schema(example = 0)]
    pub half_days: u32,
    #[schema(example = 2)]
    pub absent_days: u32,
    #[schema(example = 0)]
    pub no_show_days: u32,
    #[schema(example = 0)]
    pub unpaid_leave_days: u32,
    /// Days that actually reduce pay. Derived upstream, never entered directly.
    #[schema(example = 2)]
    pub lop_days: u32,
}

impl AttendanceSummary {
    pub fn validate(&self) -> Result<(), PayrollError> {
        if self.lop_days > self.total_working_days {
            return Err(PayrollError::validation(format!(
                "lop_days ({}) exceeds total_working_days ({})",
                self.lop_days, self.total_working_days
            )));
        }
        if self.total_working_days > self.total_calendar_days {
            return Err(PayrollError::validation(format!(
                "total_working_days ({}) exceeds total_calendar_days ({})",
                self.total_working_days, self.total_calendar_days
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_counts_weekdays() {
        let config = WorkingDaysConfig::default();
        // March 2025 starts on a Saturday; 5 Saturdays + 5 Sundays.
        let march = SalaryPeriod::new(2025, 3).unwrap();
        assert_eq!(config.working_days_in(&march), 21);
        // Leap February 2024: 29 days, 4 Saturdays + 4 Sundays.
        let feb = SalaryPeriod::new(2024, 2).unwrap();
        assert_eq!(config.working_days_in(&feb), 21);
    }

    #[test]
    fn custom_weekday_set() {
        let weekends = WorkingDaysConfig::from_weekdays([Weekday::Sat, Weekday::Sun]);
        let march = SalaryPeriod::new(2025, 3).unwrap();
        assert_eq!(weekends.working_days_in(&march), 10);

        let none = WorkingDaysConfig::from_weekdays([]);
        assert_eq!(none.working_days_in(&march), 0);
    }

    #[test]
    fn parses_weekday_list() {
        let config = WorkingDaysConfig::parse_list("Mon, Tue,Wed,Thu,Fri").unwrap();
        assert_eq!(config, WorkingDaysConfig::default());
        assert!(WorkingDaysConfig::parse_list("Mon,Funday").is_err());
    }

    #[test]
    fn lop_days_must_not_exceed_working_days() {
        let summary = AttendanceSummary {
            total_calendar_days: 31,
            total_working_days: 22,
            present_days: 0,
            late_days: 0,
            half_days: 0,
            absent_days: 23,
            no_show_days: 0,
            unpaid_leave_days: 0,
            lop_days: 23,
        };
        assert!(summary.validate().is_err());

        let ok = AttendanceSummary {
            lop_days: 22,
            absent_days: 22,
            ..summary
        };
        assert!(ok.validate().is_ok());
    }
}
