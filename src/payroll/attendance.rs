use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::error::PayrollError;
use crate::model::attendance::{AttendanceSummary, WorkingDaysConfig};
use crate::payroll::period::SalaryPeriod;

/// Monthly attendance aggregation, consumed by the calculator. The clock-in/out
/// subsystem owns the day-level records; payroll only reads the per-month
/// roll-up.
#[async_trait]
pub trait AttendanceProvider: Send + Sync {
    async fn monthly_summary(
        &self,
        staff_member_id: u64,
        period: SalaryPeriod,
    ) -> Result<AttendanceSummary, PayrollError>;
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    present_days: u32,
    late_days: u32,
    half_days: u32,
    absent_days: u32,
    no_show_days: u32,
    unpaid_leave_days: u32,
    lop_days: u32,
}

/// Reads the roll-up the attendance subsystem maintains in
/// `attendance_summaries` and fills in the calendar/working-day counts from
/// the period and the working-days configuration.
pub struct SqlAttendanceProvider {
    pool: MySqlPool,
    working_days: WorkingDaysConfig,
}

impl SqlAttendanceProvider {
    pub fn new(pool: MySqlPool, working_days: WorkingDaysConfig) -> Self {
        SqlAttendanceProvider { pool, working_days }
    }
}

#[async_trait]
impl AttendanceProvider for SqlAttendanceProvider {
    async fn monthly_summary(
        &self,
        staff_member_id: u64,
        period: SalaryPeriod,
    ) -> Result<AttendanceSummary, PayrollError> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT present_days, late_days, half_days, absent_days,
                   no_show_days, unpaid_leave_days, lop_days
            FROM attendance_summaries
            WHERE staff_member_id = ? AND period = ?
            "#,
        )
        .bind(staff_member_id)
        .bind(period.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or(PayrollError::AttendanceMissing {
            staff_member_id,
            period,
        })?;

        let summary = AttendanceSummary {
            total_calendar_days: period.total_calendar_days(),
            total_working_days: self.working_days.working_days_in(&period),
            present_days: row.present_days,
            late_days: row.late_days,
            half_days: row.half_days,
            absent_days: row.absent_days,
            no_show_days: row.no_show_days,
            unpaid_leave_days: row.unpaid_leave_days,
            lop_days: row.lop_days,
        };
        summary.validate()?;
        Ok(summary)
    }
}
