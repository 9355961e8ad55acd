use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::error::PayrollError;
use crate::model::compensation::{
    BenefitAssignment, CalculationType, Compensation, DeductionAssignment,
};
use crate::model::staff::StaffMember;

/// Resolves the active compensation picture for one staff member as of a date.
/// Callers pass the last day of the salary month so assignments starting or
/// ending mid-month are included for that period.
#[async_trait]
pub trait CompensationSource: Send + Sync {
    async fn resolve(
        &self,
        staff_member_id: u64,
        as_of: NaiveDate,
    ) -> Result<Compensation, PayrollError>;
}

#[derive(sqlx::FromRow)]
struct AssignmentRow {
    id: u64,
    staff_member_id: u64,
    name: String,
    flag: bool,
    calculation_type: String,
    amount: Decimal,
    effective_from: NaiveDate,
    effective_until: Option<NaiveDate>,
    is_active: bool,
}

pub struct SqlCompensationSource {
    pool: MySqlPool,
}

impl SqlCompensationSource {
    pub fn new(pool: MySqlPool) -> Self {
        SqlCompensationSource { pool }
    }
}

#[async_trait]
impl CompensationSource for SqlCompensationSource {
    async fn resolve(
        &self,
        staff_member_id: u64,
        as_of: NaiveDate,
    ) -> Result<Compensation, PayrollError> {
        let staff = sqlx::query_as::<_, StaffMember>(
            r#"
            SELECT id, staff_code, first_name, last_name, email,
                   base_salary, hire_date, status
            FROM staff_members
            WHERE id = ?
            "#,
        )
        .bind(staff_member_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(PayrollError::StaffNotFound(staff_member_id))?;

        let benefit_rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT ba.id, ba.staff_member_id, bt.name, bt.is_taxable AS flag,
                   ba.calculation_type, ba.amount,
                   ba.effective_from, ba.effective_until, ba.is_active
            FROM benefit_assignments ba
            JOIN benefit_types bt ON bt.id = ba.benefit_type_id
            WHERE ba.staff_member_id = ?
              AND ba.is_active = TRUE
              AND ba.effective_from <= ?
              AND (ba.effective_until IS NULL OR ba.effective_until >= ?)
            ORDER BY ba.id
            "#,
        )
        .bind(staff_member_id)
        .bind(as_of)
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;

        let deduction_rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT da.id, da.staff_member_id, wt.name, wt.is_statutory AS flag,
                   da.calculation_type, da.amount,
                   da.effective_from, da.effective_until, da.is_active
            FROM deduction_assignments da
            JOIN withholding_types wt ON wt.id = da.withholding_type_id
            WHERE da.staff_member_id = ?
              AND da.is_active = TRUE
              AND da.effective_from <= ?
              AND (da.effective_until IS NULL OR da.effective_until >= ?)
            ORDER BY da.id
            "#,
        )
        .bind(staff_member_id)
        .bind(as_of)
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;

        let mut benefits = Vec::with_capacity(benefit_rows.len());
        for row in benefit_rows {
            benefits.push(BenefitAssignment {
                id: row.id,
                staff_member_id: row.staff_member_id,
                name: row.name,
                is_taxable: row.flag,
                calculation_type: CalculationType::parse(&row.calculation_type)?,
                amount: row.amount,
                effective_from: row.effective_from,
                effective_until: row.effective_until,
                is_active: row.is_active,
            });
        }

        let mut deductions = Vec::with_capacity(deduction_rows.len());
        for row in deduction_rows {
            deductions.push(DeductionAssignment {
                id: row.id,
                staff_member_id: row.staff_member_id,
                name: row.name,
                is_statutory: row.flag,
                calculation_type: CalculationType::parse(&row.calculation_type)?,
                amount: row.amount,
                effective_from: row.effective_from,
                effective_until: row.effective_until,
                is_active: row.is_active,
            });
        }

        Ok(Compensation {
            base_salary: staff.base_salary,
            benefits,
            deductions,
        })
    }
}
