use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PayrollError;
use crate::model::attendance::AttendanceSummary;
use crate::model::compensation::{CalculationType, Compensation};
use crate::model::slip::PayLine;
use crate::payroll::attendance::AttendanceProvider;
use crate::payroll::period::SalaryPeriod;
use crate::payroll::resolver::CompensationSource;

/// Name of the loss-of-pay line in the deductions breakdown.
pub const LOP_LINE_NAME: &str = "Loss of Pay";

const MONEY_SCALE: u32 = 2;

/// Round-half-up to currency precision. Applied once, to the LOP deduction;
/// every other line and total is an exact sum so the slip stays internally
/// consistent with its own displayed lines.
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalaryTotals {
    #[schema(value_type = String, example = "30000.00")]
    pub base_salary: Decimal,
    #[schema(value_type = String, example = "32000.00")]
    pub total_earnings: Decimal,
    #[schema(value_type = String, example = "6327.27")]
    pub total_deductions: Decimal,
    #[schema(value_type = String, example = "25672.73")]
    pub net_salary: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaySection {
    pub breakdown: Vec<PayLine>,
    #[schema(value_type = String, example = "2000.00")]
    pub total: Decimal,
}

/// Full earnings/deductions picture for one staff member and one month.
/// Produced by [`calculate`]; persisted only when the generator maps it into a
/// salary slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayrollBreakdown {
    pub attendance: AttendanceSummary,
    pub salary: SalaryTotals,
    pub benefits: PaySection,
    pub deductions: PaySection,
}

fn line_amount(
    calculation_type: CalculationType,
    amount: Decimal,
    base_salary: Decimal,
    name: &str,
) -> Result<Decimal, PayrollError> {
    if amount.is_sign_negative() {
        return Err(PayrollError::validation(format!(
            "'{}' has a negative amount",
            name
        )));
    }
    match calculation_type {
        CalculationType::Fixed => Ok(amount),
        CalculationType::Percentage => {
            if amount > Decimal::from(100) {
                return Err(PayrollError::validation(format!(
                    "'{}' percentage must be between 0 and 100, got {}",
                    name, amount
                )));
            }
            Ok(base_salary * amount / Decimal::from(100))
        }
    }
}

/// Pure payroll computation: attendance + resolved compensation in, breakdown
/// out. Deterministic and side-effect-free; identical inputs yield identical
/// breakdowns.
///
/// Net pay is deliberately not clamped when deductions exceed earnings; that
/// is a policy concern, not a calculation one.
pub fn calculate(
    attendance: &AttendanceSummary,
    compensation: &Compensation,
) -> Result<PayrollBreakdown, PayrollError> {
    attendance.validate()?;

    let base_salary = compensation.base_salary;
    if base_salary.is_sign_negative() {
        return Err(PayrollError::validation("base salary must not be negative"));
    }

    // A month with no configured working days is valid; the per-day rate is
    // zero rather than a division by zero.
    let per_day_rate = if attendance.total_working_days == 0 {
        Decimal::ZERO
    } else {
        base_salary / Decimal::from(attendance.total_working_days)
    };
    let lop_deduction = round_money(per_day_rate * Decimal::from(attendance.lop_days));

    let mut benefit_lines = Vec::with_capacity(compensation.benefits.len());
    for benefit in &compensation.benefits {
        benefit_lines.push(PayLine {
            name: benefit.name.clone(),
            amount: line_amount(
                benefit.calculation_type,
                benefit.amount,
                base_salary,
                &benefit.name,
            )?,
            taxable_or_statutory: benefit.is_taxable,
        });
    }
    let total_benefits: Decimal = benefit_lines.iter().map(|line| line.amount).sum();

    let mut deduction_lines = Vec::with_capacity(compensation.deductions.len() + 1);
    for deduction in &compensation.deductions {
        deduction_lines.push(PayLine {
            name: deduction.name.clone(),
            amount: line_amount(
                deduction.calculation_type,
                deduction.amount,
                base_salary,
                &deduction.name,
            )?,
            taxable_or_statutory: deduction.is_statutory,
        });
    }
    if attendance.lop_days > 0 {
        deduction_lines.push(PayLine {
            name: LOP_LINE_NAME.to_string(),
            amount: lop_deduction,
            taxable_or_statutory: false,
        });
    }
    let total_deductions: Decimal = deduction_lines.iter().map(|line| line.amount).sum();

    let total_earnings = base_salary + total_benefits;
    let net_salary = total_earnings - total_deductions;

    Ok(PayrollBreakdown {
        attendance: attendance.clone(),
        salary: SalaryTotals {
            base_salary,
            total_earnings,
            total_deductions,
            net_salary,
        },
        benefits: PaySection {
            breakdown: benefit_lines,
            total: total_benefits,
        },
        deductions: PaySection {
            breakdown: deduction_lines,
            total: total_deductions,
        },
    })
}

/// Fetches attendance and compensation for a period and runs [`calculate`].
/// Compensation is resolved as of the last calendar day of the month so
/// assignments starting or ending mid-month land in the right period.
pub struct PayrollCalculator<A, C> {
    attendance: A,
    compensation: C,
}

impl<A, C> PayrollCalculator<A, C>
where
    A: AttendanceProvider,
    C: CompensationSource,
{
    pub fn new(attendance: A, compensation: C) -> Self {
        PayrollCalculator {
            attendance,
            compensation,
        }
    }

    pub async fn calculate(
        &self,
        staff_member_id: u64,
        period: SalaryPeriod,
    ) -> Result<PayrollBreakdown, PayrollError> {
        let summary = self
            .attendance
            .monthly_summary(staff_member_id, period)
            .await?;
        let compensation = self
            .compensation
            .resolve(staff_member_id, period.last_day())
            .await?;
        calculate(&summary, &compensation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::compensation::{BenefitAssignment, DeductionAssignment};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn full_month_attendance(working_days: u32, lop_days: u32) -> AttendanceSummary {
        AttendanceSummary {
            total_calendar_days: 31,
            total_working_days: working_days,
            present_days: working_days.saturating_sub(lop_days),
            late_days: 0,
            half_days: 0,
            absent_days: lop_days,
            no_show_days: 0,
            unpaid_leave_days: 0,
            lop_days,
        }
    }

    fn benefit(name: &str, calculation_type: CalculationType, amount: Decimal) -> BenefitAssignment {
        BenefitAssignment {
            id: 1,
            staff_member_id: 1001,
            name: name.into(),
            is_taxable: true,
            calculation_type,
            amount,
            effective_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            effective_until: None,
            is_active: true,
        }
    }

    fn deduction(
        name: &str,
        calculation_type: CalculationType,
        amount: Decimal,
    ) -> DeductionAssignment {
        DeductionAssignment {
            id: 1,
            staff_member_id: 1001,
            name: name.into(),
            is_statutory: true,
            calculation_type,
            amount,
            effective_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            effective_until: None,
            is_active: true,
        }
    }

    fn compensation(
        base_salary: Decimal,
        benefits: Vec<BenefitAssignment>,
        deductions: Vec<DeductionAssignment>,
    ) -> Compensation {
        Compensation {
            base_salary,
            benefits,
            deductions,
        }
    }

    #[test]
    fn fixed_benefit_full_attendance() {
        let attendance = full_month_attendance(22, 0);
        let comp = compensation(
            dec!(30000),
            vec![benefit("Transport", CalculationType::Fixed, dec!(2000))],
            vec![],
        );

        let result = calculate(&attendance, &comp).unwrap();
        assert_eq!(result.salary.total_earnings, dec!(32000));
        assert_eq!(result.salary.total_deductions, dec!(0));
        assert_eq!(result.salary.net_salary, dec!(32000));
        assert_eq!(result.benefits.total, dec!(2000));
        assert!(result.deductions.breakdown.is_empty());
    }

    #[test]
    fn percentage_deduction_with_lop() {
        let attendance = full_month_attendance(22, 2);
        let comp = compensation(
            dec!(30000),
            vec![],
            vec![deduction("PF", CalculationType::Percentage, dec!(12))],
        );

        let result = calculate(&attendance, &comp).unwrap();
        // 30000 / 22 * 2, rounded half-up once.
        let lop_line = result
            .deductions
            .breakdown
            .iter()
            .find(|line| line.name == LOP_LINE_NAME)
            .unwrap();
        assert_eq!(lop_line.amount, dec!(2727.27));
        assert!(!lop_line.taxable_or_statutory);

        let pf_line = result
            .deductions
            .breakdown
            .iter()
            .find(|line| line.name == "PF")
            .unwrap();
        assert_eq!(pf_line.amount, dec!(3600));

        assert_eq!(result.salary.total_deductions, dec!(6327.27));
        assert_eq!(result.salary.net_salary, dec!(23672.73));
    }

    #[test]
    fn zero_working_days_gives_zero_lop() {
        let attendance = AttendanceSummary {
            total_calendar_days: 31,
            total_working_days: 0,
            present_days: 0,
            late_days: 0,
            half_days: 0,
            absent_days: 0,
            no_show_days: 0,
            unpaid_leave_days: 0,
            lop_days: 0,
        };
        let comp = compensation(dec!(30000), vec![], vec![]);

        let result = calculate(&attendance, &comp).unwrap();
        assert_eq!(result.salary.total_deductions, dec!(0));
        assert_eq!(result.salary.net_salary, dec!(30000));
    }

    #[test]
    fn breakdown_sums_match_totals() {
        let attendance = full_month_attendance(21, 3);
        let comp = compensation(
            dec!(45000),
            vec![
                benefit("Housing", CalculationType::Percentage, dec!(40)),
                benefit("Transport", CalculationType::Fixed, dec!(1500)),
                benefit("Medical", CalculationType::Fixed, dec!(800)),
            ],
            vec![
                deduction("PF", CalculationType::Percentage, dec!(12)),
                deduction("Tax", CalculationType::Fixed, dec!(2500)),
            ],
        );

        let result = calculate(&attendance, &comp).unwrap();
        let benefit_sum: Decimal = result.benefits.breakdown.iter().map(|l| l.amount).sum();
        let deduction_sum: Decimal = result.deductions.breakdown.iter().map(|l| l.amount).sum();
        assert_eq!(benefit_sum, result.benefits.total);
        assert_eq!(deduction_sum, result.deductions.total);
        assert_eq!(
            result.salary.total_earnings - result.salary.total_deductions,
            result.salary.net_salary
        );
    }

    #[test]
    fn calculation_is_deterministic() {
        let attendance = full_month_attendance(22, 1);
        let comp = compensation(
            dec!(30000),
            vec![benefit("Housing", CalculationType::Percentage, dec!(25))],
            vec![deduction("PF", CalculationType::Percentage, dec!(12))],
        );

        let first = calculate(&attendance, &comp).unwrap();
        let second = calculate(&attendance, &comp).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn net_pay_may_go_negative() {
        let attendance = full_month_attendance(22, 0);
        let comp = compensation(
            dec!(1000),
            vec![],
            vec![deduction("Garnishment", CalculationType::Fixed, dec!(5000))],
        );

        let result = calculate(&attendance, &comp).unwrap();
        assert_eq!(result.salary.net_salary, dec!(-4000));
    }

    #[test]
    fn percentage_outside_bounds_is_rejected() {
        let attendance = full_month_attendance(22, 0);
        let comp = compensation(
            dec!(30000),
            vec![benefit("Housing", CalculationType::Percentage, dec!(150))],
            vec![],
        );
        assert!(matches!(
            calculate(&attendance, &comp),
            Err(PayrollError::Validation(_))
        ));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let attendance = full_month_attendance(22, 0);
        let comp = compensation(
            dec!(30000),
            vec![],
            vec![deduction("Tax", CalculationType::Fixed, dec!(-100))],
        );
        assert!(matches!(
            calculate(&attendance, &comp),
            Err(PayrollError::Validation(_))
        ));
    }

    #[test]
    fn corrupt_attendance_is_rejected() {
        let mut attendance = full_month_attendance(22, 0);
        attendance.lop_days = 25;
        let comp = compensation(dec!(30000), vec![], vec![]);
        assert!(matches!(
            calculate(&attendance, &comp),
            Err(PayrollError::Validation(_))
        ));
    }
}
