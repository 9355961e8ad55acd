use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::PayrollError;
use crate::model::slip::{NewSalarySlip, SalarySlip};
use crate::payroll::attendance::AttendanceProvider;
use crate::payroll::calculator::{PayrollBreakdown, PayrollCalculator};
use crate::payroll::period::{GenerationPolicy, SalaryPeriod};
use crate::payroll::resolver::CompensationSource;
use crate::store::slips::SlipStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    Duplicate,
    Policy,
    Failed,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SkippedMember {
    #[schema(example = 1001)]
    pub staff_member_id: u64,
    pub reason: SkipReason,
    #[schema(example = "salary slip already exists for staff member 1001 in 2025-03")]
    pub detail: String,
}

/// Per-member outcome of one generation request. A partially successful batch
/// is a valid final state; nothing is rolled back.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerationOutcome {
    pub created: Vec<SalarySlip>,
    pub skipped: Vec<SkippedMember>,
}

/// Orchestrates the calculator across a batch of staff members for one period,
/// enforcing the cutoff policy and the one-slip-per-period invariant.
pub struct PayrollGenerator<A, C, S> {
    calculator: PayrollCalculator<A, C>,
    slips: S,
    policy: GenerationPolicy,
}

impl<A, C, S> PayrollGenerator<A, C, S>
where
    A: AttendanceProvider,
    C: CompensationSource,
    S: SlipStore,
{
    pub fn new(attendance: A, compensation: C, slips: S, policy: GenerationPolicy) -> Self {
        PayrollGenerator {
            calculator: PayrollCalculator::new(attendance, compensation),
            slips,
            policy,
        }
    }

    /// Generates slips for `staff_member_ids` in `period`. One member's failure
    /// never aborts the others; policy violations and duplicates come back as
    /// `skipped` entries, not errors.
    ///
    /// `today` is supplied by the caller so the cutoff check is deterministic.
    pub async fn generate(
        &self,
        staff_member_ids: &[u64],
        period: SalaryPeriod,
        today: NaiveDate,
    ) -> GenerationOutcome {
        let mut created = Vec::new();
        let mut skipped = Vec::new();

        if let Err(e) = self.policy.check(period, today) {
            let detail = e.to_string();
            for &staff_member_id in staff_member_ids {
                skipped.push(SkippedMember {
                    staff_member_id,
                    reason: SkipReason::Policy,
                    detail: detail.clone(),
                });
            }
            return GenerationOutcome { created, skipped };
        }

        for &staff_member_id in staff_member_ids {
            match self.generate_one(staff_member_id, period).await {
                Ok(slip) => {
                    tracing::info!(staff_member_id, period = %period, slip_id = slip.id, "Salary slip generated");
                    created.push(slip);
                }
                Err(e @ PayrollError::DuplicateSlip { .. }) => {
                    skipped.push(SkippedMember {
                        staff_member_id,
                        reason: SkipReason::Duplicate,
                        detail: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, staff_member_id, period = %period, "Salary slip generation failed");
                    skipped.push(SkippedMember {
                        staff_member_id,
                        reason: SkipReason::Failed,
                        detail: e.to_string(),
                    });
                }
            }
        }

        GenerationOutcome { created, skipped }
    }

    async fn generate_one(
        &self,
        staff_member_id: u64,
        period: SalaryPeriod,
    ) -> Result<SalarySlip, PayrollError> {
        // Cheap pre-check; the unique key on (staff_member_id, salary_period)
        // still decides under concurrent requests.
        if self.slips.exists(staff_member_id, period).await? {
            return Err(PayrollError::DuplicateSlip {
                staff_member_id,
                period,
            });
        }

        let breakdown = self.calculator.calculate(staff_member_id, period).await?;
        if breakdown.salary.net_salary < Decimal::ZERO {
            tracing::warn!(
                staff_member_id,
                period = %period,
                net_salary = %breakdown.salary.net_salary,
                "Net payable is negative; deductions exceed earnings"
            );
        }

        self.slips
            .insert(slip_from_breakdown(staff_member_id, period, breakdown))
            .await
    }
}

fn slip_from_breakdown(
    staff_member_id: u64,
    period: SalaryPeriod,
    breakdown: PayrollBreakdown,
) -> NewSalarySlip {
    NewSalarySlip {
        staff_member_id,
        salary_period: period,
        basic_salary: breakdown.salary.base_salary,
        benefits_breakdown: breakdown.benefits.breakdown,
        deductions_breakdown: breakdown.deductions.breakdown,
        total_earnings: breakdown.salary.total_earnings,
        total_deductions: breakdown.salary.total_deductions,
        net_payable: breakdown.salary.net_salary,
    }
}
