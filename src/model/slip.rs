use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::payroll::period::SalaryPeriod;

/// Slip lifecycle: generated → paid. Forward only; a correction requires
/// deleting the slip and regenerating.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlipStatus {
    Generated,
    Paid,
}

/// One named line on a slip's earnings or deductions breakdown.
///
/// `taxable_or_statutory` carries `is_taxable` for benefit lines and
/// `is_statutory` for deduction lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayLine {
    #[schema(example = "Transport Allowance")]
    pub name: String,
    #[schema(value_type = String, example = "2000.00")]
    pub amount: Decimal,
    pub taxable_or_statutory: bool,
}

/// The persisted result of one payroll calculation. Unique per
/// (staff_member_id, salary_period); never recomputed in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalarySlip {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub staff_member_id: u64,
    #[schema(value_type = String, example = "2025-03")]
    pub salary_period: SalaryPeriod,
    #[schema(value_type = String, example = "30000.00")]
    pub basic_salary: Decimal,
    pub benefits_breakdown: Vec<PayLine>,
    pub deductions_breakdown: Vec<PayLine>,
    #[schema(value_type = String, example = "32000.00")]
    pub total_earnings: Decimal,
    #[schema(value_type = String, example = "6327.27")]
    pub total_deductions: Decimal,
    #[schema(value_type = String, example = "25672.73")]
    pub net_payable: Decimal,
    pub status: SlipStatus,
    #[schema(value_type = String, format = "date-time", example = "2025-03-25T09:00:00Z")]
    pub generated_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Insert payload for the slip store; id/status/timestamps are assigned at
/// persistence time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSalarySlip {
    pub staff_member_id: u64,
    pub salary_period: SalaryPeriod,
    pub basic_salary: Decimal,
    pub benefits_breakdown: Vec<PayLine>,
    pub deductions_breakdown: Vec<PayLine>,
    pub total_earnings: Decimal,
    pub total_deductions: Decimal,
    pub net_payable: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_string_round_trip() {
        assert_eq!(SlipStatus::Generated.to_string(), "generated");
        assert_eq!(SlipStatus::Paid.to_string(), "paid");
        assert_eq!(SlipStatus::from_str("paid").unwrap(), SlipStatus::Paid);
        assert!(SlipStatus::from_str("void").is_err());
    }
}
