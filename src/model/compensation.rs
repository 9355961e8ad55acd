use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PayrollError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CalculationType {
    /// `amount` is the line value as-is.
    Fixed,
    /// `amount` is a percentage of base salary, constrained to 0..=100.
    Percentage,
}

impl CalculationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationType::Fixed => "fixed",
            CalculationType::Percentage => "percentage",
        }
    }

    pub fn parse(s: &str) -> Result<Self, PayrollError> {
        match s {
            "fixed" => Ok(CalculationType::Fixed),
            "percentage" => Ok(CalculationType::Percentage),
            other => Err(PayrollError::validation(format!(
                "unknown calculation type '{}'",
                other
            ))),
        }
    }
}

fn window_is_effective(
    is_active: bool,
    effective_from: NaiveDate,
    effective_until: Option<NaiveDate>,
    as_of: NaiveDate,
) -> bool {
    is_active
        && effective_from <= as_of
        && effective_until.map_or(true, |until| until >= as_of)
}

/// A benefit granted to one staff member. Multiple active assignments are
/// additive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BenefitAssignment {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub staff_member_id: u64,
    #[schema(example = "Transport Allowance")]
    pub name: String,
    pub is_taxable: bool,
    pub calculation_type: CalculationType,
    #[schema(value_type = String, example = "2000.00")]
    pub amount: Decimal,
    #[schema(value_type = String, format = "date", example = "2025-01-01")]
    pub effective_from: NaiveDate,
    #[schema(value_type = Option<String>, format = "date", example = "2025-12-31")]
    pub effective_until: Option<NaiveDate>,
    pub is_active: bool,
}

impl BenefitAssignment {
    pub fn is_effective(&self, as_of: NaiveDate) -> bool {
        window_is_effective(self.is_active, self.effective_from, self.effective_until, as_of)
    }
}

/// A withholding applied to one staff member; same shape as a benefit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeductionAssignment {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub staff_member_id: u64,
    #[schema(example = "Provident Fund")]
    pub name: String,
    pub is_statutory: bool,
    pub calculation_type: CalculationType,
    #[schema(value_type = String, example = "12.00")]
    pub amount: Decimal,
    #[schema(value_type = String, format = "date", example = "2025-01-01")]
    pub effective_from: NaiveDate,
    #[schema(value_type = Option<String>, format = "date", example = "2025-12-31")]
    pub effective_until: Option<NaiveDate>,
    pub is_active: bool,
}

impl DeductionAssignment {
    pub fn is_effective(&self, as_of: NaiveDate) -> bool {
        window_is_effective(self.is_active, self.effective_from, self.effective_until, as_of)
    }
}

/// Resolved compensation for one staff member as of a date: current base salary
/// plus the benefit and deduction assignments effective on that date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Compensation {
    #[schema(value_type = String, example = "30000.00")]
    pub base_salary: Decimal,
    pub benefits: Vec<BenefitAssignment>,
    pub deductions: Vec<DeductionAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assignment(
        is_active: bool,
        from: NaiveDate,
        until: Option<NaiveDate>,
    ) -> BenefitAssignment {
        BenefitAssignment {
            id: 1,
            staff_member_id: 1001,
            name: "Transport Allowance".into(),
            is_taxable: false,
            calculation_type: CalculationType::Fixed,
            amount: dec!(2000),
            effective_from: from,
            effective_until: until,
            is_active,
        }
    }

    #[test]
    fn effective_window_edges() {
        let as_of = date(2025, 3, 31);

        // Open-ended, started in the past.
        assert!(assignment(true, date(2025, 1, 1), None).is_effective(as_of));
        // Starts exactly on the as-of date.
        assert!(assignment(true, date(2025, 3, 31), None).is_effective(as_of));
        // Ends exactly on the as-of date.
        assert!(assignment(true, date(2025, 1, 1), Some(date(2025, 3, 31))).is_effective(as_of));
        // Ended the day before.
        assert!(!assignment(true, date(2025, 1, 1), Some(date(2025, 3, 30))).is_effective(as_of));
        // Starts the day after.
        assert!(!assignment(true, date(2025, 4, 1), None).is_effective(as_of));
        // Inactive assignments never apply.
        assert!(!assignment(false, date(2025, 1, 1), None).is_effective(as_of));
    }

    #[test]
    fn calculation_type_round_trips() {
        assert_eq!(CalculationType::parse("fixed").unwrap(), CalculationType::Fixed);
        assert_eq!(
            CalculationType::parse("percentage").unwrap(),
            CalculationType::Percentage
        );
        assert_eq!(CalculationType::Percentage.as_str(), "percentage");
        assert!(CalculationType::parse("hourly").is_err());
    }
}
