use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct StaffMember {
    #[schema(example = 1001)]
    pub id: u64,

    #[schema(example = "STF-1001")]
    pub staff_code: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    /// Current base salary; history is not modeled, the value read at
    /// calculation time applies to the whole period.
    #[schema(value_type = String, example = "30000.00")]
    pub base_salary: Decimal,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,

    #[schema(example = "active")]
    pub status: String,
}
