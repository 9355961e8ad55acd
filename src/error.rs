use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::payroll::period::SalaryPeriod;

/// Error taxonomy for the payroll core.
///
/// Policy violations (`BeforeCutoff`, `FuturePeriod`) and `DuplicateSlip` are
/// recoverable per staff member during batch generation; the generator turns
/// them into `skipped` entries instead of failing the batch.
#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("staff member {0} not found")]
    StaffNotFound(u64),

    #[error("salary slip {0} not found")]
    SlipNotFound(u64),

    #[error("no attendance summary for staff member {staff_member_id} in {period}")]
    AttendanceMissing {
        staff_member_id: u64,
        period: SalaryPeriod,
    },

    #[error("{0}")]
    Validation(String),

    #[error("payroll for {period} cannot be generated before day {cutoff_day} of the current month")]
    BeforeCutoff {
        period: SalaryPeriod,
        cutoff_day: u32,
    },

    #[error("payroll cannot be generated for future period {0}")]
    FuturePeriod(SalaryPeriod),

    #[error("salary slip already exists for staff member {staff_member_id} in {period}")]
    DuplicateSlip {
        staff_member_id: u64,
        period: SalaryPeriod,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl PayrollError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PayrollError::Validation(msg.into())
    }

    /// True for the generation-policy violations of the cutoff rule.
    pub fn is_policy(&self) -> bool {
        matches!(
            self,
            PayrollError::BeforeCutoff { .. } | PayrollError::FuturePeriod(_)
        )
    }
}

impl actix_web::ResponseError for PayrollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::StaffNotFound(_)
            | PayrollError::SlipNotFound(_)
            | PayrollError::AttendanceMissing { .. } => StatusCode::NOT_FOUND,
            PayrollError::Validation(_) => StatusCode::BAD_REQUEST,
            PayrollError::BeforeCutoff { .. } | PayrollError::FuturePeriod(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PayrollError::DuplicateSlip { .. } => StatusCode::CONFLICT,
            PayrollError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let PayrollError::Database(e) = self {
            tracing::error!(error = %e, "Database error");
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
