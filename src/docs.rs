use crate::api::payroll::{BulkGenerate, CalculatePayroll};
use crate::api::slips::{PaginatedSlipResponse, SlipQuery};
use crate::model::attendance::AttendanceSummary;
use crate::model::compensation::{BenefitAssignment, CalculationType, Compensation, DeductionAssignment};
use crate::model::slip::{PayLine, SalarySlip, SlipStatus};
use crate::model::staff::StaffMember;
use crate::payroll::calculator::{PayrollBreakdown, PaySection, SalaryTotals};
use crate::payroll::generator::{GenerationOutcome, SkipReason, SkippedMember};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Payroll API",
        version = "1.0.0",
        description = r#"
## Payroll core of the HRM system

Converts a staff member's monthly attendance, active benefits and active
deductions into a salary slip.

### 🔹 Key Features
- **Payroll Preview**
  - Compute an earnings/deductions breakdown without persisting anything
- **Bulk Generation**
  - Generate salary slips for a batch of staff members with per-member outcomes
  - One slip per staff member per period, enforced by the storage layer
  - Current-month generation opens on the configured cutoff day
- **Salary Slips**
  - List and fetch slips, mark them paid, delete for regeneration

### 🔐 Security
Endpoints are protected using **JWT Bearer authentication**. Generation and
payment are restricted to **Admin**/**HR** roles; employees see only their own
slips.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payroll::calculate_payroll,
        crate::api::payroll::bulk_generate,

        crate::api::slips::get_slip,
        crate::api::slips::list_slips,
        crate::api::slips::pay_slip,
        crate::api::slips::delete_slip
    ),
    components(
        schemas(
            CalculatePayroll,
            BulkGenerate,
            SlipQuery,
            PaginatedSlipResponse,
            AttendanceSummary,
            BenefitAssignment,
            DeductionAssignment,
            CalculationType,
            Compensation,
            StaffMember,
            PayLine,
            SalarySlip,
            SlipStatus,
            PayrollBreakdown,
            PaySection,
            SalaryTotals,
            GenerationOutcome,
            SkippedMember,
            SkipReason
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Payroll", description = "Payroll calculation and generation APIs"),
        (name = "Salary Slips", description = "Salary slip management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
