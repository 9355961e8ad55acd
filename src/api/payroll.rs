use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::ActorContext;
use crate::config::Config;
use crate::payroll::attendance::SqlAttendanceProvider;
use crate::payroll::calculator::{PayrollBreakdown, PayrollCalculator};
use crate::payroll::generator::{GenerationOutcome, PayrollGenerator};
use crate::payroll::period::SalaryPeriod;
use crate::payroll::resolver::SqlCompensationSource;
use crate::store::slips::MySqlSlipStore;

#[derive(Deserialize, ToSchema)]
pub struct CalculatePayroll {
    #[schema(example = 1001)]
    pub staff_member_id: u64,

    #[schema(example = 3)]
    pub month: u32,

    #[schema(example = 2025)]
    pub year: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct BulkGenerate {
    #[schema(example = json!([1001, 1002, 1003]))]
    pub employee_ids: Vec<u64>,

    #[schema(example = 3)]
    pub month: u32,

    #[schema(example = 2025)]
    pub year: i32,
}

fn calculator(pool: &MySqlPool, config: &Config) -> PayrollCalculator<SqlAttendanceProvider, SqlCompensationSource> {
    PayrollCalculator::new(
        SqlAttendanceProvider::new(pool.clone(), config.working_days.clone()),
        SqlCompensationSource::new(pool.clone()),
    )
}

/// Preview a payroll breakdown for one staff member; computes only, persists
/// nothing.
#[utoipa::path(
    post,
    path = "/api/payroll/calculate",
    request_body = CalculatePayroll,
    responses(
        (status = 200, description = "Payroll breakdown", body = PayrollBreakdown),
        (status = 400, description = "Invalid month/year or compensation data"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Staff member or attendance summary not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn calculate_payroll(
    actor: ActorContext,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CalculatePayroll>,
) -> actix_web::Result<impl Responder> {
    if !actor.can_view(payload.staff_member_id) {
        return Err(actix_web::error::ErrorForbidden(
            "Cannot view payroll for another staff member",
        ));
    }

    let period = SalaryPeriod::new(payload.year, payload.month)?;
    let breakdown = calculator(pool.get_ref(), config.get_ref())
        .calculate(payload.staff_member_id, period)
        .await?;

    Ok(HttpResponse::Ok().json(breakdown))
}

/// Generate salary slips for a batch of staff members.
#[utoipa::path(
    post,
    path = "/api/payroll/bulk-generate",
    request_body = BulkGenerate,
    responses(
        (status = 200, description = "Per-member generation outcome", body = GenerationOutcome),
        (status = 400, description = "Invalid month/year or empty batch"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn bulk_generate(
    actor: ActorContext,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<BulkGenerate>,
) -> actix_web::Result<impl Responder> {
    actor.require_hr_or_admin()?;

    if payload.employee_ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "employee_ids must not be empty"
        })));
    }

    let period = SalaryPeriod::new(payload.year, payload.month)?;
    let generator = PayrollGenerator::new(
        SqlAttendanceProvider::new(pool.get_ref().clone(), config.working_days.clone()),
        SqlCompensationSource::new(pool.get_ref().clone()),
        MySqlSlipStore::new(pool.get_ref().clone()),
        config.generation_policy,
    );

    let outcome = generator
        .generate(&payload.employee_ids, period, Local::now().date_naive())
        .await;

    tracing::info!(
        period = %period,
        requested = payload.employee_ids.len(),
        created = outcome.created.len(),
        skipped = outcome.skipped.len(),
        "Bulk payroll generation finished"
    );

    Ok(HttpResponse::Ok().json(outcome))
}
