use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::ActorContext;
use crate::error::PayrollError;
use crate::model::slip::SalarySlip;
use crate::payroll::period::SalaryPeriod;
use crate::store::slips::{MySqlSlipStore, SlipFilter, SlipStore};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SlipQuery {
    #[schema(example = 1001)]
    pub staff_member_id: Option<u64>,

    /// Inclusive period lower bound, `YYYY-MM`
    #[schema(example = "2025-01")]
    pub from: Option<String>,

    /// Inclusive period upper bound, `YYYY-MM`
    #[schema(example = "2025-12")]
    pub to: Option<String>,

    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedSlipResponse {
    pub data: Vec<SalarySlip>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Get one salary slip by id.
#[utoipa::path(
    get,
    path = "/api/payroll/slips/{slip_id}",
    params(
        ("slip_id", description = "Salary slip ID")
    ),
    responses(
        (status = 200, body = SalarySlip),
        (status = 401),
        (status = 403),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Slips"
)]
pub async fn get_slip(
    actor: ActorContext,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let slip_id = path.into_inner();
    let store = MySqlSlipStore::new(pool.get_ref().clone());

    let slip = store.get(slip_id).await?;
    if !actor.can_view(slip.staff_member_id) {
        return Err(actix_web::error::ErrorForbidden(
            "Cannot view another staff member's salary slip",
        ));
    }

    Ok(HttpResponse::Ok().json(slip))
}

/// List salary slips, filterable by staff member and period range.
#[utoipa::path(
    get,
    path = "/api/payroll/slips",
    params(SlipQuery),
    responses(
        (status = 200, body = PaginatedSlipResponse),
        (status = 400, description = "Malformed period bound"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Slips"
)]
pub async fn list_slips(
    actor: ActorContext,
    pool: web::Data<MySqlPool>,
    query: web::Query<SlipQuery>,
) -> actix_web::Result<impl Responder> {
    // Employees are pinned to their own slips; admin/HR may filter freely.
    let staff_member_id = if actor.require_hr_or_admin().is_ok() {
        query.staff_member_id
    } else {
        let own = actor.staff_member_id.ok_or_else(|| {
            actix_web::error::ErrorForbidden("No staff profile linked to this account")
        })?;
        if query.staff_member_id.is_some_and(|id| id != own) {
            return Err(actix_web::error::ErrorForbidden(
                "Cannot list another staff member's salary slips",
            ));
        }
        Some(own)
    };

    let from = query
        .from
        .as_deref()
        .map(str::parse::<SalaryPeriod>)
        .transpose()?;
    let to = query
        .to
        .as_deref()
        .map(str::parse::<SalaryPeriod>)
        .transpose()?;

    let filter = SlipFilter {
        staff_member_id,
        from,
        to,
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(10).clamp(1, 100),
    };

    let store = MySqlSlipStore::new(pool.get_ref().clone());
    let (data, total) = store.list(&filter).await?;

    Ok(HttpResponse::Ok().json(PaginatedSlipResponse {
        data,
        page: filter.page,
        per_page: filter.per_page,
        total,
    }))
}

/// Mark a generated slip as paid. Forward transition only.
#[utoipa::path(
    put,
    path = "/api/payroll/slips/{slip_id}/pay",
    params(
        ("slip_id", description = "Salary slip ID")
    ),
    responses(
        (status = 200, description = "Slip marked as paid", body = SalarySlip),
        (status = 400, description = "Slip already paid"),
        (status = 401),
        (status = 403),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Slips"
)]
pub async fn pay_slip(
    actor: ActorContext,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    actor.require_hr_or_admin()?;

    let slip_id = path.into_inner();
    let store = MySqlSlipStore::new(pool.get_ref().clone());
    let slip = store.mark_paid(slip_id).await?;

    tracing::info!(slip_id, staff_member_id = slip.staff_member_id, "Salary slip marked paid");
    Ok(HttpResponse::Ok().json(slip))
}

/// Delete a slip so the period can be regenerated. The uniqueness invariant is
/// re-validated on the next insert.
#[utoipa::path(
    delete,
    path = "/api/payroll/slips/{slip_id}",
    params(
        ("slip_id", description = "Salary slip ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 401),
        (status = 403),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Slips"
)]
pub async fn delete_slip(
    actor: ActorContext,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    actor.require_admin()?;

    let slip_id = path.into_inner();
    let store = MySqlSlipStore::new(pool.get_ref().clone());

    match store.delete(slip_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Successfully deleted"
        }))),
        Err(PayrollError::SlipNotFound(_)) => Ok(HttpResponse::NotFound().json(
            serde_json::json!({
                "message": "Salary slip not found"
            }),
        )),
        Err(e) => Err(e.into()),
    }
}
