use crate::{
    auth::auth::AuthUser,
    model::{
        leave_request::{LeaveRequest, LeaveView},
        role::Role,
        status::LeaveStatus,
    },
    service::hr::{self, NewLeave},
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::IntoParams;

use super::today;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaveFilter {
    /// Defaults to Pending
    pub status: Option<LeaveStatus>,
}

/// Apply for leave
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = NewLeave,
    responses(
        (status = 201, description = "Leave request created (Pending)", body = LeaveRequest),
        (status = 400, description = "start_date after end_date"),
        (status = 404, description = "Unknown employee code")
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewLeave>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Hr])?;

    let leave = hr::apply_leave(pool.get_ref(), payload.into_inner(), today()).await?;
    Ok(HttpResponse::Created().json(leave))
}

/// Leave requests by status
#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Leave requests with employee code and name", body = [LeaveView])
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn leave_list(
    pool: web::Data<SqlitePool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<HttpResponse> {
    let rows = hr::list_leaves(pool.get_ref(), query.status).await?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn decide(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    leave_id: i64,
    status: LeaveStatus,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Hr])?;

    hr::set_leave_status(pool.get_ref(), leave_id, status).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Leave request {leave_id} {}", status.as_ref().to_lowercase())
    })))
}

/// Approve a pending leave request
#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}/approve",
    params(
        ("leave_id", Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave approved", body = Object, example = json!({
            "message": "Leave request 1 approved"
        })),
        (status = 400, description = "Leave request is not pending"),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse> {
    decide(auth, pool, path.into_inner(), LeaveStatus::Approved).await
}

/// Reject a pending leave request
#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}/reject",
    params(
        ("leave_id", Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = Object, example = json!({
            "message": "Leave request 1 rejected"
        })),
        (status = 400, description = "Leave request is not pending"),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse> {
    decide(auth, pool, path.into_inner(), LeaveStatus::Rejected).await
}
