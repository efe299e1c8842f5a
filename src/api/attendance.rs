use crate::{
    auth::auth::AuthUser,
    model::{
        attendance::{Attendance, AttendanceView},
        role::Role,
    },
    service::hr::{self, NewAttendance},
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::IntoParams;

use super::today;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    /// Calendar year, e.g. 2026
    pub year: i32,
    /// 1-12
    pub month: u32,
}

/// Mark attendance for an employee
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = NewAttendance,
    responses(
        (status = 201, description = "Attendance saved", body = Attendance),
        (status = 404, description = "Unknown employee code", body = Object, example = json!({
            "message": "Employee 'EMP-404' not found"
        }))
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_attendance(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewAttendance>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Hr])?;

    let saved = hr::mark_attendance(pool.get_ref(), payload.into_inner(), today()).await?;
    Ok(HttpResponse::Created().json(saved))
}

/// Attendance for one month
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(MonthQuery),
    responses(
        (status = 200, description = "Attendance rows with employee code and name", body = [AttendanceView]),
        (status = 400, description = "Invalid month")
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn attendance_for_month(
    pool: web::Data<SqlitePool>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<HttpResponse> {
    let rows = hr::attendance_for_month(pool.get_ref(), query.year, query.month).await?;
    Ok(HttpResponse::Ok().json(rows))
}
