use crate::{
    config::Config,
    model::attendance::AttendanceView,
    service::reports::{
        self, Bucket, CrmOverview, DepartmentCount, OverviewCounts, TransactionSummary, Window,
    },
};
use actix_web::{
    HttpResponse,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use super::today;

#[derive(Serialize, ToSchema)]
pub struct OverviewResponse {
    pub counts: OverviewCounts,
    /// Daily finance summary over the dashboard window
    pub finance: TransactionSummary,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FinanceQuery {
    /// Trailing window in days; all transactions when absent
    pub window_days: Option<u32>,
    /// day | month
    pub bucket: Option<Bucket>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AbsenceQuery {
    /// Defaults to the configured absence window
    pub days: Option<u32>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SnapshotQuery {
    /// Defaults to "Enterprise Project Snapshot"
    pub title: Option<String>,
}

/// Dashboard overview
#[utoipa::path(
    get,
    path = "/api/reports/overview",
    responses(
        (status = 200, description = "Headline counts and recent finance", body = OverviewResponse)
    ),
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn overview(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> actix_web::Result<HttpResponse> {
    let counts = reports::pending_counts(pool.get_ref()).await?;
    let finance = reports::summarize_transactions(
        pool.get_ref(),
        Window::TrailingDays(config.dashboard_window_days),
        Bucket::Day,
        today(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(OverviewResponse { counts, finance }))
}

/// Finance summary
#[utoipa::path(
    get,
    path = "/api/reports/finance",
    params(FinanceQuery),
    responses(
        (status = 200, description = "Totals per type, net balance and series", body = TransactionSummary)
    ),
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn finance(
    pool: web::Data<SqlitePool>,
    query: web::Query<FinanceQuery>,
) -> actix_web::Result<HttpResponse> {
    let window = query.window_days.map_or(Window::All, Window::TrailingDays);
    let summary = reports::summarize_transactions(
        pool.get_ref(),
        window,
        query.bucket.unwrap_or_default(),
        today(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Headcount by department
#[utoipa::path(
    get,
    path = "/api/reports/headcount",
    responses(
        (status = 200, description = "Employees per department", body = [DepartmentCount])
    ),
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn headcount(pool: web::Data<SqlitePool>) -> actix_web::Result<HttpResponse> {
    let rows = reports::headcount_by_department(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Recent absences
#[utoipa::path(
    get,
    path = "/api/reports/absences",
    params(AbsenceQuery),
    responses(
        (status = 200, description = "Absent rows inside the window", body = [AttendanceView])
    ),
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn absences(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    query: web::Query<AbsenceQuery>,
) -> actix_web::Result<HttpResponse> {
    let days = query.days.unwrap_or(config.absence_window_days);
    let rows = reports::recent_absences(pool.get_ref(), days, today()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// CRM overview
#[utoipa::path(
    get,
    path = "/api/reports/crm",
    responses(
        (status = 200, description = "Open tickets, customers and sales orders", body = CrmOverview)
    ),
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn crm(pool: web::Data<SqlitePool>) -> actix_web::Result<HttpResponse> {
    let overview = reports::crm_overview(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(overview))
}

/// PDF snapshot of the current state
#[utoipa::path(
    get,
    path = "/api/reports/snapshot.pdf",
    params(SnapshotQuery),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf", body = Vec<u8>)
    ),
    tag = "Reports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn snapshot_pdf(
    pool: web::Data<SqlitePool>,
    query: web::Query<SnapshotQuery>,
) -> actix_web::Result<HttpResponse> {
    let bytes = reports::snapshot_pdf(pool.get_ref(), query.title.as_deref()).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(
                "enterprise_snapshot.pdf".to_string(),
            )],
        })
        .body(bytes))
}
