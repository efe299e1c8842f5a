use crate::{
    auth::auth::AuthUser,
    model::role::Role,
    service::data::{self, ImportKind, ImportReport},
    utils::db_utils::{TableKind, table_rows},
};
use actix_web::{
    HttpResponse,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;

use super::today;

/// Roles allowed to bulk-load each kind.
fn import_roles(kind: ImportKind) -> &'static [Role] {
    match kind {
        ImportKind::Employees => &[Role::Hr],
        ImportKind::Customers => &[Role::Sales],
        ImportKind::Transactions => &[Role::Finance],
    }
}

/// Bulk import a CSV file
///
/// The body is the raw CSV text with a header row. Rows that fail validation
/// or collide with an existing code are skipped; the call still succeeds.
#[utoipa::path(
    post,
    path = "/api/data/import/{kind}",
    params(
        ("kind", Path, description = "employees | customers | transactions")
    ),
    request_body(content = String, content_type = "text/csv", example = "emp_code,name,department\nEMP-001,John Doe,Engineering"),
    responses(
        (status = 200, description = "Import report", body = ImportReport),
        (status = 400, description = "Unknown kind or missing header row", body = Object, example = json!({
            "message": "CSV header row is missing"
        }))
    ),
    tag = "Data",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn import_csv(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    body: web::Bytes,
) -> actix_web::Result<HttpResponse> {
    let kind = ImportKind::parse(&path)?;
    auth.require_any(import_roles(kind))?;

    let report = data::import_csv(pool.get_ref(), kind, &body, today()).await?;
    info!(%kind, by = %auth.username, inserted = report.inserted, "CSV import via API");
    Ok(HttpResponse::Ok().json(report))
}

/// Export a table as CSV
#[utoipa::path(
    get,
    path = "/api/data/export/{table}",
    params(
        ("table", Path, description = "Business table name, e.g. employees, purchase_orders")
    ),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 400, description = "Unknown table")
    ),
    tag = "Data",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export_csv(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let table = TableKind::parse(&path)?;
    let bytes = data::export_table(pool.get_ref(), table).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(format!("{table}.csv"))],
        })
        .body(bytes))
}

/// View a whole table
#[utoipa::path(
    get,
    path = "/api/data/tables/{table}",
    params(
        ("table", Path, description = "Business table name, e.g. employees, purchase_orders")
    ),
    responses(
        (status = 200, description = "Columns and rows", body = Object, example = json!({
            "columns": ["id", "name", "contact", "email", "address"],
            "rows": [[1, "Acme", null, "sales@acme.test", null]]
        })),
        (status = 400, description = "Unknown table")
    ),
    tag = "Data",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn view_table(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let table = TableKind::parse(&path)?;
    let rows = table_rows(pool.get_ref(), table).await?;
    Ok(HttpResponse::Ok().json(rows))
}
