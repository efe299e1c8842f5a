use crate::{
    auth::auth::AuthUser,
    model::{role::Role, transaction::Transaction},
    service::finance::{self, NewTransaction, TransactionFilter},
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

use super::today;

/// Record an income or expense
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = NewTransaction,
    responses(
        (status = 201, description = "Transaction recorded", body = Transaction),
        (status = 400, description = "Amount must be greater than zero", body = Object, example = json!({
            "message": "amount must be greater than zero"
        }))
    ),
    tag = "Finance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_transaction(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewTransaction>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Finance])?;

    let tx = finance::record_transaction(pool.get_ref(), payload.into_inner(), today()).await?;
    Ok(HttpResponse::Created().json(tx))
}

/// Transactions, newest first
#[utoipa::path(
    get,
    path = "/api/transactions",
    params(TransactionFilter),
    responses(
        (status = 200, description = "Transactions", body = [Transaction])
    ),
    tag = "Finance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_transactions(
    pool: web::Data<SqlitePool>,
    query: web::Query<TransactionFilter>,
) -> actix_web::Result<HttpResponse> {
    let rows = finance::list_transactions(pool.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(rows))
}
