use crate::{
    auth::auth::AuthUser,
    model::{
        purchase_order::{PurchaseOrder, PurchaseOrderView},
        role::Role,
        status::PoStatus,
        supplier::Supplier,
    },
    service::procurement::{self, NewPurchaseOrder, NewSupplier},
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use super::today;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PoFilter {
    pub status: Option<PoStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct PoStatusUpdate {
    pub status: PoStatus,
}

/// Add a supplier
#[utoipa::path(
    post,
    path = "/api/suppliers",
    request_body = NewSupplier,
    responses(
        (status = 201, description = "Supplier added", body = Supplier),
        (status = 400, description = "Invalid input")
    ),
    tag = "Procurement",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_supplier(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewSupplier>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Procurement])?;

    let supplier = procurement::create_supplier(pool.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(supplier))
}

/// Suppliers by name
#[utoipa::path(
    get,
    path = "/api/suppliers",
    responses(
        (status = 200, description = "Suppliers", body = [Supplier])
    ),
    tag = "Procurement",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_suppliers(pool: web::Data<SqlitePool>) -> actix_web::Result<HttpResponse> {
    let rows = procurement::list_suppliers(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Create a purchase order (Pending)
#[utoipa::path(
    post,
    path = "/api/purchase-orders",
    request_body = NewPurchaseOrder,
    responses(
        (status = 201, description = "Purchase order created", body = PurchaseOrder),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Duplicate PO number or unknown supplier")
    ),
    tag = "Procurement",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_purchase_order(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewPurchaseOrder>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Procurement])?;

    let po =
        procurement::create_purchase_order(pool.get_ref(), payload.into_inner(), today()).await?;
    Ok(HttpResponse::Created().json(po))
}

/// Purchase orders with supplier name
#[utoipa::path(
    get,
    path = "/api/purchase-orders",
    params(PoFilter),
    responses(
        (status = 200, description = "Purchase orders, newest first", body = [PurchaseOrderView])
    ),
    tag = "Procurement",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_purchase_orders(
    pool: web::Data<SqlitePool>,
    query: web::Query<PoFilter>,
) -> actix_web::Result<HttpResponse> {
    let rows = procurement::list_purchase_orders(pool.get_ref(), query.status).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Move a purchase order to a new status
#[utoipa::path(
    put,
    path = "/api/purchase-orders/{po_id}/status",
    params(
        ("po_id", Path, description = "Purchase order ID")
    ),
    request_body = PoStatusUpdate,
    responses(
        (status = 200, description = "Status updated", body = Object, example = json!({
            "message": "Purchase order 1 is now Approved"
        })),
        (status = 400, description = "Transition not allowed from the current status"),
        (status = 404, description = "Purchase order not found")
    ),
    tag = "Procurement",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_purchase_order_status(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<PoStatusUpdate>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Procurement])?;

    let po_id = path.into_inner();
    procurement::set_purchase_order_status(pool.get_ref(), po_id, payload.status).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Purchase order {po_id} is now {}", payload.status)
    })))
}
