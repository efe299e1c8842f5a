use crate::{
    auth::auth::AuthUser,
    model::{
        customer::Customer,
        role::Role,
        sales_order::{SalesOrder, SalesOrderView},
        status::{SalesOrderStatus, TicketStatus},
        ticket::{Ticket, TicketView},
    },
    service::crm::{self, NewCustomer, NewSalesOrder, NewTicket},
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use super::today;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct SalesOrderStatusUpdate {
    pub status: SalesOrderStatus,
}

/// Add a customer
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = NewCustomer,
    responses(
        (status = 201, description = "Customer added", body = Customer),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Customer code already exists")
    ),
    tag = "CRM",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_customer(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewCustomer>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Sales])?;

    let customer = crm::create_customer(pool.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(customer))
}

/// Customers by name
#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "Customers", body = [Customer])
    ),
    tag = "CRM",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_customers(pool: web::Data<SqlitePool>) -> actix_web::Result<HttpResponse> {
    let rows = crm::list_customers(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Open a support ticket
#[utoipa::path(
    post,
    path = "/api/tickets",
    request_body = NewTicket,
    responses(
        (status = 201, description = "Ticket opened", body = Ticket),
        (status = 400, description = "Subject is required")
    ),
    tag = "CRM",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_ticket(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewTicket>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Sales])?;

    let ticket = crm::create_ticket(pool.get_ref(), payload.into_inner(), today()).await?;
    Ok(HttpResponse::Created().json(ticket))
}

/// Tickets with customer name
#[utoipa::path(
    get,
    path = "/api/tickets",
    params(TicketFilter),
    responses(
        (status = 200, description = "Tickets, newest first", body = [TicketView])
    ),
    tag = "CRM",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_tickets(
    pool: web::Data<SqlitePool>,
    query: web::Query<TicketFilter>,
) -> actix_web::Result<HttpResponse> {
    let rows = crm::list_tickets(pool.get_ref(), query.status).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Close an open ticket
#[utoipa::path(
    put,
    path = "/api/tickets/{ticket_id}/close",
    params(
        ("ticket_id", Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket closed", body = Object, example = json!({
            "message": "Ticket 1 closed"
        })),
        (status = 400, description = "Ticket already closed"),
        (status = 404, description = "Ticket not found")
    ),
    tag = "CRM",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn close_ticket(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Sales])?;

    let ticket_id = path.into_inner();
    crm::close_ticket(pool.get_ref(), ticket_id).await?;
    Ok(HttpResponse::Ok().json(json!({"message": format!("Ticket {ticket_id} closed")})))
}

/// Create a sales order (New)
#[utoipa::path(
    post,
    path = "/api/sales-orders",
    request_body = NewSalesOrder,
    responses(
        (status = 201, description = "Sales order created", body = SalesOrder),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Duplicate order number or unknown customer")
    ),
    tag = "CRM",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_sales_order(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewSalesOrder>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Sales])?;

    let order = crm::create_sales_order(pool.get_ref(), payload.into_inner(), today()).await?;
    Ok(HttpResponse::Created().json(order))
}

/// Sales orders with customer name
#[utoipa::path(
    get,
    path = "/api/sales-orders",
    responses(
        (status = 200, description = "Sales orders, newest first", body = [SalesOrderView])
    ),
    tag = "CRM",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_sales_orders(pool: web::Data<SqlitePool>) -> actix_web::Result<HttpResponse> {
    let rows = crm::list_sales_orders(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Move a sales order to a new status
#[utoipa::path(
    put,
    path = "/api/sales-orders/{order_id}/status",
    params(
        ("order_id", Path, description = "Sales order ID")
    ),
    request_body = SalesOrderStatusUpdate,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Transition not allowed from the current status"),
        (status = 404, description = "Sales order not found")
    ),
    tag = "CRM",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_sales_order_status(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<SalesOrderStatusUpdate>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Sales])?;

    let order_id = path.into_inner();
    crm::set_sales_order_status(pool.get_ref(), order_id, payload.status).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Sales order {order_id} is now {}", payload.status)
    })))
}
