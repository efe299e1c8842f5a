use crate::error::AppResult;
use crate::model::customer::Customer;
use crate::model::sales_order::{SalesOrder, SalesOrderView};
use crate::model::status::{SalesOrderStatus, TicketStatus};
use crate::model::ticket::{Ticket, TicketView};
use crate::service::transition;
use crate::utils::db_utils::{TableKind, execute};
use crate::utils::validation::{check_amount, check_email, check_phone, clean, require_text};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewCustomer {
    #[schema(example = "CUST-001")]
    pub cust_code: String,
    #[schema(example = "Jane Smith")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "Globex")]
    pub company: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewTicket {
    pub customer_id: Option<i64>,
    #[schema(example = "Invoice shows wrong total")]
    pub subject: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewSalesOrder {
    #[schema(example = "SO-2026-001")]
    pub order_no: String,
    pub customer_id: Option<i64>,
    /// Defaults to today
    #[schema(value_type = Option<String>)]
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_amount: f64,
    pub notes: Option<String>,
}

pub async fn create_customer(pool: &SqlitePool, input: NewCustomer) -> AppResult<Customer> {
    let customer = Customer {
        id: 0,
        cust_code: require_text("cust_code", &input.cust_code)?,
        name: require_text("name", &input.name)?,
        email: clean(input.email.as_deref()),
        phone: clean(input.phone.as_deref()),
        company: clean(input.company.as_deref()),
        notes: clean(input.notes.as_deref()),
    };
    check_email("email", customer.email.as_deref())?;
    check_phone("phone", customer.phone.as_deref())?;

    let outcome = execute(
        pool,
        r#"
        INSERT INTO customers (cust_code, name, email, phone, company, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        &[
            customer.cust_code.as_str().into(),
            customer.name.as_str().into(),
            customer.email.clone().into(),
            customer.phone.clone().into(),
            customer.company.clone().into(),
            customer.notes.clone().into(),
        ],
    )
    .await?;

    info!(cust_code = %customer.cust_code, "Customer added");
    Ok(Customer {
        id: outcome.generated_id.unwrap_or_default(),
        ..customer
    })
}

pub async fn list_customers(pool: &SqlitePool) -> AppResult<Vec<Customer>> {
    let rows = sqlx::query_as::<_, Customer>(
        "SELECT id, cust_code, name, email, phone, company, notes FROM customers ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_ticket(
    pool: &SqlitePool,
    input: NewTicket,
    today: NaiveDate,
) -> AppResult<Ticket> {
    let ticket = Ticket {
        id: 0,
        customer_id: input.customer_id,
        subject: require_text("subject", &input.subject)?,
        description: clean(input.description.as_deref()),
        created_on: today,
        status: TicketStatus::Open.to_string(),
        assigned_to: clean(input.assigned_to.as_deref()),
    };

    let outcome = execute(
        pool,
        r#"
        INSERT INTO tickets (customer_id, subject, description, created_on, status, assigned_to)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        &[
            ticket.customer_id.into(),
            ticket.subject.as_str().into(),
            ticket.description.clone().into(),
            ticket.created_on.into(),
            ticket.status.as_str().into(),
            ticket.assigned_to.clone().into(),
        ],
    )
    .await?;

    info!(subject = %ticket.subject, "Ticket opened");
    Ok(Ticket {
        id: outcome.generated_id.unwrap_or_default(),
        ..ticket
    })
}

/// Tickets newest first with the customer name, optionally by status.
pub async fn list_tickets(
    pool: &SqlitePool,
    status: Option<TicketStatus>,
) -> AppResult<Vec<TicketView>> {
    let rows = sqlx::query_as::<_, TicketView>(
        r#"
        SELECT t.id, c.name AS customer, t.subject, t.created_on, t.status, t.assigned_to
        FROM tickets t
        LEFT JOIN customers c ON t.customer_id = c.id
        WHERE (?1 IS NULL OR t.status = ?1)
        ORDER BY t.id DESC
        "#,
    )
    .bind(status.map(|s| s.as_ref().to_string()))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn close_ticket(pool: &SqlitePool, ticket_id: i64) -> AppResult<()> {
    transition(pool, TableKind::Tickets, "Ticket", ticket_id, TicketStatus::Closed).await
}

pub async fn create_sales_order(
    pool: &SqlitePool,
    input: NewSalesOrder,
    today: NaiveDate,
) -> AppResult<SalesOrder> {
    check_amount("total_amount", input.total_amount, true)?;

    let order = SalesOrder {
        id: 0,
        order_no: require_text("order_no", &input.order_no)?,
        customer_id: input.customer_id,
        order_date: input.order_date.unwrap_or(today),
        total_amount: input.total_amount,
        status: SalesOrderStatus::New.to_string(),
        notes: clean(input.notes.as_deref()),
    };

    let outcome = execute(
        pool,
        r#"
        INSERT INTO sales_orders (order_no, customer_id, order_date, total_amount, status, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        &[
            order.order_no.as_str().into(),
            order.customer_id.into(),
            order.order_date.into(),
            order.total_amount.into(),
            order.status.as_str().into(),
            order.notes.clone().into(),
        ],
    )
    .await?;

    info!(order_no = %order.order_no, total = order.total_amount, "Sales order created");
    Ok(SalesOrder {
        id: outcome.generated_id.unwrap_or_default(),
        ..order
    })
}

pub async fn list_sales_orders(pool: &SqlitePool) -> AppResult<Vec<SalesOrderView>> {
    let rows = sqlx::query_as::<_, SalesOrderView>(
        r#"
        SELECT o.id, o.order_no, c.name AS customer, o.order_date, o.total_amount, o.status
        FROM sales_orders o
        LEFT JOIN customers c ON o.customer_id = c.id
        ORDER BY o.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn set_sales_order_status(
    pool: &SqlitePool,
    order_id: i64,
    status: SalesOrderStatus,
) -> AppResult<()> {
    transition(pool, TableKind::SalesOrders, "Sales order", order_id, status).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::error::AppError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
    }

    fn customer(code: &str, name: &str) -> NewCustomer {
        NewCustomer {
            cust_code: code.to_string(),
            name: name.to_string(),
            email: None,
            phone: Some("(02) 555-0100".into()),
            company: Some("Globex".into()),
            notes: None,
        }
    }

    #[actix_web::test]
    async fn duplicate_customer_code_keeps_one_row() {
        let pool = memory_pool().await;
        create_customer(&pool, customer("C-1", "Ann")).await.unwrap();
        let err = create_customer(&pool, customer("C-1", "Other"))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());

        let all = list_customers(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Ann");
    }

    #[actix_web::test]
    async fn ticket_opens_today_and_closes_once() {
        let pool = memory_pool().await;
        let cust = create_customer(&pool, customer("C-1", "Ann")).await.unwrap();
        let ticket = create_ticket(
            &pool,
            NewTicket {
                customer_id: Some(cust.id),
                subject: "Broken login".into(),
                description: None,
                assigned_to: Some("support".into()),
            },
            today(),
        )
        .await
        .unwrap();
        assert_eq!(ticket.created_on, today());
        assert_eq!(ticket.status, "Open");

        let open = list_tickets(&pool, Some(TicketStatus::Open)).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].customer.as_deref(), Some("Ann"));

        close_ticket(&pool, ticket.id).await.unwrap();
        assert!(list_tickets(&pool, Some(TicketStatus::Open))
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            close_ticket(&pool, ticket.id).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            close_ticket(&pool, 77).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn blank_subject_is_rejected() {
        let pool = memory_pool().await;
        let err = create_ticket(
            &pool,
            NewTicket {
                customer_id: None,
                subject: " ".into(),
                description: None,
                assigned_to: None,
            },
            today(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[actix_web::test]
    async fn sales_order_flow() {
        let pool = memory_pool().await;
        let order = create_sales_order(
            &pool,
            NewSalesOrder {
                order_no: "SO-1".into(),
                customer_id: None,
                order_date: None,
                total_amount: 99.5,
                notes: None,
            },
            today(),
        )
        .await
        .unwrap();
        assert_eq!(order.status, "New");
        assert_eq!(order.order_date, today());

        assert!(matches!(
            set_sales_order_status(&pool, order.id, SalesOrderStatus::Fulfilled).await,
            Err(AppError::Validation(_))
        ));
        set_sales_order_status(&pool, order.id, SalesOrderStatus::Confirmed)
            .await
            .unwrap();
        set_sales_order_status(&pool, order.id, SalesOrderStatus::Fulfilled)
            .await
            .unwrap();

        let listed = list_sales_orders(&pool).await.unwrap();
        assert_eq!(listed[0].status, "Fulfilled");
        assert_eq!(listed[0].customer, None);
    }
}
