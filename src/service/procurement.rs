use crate::error::{AppError, AppResult};
use crate::model::purchase_order::{PurchaseOrder, PurchaseOrderView};
use crate::model::status::PoStatus;
use crate::model::supplier::Supplier;
use crate::service::transition;
use crate::utils::db_utils::{TableKind, execute};
use crate::utils::validation::{check_amount, check_email, clean, require_text};
use chrono::{Days, NaiveDate};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

/// Days until a purchase order falls due when no date is given.
pub const DEFAULT_PO_TERM_DAYS: u64 = 7;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewSupplier {
    #[schema(example = "Acme Supplies")]
    pub name: String,
    #[schema(example = "Jane Roe")]
    pub contact: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewPurchaseOrder {
    #[schema(example = "PO-2026-001")]
    pub po_no: String,
    pub supplier_id: Option<i64>,
    /// Defaults to today
    #[schema(value_type = Option<String>)]
    pub created_on: Option<NaiveDate>,
    /// Defaults to a week after created_on
    #[schema(value_type = Option<String>)]
    pub due_date: Option<NaiveDate>,
    #[schema(example = "10x Chair; 2x Desk")]
    pub items: Option<String>,
    #[serde(default)]
    pub total_amount: f64,
    pub notes: Option<String>,
}

pub async fn create_supplier(pool: &SqlitePool, input: NewSupplier) -> AppResult<Supplier> {
    let supplier = Supplier {
        id: 0,
        name: require_text("name", &input.name)?,
        contact: clean(input.contact.as_deref()),
        email: clean(input.email.as_deref()),
        address: clean(input.address.as_deref()),
    };
    check_email("email", supplier.email.as_deref())?;

    let outcome = execute(
        pool,
        "INSERT INTO suppliers (name, contact, email, address) VALUES (?, ?, ?, ?)",
        &[
            supplier.name.as_str().into(),
            supplier.contact.clone().into(),
            supplier.email.clone().into(),
            supplier.address.clone().into(),
        ],
    )
    .await?;

    info!(name = %supplier.name, "Supplier added");
    Ok(Supplier {
        id: outcome.generated_id.unwrap_or_default(),
        ..supplier
    })
}

pub async fn list_suppliers(pool: &SqlitePool) -> AppResult<Vec<Supplier>> {
    let rows = sqlx::query_as::<_, Supplier>(
        "SELECT id, name, contact, email, address FROM suppliers ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_purchase_order(
    pool: &SqlitePool,
    input: NewPurchaseOrder,
    today: NaiveDate,
) -> AppResult<PurchaseOrder> {
    let po_no = require_text("po_no", &input.po_no)?;
    check_amount("total_amount", input.total_amount, true)?;

    let created_on = input.created_on.unwrap_or(today);
    let due_date = match input.due_date {
        Some(due) => due,
        None => created_on
            .checked_add_days(Days::new(DEFAULT_PO_TERM_DAYS))
            .ok_or_else(|| AppError::Validation("created_on is out of range".to_string()))?,
    };
    if due_date < created_on {
        return Err(AppError::Validation(
            "due_date cannot be before created_on".to_string(),
        ));
    }

    let po = PurchaseOrder {
        id: 0,
        po_no,
        supplier_id: input.supplier_id,
        created_on,
        due_date: Some(due_date),
        items: clean(input.items.as_deref()),
        total_amount: input.total_amount,
        status: PoStatus::Pending.to_string(),
        notes: clean(input.notes.as_deref()),
    };

    let outcome = execute(
        pool,
        r#"
        INSERT INTO purchase_orders
            (po_no, supplier_id, created_on, due_date, items, total_amount, status, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        &[
            po.po_no.as_str().into(),
            po.supplier_id.into(),
            po.created_on.into(),
            po.due_date.into(),
            po.items.clone().into(),
            po.total_amount.into(),
            po.status.as_str().into(),
            po.notes.clone().into(),
        ],
    )
    .await?;

    info!(po_no = %po.po_no, total = po.total_amount, "Purchase order created");
    Ok(PurchaseOrder {
        id: outcome.generated_id.unwrap_or_default(),
        ..po
    })
}

/// Purchase orders newest first with the supplier name, optionally by status.
pub async fn list_purchase_orders(
    pool: &SqlitePool,
    status: Option<PoStatus>,
) -> AppResult<Vec<PurchaseOrderView>> {
    let rows = sqlx::query_as::<_, PurchaseOrderView>(
        r#"
        SELECT p.id, p.po_no, s.name AS supplier, p.created_on, p.due_date,
               p.total_amount, p.status
        FROM purchase_orders p
        LEFT JOIN suppliers s ON p.supplier_id = s.id
        WHERE (?1 IS NULL OR p.status = ?1)
        ORDER BY p.id DESC
        "#,
    )
    .bind(status.map(|s| s.as_ref().to_string()))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn set_purchase_order_status(
    pool: &SqlitePool,
    po_id: i64,
    status: PoStatus,
) -> AppResult<()> {
    transition(pool, TableKind::PurchaseOrders, "Purchase order", po_id, status).await
}
