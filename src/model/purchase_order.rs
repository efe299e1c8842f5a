use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PurchaseOrder {
    pub id: i64,
    pub po_no: String,
    pub supplier_id: Option<i64>,
    #[schema(value_type = String)]
    pub created_on: NaiveDate,
    #[schema(value_type = Option<String>)]
    pub due_date: Option<NaiveDate>,
    pub items: Option<String>,
    pub total_amount: f64,
    pub status: String,
    pub notes: Option<String>,
}

/// Purchase order with the supplier's name, NULL once the supplier is gone.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct PurchaseOrderView {
    pub id: i64,
    pub po_no: String,
    pub supplier: Option<String>,
    #[schema(value_type = String)]
    pub created_on: NaiveDate,
    #[schema(value_type = Option<String>)]
    pub due_date: Option<NaiveDate>,
    pub total_amount: f64,
    pub status: String,
}
