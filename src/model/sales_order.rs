use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SalesOrder {
    pub id: i64,
    pub order_no: String,
    pub customer_id: Option<i64>,
    #[schema(value_type = String)]
    pub order_date: NaiveDate,
    pub total_amount: f64,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct SalesOrderView {
    pub id: i64,
    pub order_no: String,
    pub customer: Option<String>,
    #[schema(value_type = String)]
    pub order_date: NaiveDate,
    pub total_amount: f64,
    pub status: String,
}
