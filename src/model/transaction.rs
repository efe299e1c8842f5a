use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Transaction {
    pub id: i64,
    #[schema(example = "2026-01-15", value_type = String)]
    pub tx_date: NaiveDate,
    #[schema(example = "Income")]
    pub tx_type: String,
    #[schema(example = "Sales")]
    pub category: Option<String>,
    #[schema(example = 1250.5)]
    pub amount: f64,
    pub reference: Option<String>,
    pub notes: Option<String>,
}
