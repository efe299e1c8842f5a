use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Ticket {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub subject: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub created_on: NaiveDate,
    pub status: String,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct TicketView {
    pub id: i64,
    pub customer: Option<String>,
    pub subject: String,
    #[schema(value_type = String)]
    pub created_on: NaiveDate,
    pub status: String,
    pub assigned_to: Option<String>,
}
