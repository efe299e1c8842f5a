use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: i64,
    pub emp_id: i64,
    pub leave_type: String,
    #[schema(value_type = String)]
    pub start_date: NaiveDate,
    #[schema(value_type = String)]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: String,
    #[schema(value_type = String)]
    pub applied_on: NaiveDate,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct LeaveView {
    pub id: i64,
    pub emp_code: String,
    pub name: String,
    pub leave_type: String,
    #[schema(value_type = String)]
    pub start_date: NaiveDate,
    #[schema(value_type = String)]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: String,
}
