use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: i64,
    pub emp_id: i64,
    #[schema(value_type = String)]
    pub date: NaiveDate,
    pub status: String,
    pub note: Option<String>,
}

/// Attendance row joined with the employee's code and name.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceView {
    pub id: i64,
    pub emp_code: String,
    pub name: String,
    #[schema(value_type = String)]
    pub date: NaiveDate,
    pub status: String,
    pub note: Option<String>,
}
