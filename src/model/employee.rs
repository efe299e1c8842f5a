use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "emp_code": "EMP-001",
        "name": "John Doe",
        "department": "Engineering",
        "role": "Developer",
        "hire_date": "2024-01-01",
        "email": "john.doe@company.com",
        "phone": "+8801712345678"
    })
)]
pub struct Employee {
    pub id: i64,

    #[schema(example = "EMP-001")]
    pub emp_code: String,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,

    #[schema(example = "Developer", nullable = true)]
    pub role: Option<String>,

    #[schema(example = "2024-01-01", value_type = String)]
    pub hire_date: NaiveDate,

    #[schema(example = "john.doe@company.com", nullable = true)]
    pub email: Option<String>,

    #[schema(example = "+8801712345678", nullable = true)]
    pub phone: Option<String>,
}
