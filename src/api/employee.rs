use crate::{
    auth::auth::AuthUser,
    model::{employee::Employee, role::Role},
    service::hr::{self, EmployeeFilter, NewEmployee},
};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::debug;
use utoipa::ToSchema;

use super::today;

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    #[schema(
    example = json!([{
        "id": 1,
        "emp_code": "EMP-001",
        "name": "John Doe",
        "department": "Engineering",
        "role": "Developer",
        "hire_date": "2024-01-01",
        "email": "john.doe@company.com",
        "phone": "+8801712345678"
    }])
)]
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Employee),
        (status = 400, description = "Invalid input", body = Object, example = json!({
            "message": "email 'x' is not a valid email address"
        })),
        (status = 409, description = "Employee code already exists", body = Object, example = json!({
            "message": "Duplicate value: UNIQUE constraint failed: employees.emp_code"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewEmployee>,
) -> actix_web::Result<HttpResponse> {
    auth.require_any(&[Role::Hr])?;

    let employee = hr::create_employee(pool.get_ref(), payload.into_inner(), today()).await?;
    Ok(HttpResponse::Created().json(employee))
}

/// Paginated employee list
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeFilter),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    pool: web::Data<SqlitePool>,
    query: web::Query<EmployeeFilter>,
) -> actix_web::Result<HttpResponse> {
    let (data, total, page, per_page) = hr::list_employees(pool.get_ref(), &query).await?;
    debug!(total, page, per_page, "Employees listed");

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Get Employee by code
#[utoipa::path(
    get,
    path = "/api/employees/{emp_code}",
    params(
        ("emp_code", Path, description = "Employee code")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee 'EMP-404' not found"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let employee = hr::get_employee_by_code(pool.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(employee))
}
