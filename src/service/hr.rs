use crate::error::{AppError, AppResult};
use crate::model::attendance::{Attendance, AttendanceView};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveView};
use crate::model::status::{AttendanceStatus, LeaveStatus, LeaveType};
use crate::service::{paginate, transition};
use crate::utils::db_utils::{SqlValue, TableKind, execute, to_arguments};
use crate::utils::validation::{check_email, check_phone, clean, require_text};
use chrono::{Datelike, Months, NaiveDate};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewEmployee {
    #[schema(example = "EMP-001")]
    #[validate(length(max = 32))]
    pub emp_code: String,
    #[schema(example = "John Doe")]
    #[validate(length(max = 120))]
    pub name: String,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    #[schema(example = "Developer")]
    pub role: Option<String>,
    /// Defaults to today
    #[schema(example = "2026-01-01", value_type = Option<String>)]
    pub hire_date: Option<NaiveDate>,
    #[schema(example = "john@email.com")]
    #[validate(length(max = 254))]
    pub email: Option<String>,
    #[schema(example = "+8801712345678")]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilter {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Exact department match
    pub department: Option<String>,
    /// Matches code, name or email
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewAttendance {
    #[schema(example = "EMP-001")]
    pub emp_code: String,
    /// Defaults to today
    #[schema(example = "2026-01-15", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewLeave {
    #[schema(example = "EMP-001")]
    pub emp_code: String,
    pub leave_type: LeaveType,
    #[schema(example = "2026-02-01", value_type = String)]
    pub start_date: NaiveDate,
    /// Defaults to start_date
    #[schema(example = "2026-02-03", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

pub async fn employee_id_by_code(pool: &SqlitePool, emp_code: &str) -> AppResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM employees WHERE emp_code = ?")
        .bind(emp_code.trim())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee '{}' not found", emp_code.trim())))
}

async fn employee_by_id(pool: &SqlitePool, id: i64) -> AppResult<Employee> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, emp_code, name, department, role, hire_date, email, phone
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee {id} not found")))
}

pub async fn create_employee(
    pool: &SqlitePool,
    input: NewEmployee,
    today: NaiveDate,
) -> AppResult<Employee> {
    input.validate()?;

    let emp_code = require_text("emp_code", &input.emp_code)?;
    let name = require_text("name", &input.name)?;
    let email = clean(input.email.as_deref());
    let phone = clean(input.phone.as_deref());
    check_email("email", email.as_deref())?;
    check_phone("phone", phone.as_deref())?;

    let outcome = execute(
        pool,
        r#"
        INSERT INTO employees (emp_code, name, department, role, hire_date, email, phone)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        &[
            emp_code.clone().into(),
            name.into(),
            clean(input.department.as_deref()).into(),
            clean(input.role.as_deref()).into(),
            input.hire_date.unwrap_or(today).into(),
            email.into(),
            phone.into(),
        ],
    )
    .await?;

    let id = outcome
        .generated_id
        .ok_or_else(|| AppError::ConstraintViolation(format!("Employee '{emp_code}' was not stored")))?;
    info!(id, emp_code = %emp_code, "Employee created");
    employee_by_id(pool, id).await
}

pub async fn get_employee_by_code(pool: &SqlitePool, emp_code: &str) -> AppResult<Employee> {
    let id = employee_id_by_code(pool, emp_code).await?;
    employee_by_id(pool, id).await
}

/// Search text matches literally: `%`, `_` and the escape itself are escaped.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// One page of employees plus the total matching the filter.
pub async fn list_employees(
    pool: &SqlitePool,
    filter: &EmployeeFilter,
) -> AppResult<(Vec<Employee>, i64, u32, u32)> {
    let (page, per_page, offset) = paginate(filter.page, filter.per_page);

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<SqlValue> = Vec::new();

    if let Some(department) = clean(filter.department.as_deref()) {
        conditions.push("department = ?");
        bindings.push(department.into());
    }

    if let Some(search) = clean(filter.search.as_deref()) {
        conditions.push(
            "(emp_code LIKE ? ESCAPE '\\' OR name LIKE ? ESCAPE '\\' OR email LIKE ? ESCAPE '\\')",
        );
        let like = format!("%{}%", escape_like(&search));
        bindings.push(like.clone().into());
        bindings.push(like.clone().into());
        bindings.push(like.into());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) FROM employees {where_clause}");
    debug!(sql = %count_sql, bindings = ?bindings, "Counting employees");
    let total: i64 = sqlx::query_scalar_with(&count_sql, to_arguments(&bindings))
        .fetch_one(pool)
        .await?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT id, emp_code, name, department, role, hire_date, email, phone \
         FROM employees {where_clause} ORDER BY id DESC LIMIT ? OFFSET ?"
    );
    bindings.push(i64::from(per_page).into());
    bindings.push(i64::from(offset).into());
    debug!(sql = %data_sql, page, per_page, offset, "Fetching employees");

    let employees = sqlx::query_as_with::<_, Employee, _>(&data_sql, to_arguments(&bindings))
        .fetch_all(pool)
        .await?;

    Ok((employees, total, page, per_page))
}

pub async fn mark_attendance(
    pool: &SqlitePool,
    input: NewAttendance,
    today: NaiveDate,
) -> AppResult<Attendance> {
    let emp_id = employee_id_by_code(pool, &input.emp_code).await?;
    let date = input.date.unwrap_or(today);

    let outcome = execute(
        pool,
        "INSERT INTO attendance (emp_id, date, status, note) VALUES (?, ?, ?, ?)",
        &[
            emp_id.into(),
            date.into(),
            input.status.as_ref().into(),
            clean(input.note.as_deref()).into(),
        ],
    )
    .await?;

    info!(emp_id, %date, status = %input.status, "Attendance saved");
    Ok(Attendance {
        id: outcome.generated_id.unwrap_or_default(),
        emp_id,
        date,
        status: input.status.to_string(),
        note: clean(input.note.as_deref()),
    })
}

/// Attendance rows for one calendar month, joined with employee code/name.
pub async fn attendance_for_month(
    pool: &SqlitePool,
    year: i32,
    month: u32,
) -> AppResult<Vec<AttendanceView>> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Validation(format!("Invalid month {year}-{month}")))?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| AppError::Validation(format!("Invalid month {year}-{month}")))?;

    let rows = sqlx::query_as::<_, AttendanceView>(
        r#"
        SELECT a.id, e.emp_code, e.name, a.date, a.status, a.note
        FROM attendance a
        JOIN employees e ON a.emp_id = e.id
        WHERE a.date BETWEEN ? AND ?
        ORDER BY a.date, a.id
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    debug!(year, month = start.month(), rows = rows.len(), "Attendance month view");
    Ok(rows)
}

pub async fn apply_leave(
    pool: &SqlitePool,
    input: NewLeave,
    today: NaiveDate,
) -> AppResult<LeaveRequest> {
    let end_date = input.end_date.unwrap_or(input.start_date);
    if input.start_date > end_date {
        return Err(AppError::Validation(
            "start_date cannot be after end_date".to_string(),
        ));
    }

    let emp_id = employee_id_by_code(pool, &input.emp_code).await?;
    let reason = clean(input.reason.as_deref());

    let outcome = execute(
        pool,
        r#"
        INSERT INTO leaves (emp_id, leave_type, start_date, end_date, reason, status, applied_on)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        &[
            emp_id.into(),
            input.leave_type.as_ref().into(),
            input.start_date.into(),
            end_date.into(),
            reason.clone().into(),
            LeaveStatus::Pending.as_ref().into(),
            today.into(),
        ],
    )
    .await?;

    info!(emp_id, leave_type = %input.leave_type, "Leave applied (Pending approval)");
    Ok(LeaveRequest {
        id: outcome.generated_id.unwrap_or_default(),
        emp_id,
        leave_type: input.leave_type.to_string(),
        start_date: input.start_date,
        end_date,
        reason,
        status: LeaveStatus::Pending.to_string(),
        applied_on: today,
    })
}

/// Leave requests joined with the employee, Pending only unless a status is given.
pub async fn list_leaves(
    pool: &SqlitePool,
    status: Option<LeaveStatus>,
) -> AppResult<Vec<LeaveView>> {
    let status = status.unwrap_or(LeaveStatus::Pending);
    let rows = sqlx::query_as::<_, LeaveView>(
        r#"
        SELECT l.id, e.emp_code, e.name, l.leave_type, l.start_date, l.end_date, l.reason, l.status
        FROM leaves l
        JOIN employees e ON l.emp_id = e.id
        WHERE l.status = ?
        ORDER BY l.id
        "#,
    )
    .bind(status.as_ref())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn pending_leaves(pool: &SqlitePool) -> AppResult<Vec<LeaveView>> {
    list_leaves(pool, Some(LeaveStatus::Pending)).await
}

/// Approve or reject a pending leave request.
pub async fn set_leave_status(
    pool: &SqlitePool,
    leave_id: i64,
    status: LeaveStatus,
) -> AppResult<()> {
    transition(pool, TableKind::Leaves, "Leave request", leave_id, status).await
}
