use crate::error::{AppError, AppResult};
use crate::model::attendance::AttendanceView;
use crate::utils::db_utils::{SqlValue, to_arguments};
use crate::utils::pdf::SnapshotPdf;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::{debug, info};
use utoipa::ToSchema;

pub const DEFAULT_SNAPSHOT_TITLE: &str = "Enterprise Project Snapshot";

/// Which transactions a summary covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    All,
    /// `tx_date >= today - n days`
    TrailingDays(u32),
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display,
    EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Bucket {
    #[default]
    Day,
    Month,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct TypeTotal {
    pub tx_type: String,
    pub total: f64,
}

/// Gross income and expense within one bucket; `total` is their sum.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct BucketTotal {
    /// `YYYY-MM-DD` or `YYYY-MM`
    pub bucket: String,
    pub income: f64,
    pub expense: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TransactionSummary {
    pub by_type: Vec<TypeTotal>,
    pub income: f64,
    pub expense: f64,
    pub net_balance: f64,
    pub series: Vec<BucketTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct DepartmentCount {
    pub department: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct OverviewCounts {
    pub employees: i64,
    pub customers: i64,
    pub pending_purchase_orders: i64,
    pub open_tickets: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct CrmOverview {
    pub open_tickets: i64,
    pub customers: i64,
    pub sales_orders: i64,
}

fn window_start(window: Window, today: NaiveDate) -> AppResult<Option<NaiveDate>> {
    match window {
        Window::All => Ok(None),
        Window::TrailingDays(days) => today
            .checked_sub_days(Days::new(u64::from(days)))
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Window of {days} days is out of range"))),
    }
}

/// Next bucket key after `key`, or None when the key cannot be parsed.
fn next_bucket(bucket: Bucket, key: &str) -> Option<String> {
    match bucket {
        Bucket::Day => NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .ok()?
            .succ_opt()
            .map(|d| d.format("%Y-%m-%d").to_string()),
        Bucket::Month => NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
            .ok()?
            .checked_add_months(Months::new(1))
            .map(|d| format!("{:04}-{:02}", d.year(), d.month())),
    }
}

/// Insert zero buckets between consecutive populated ones. `rows` must be
/// ordered by bucket key.
fn fill_gaps(bucket: Bucket, rows: Vec<BucketTotal>) -> Vec<BucketTotal> {
    let mut filled: Vec<BucketTotal> = Vec::with_capacity(rows.len());
    for row in rows {
        let mut key = filled.last().and_then(|last| next_bucket(bucket, &last.bucket));
        while let Some(k) = key.filter(|k| k.as_str() < row.bucket.as_str()) {
            key = next_bucket(bucket, &k);
            filled.push(BucketTotal {
                bucket: k,
                income: 0.0,
                expense: 0.0,
                total: 0.0,
            });
        }
        filled.push(row);
    }
    filled
}

/// Per-type totals, net balance and a gap-filled income/expense series.
pub async fn summarize_transactions(
    pool: &SqlitePool,
    window: Window,
    bucket: Bucket,
    today: NaiveDate,
) -> AppResult<TransactionSummary> {
    let start = window_start(window, today)?;
    let (where_clause, bindings): (&str, Vec<SqlValue>) = match start {
        Some(start) => ("WHERE tx_date >= ?", vec![start.into()]),
        None => ("", Vec::new()),
    };

    let by_type_sql = format!(
        "SELECT tx_type, COALESCE(SUM(amount), 0.0) AS total FROM transactions \
         {where_clause} GROUP BY tx_type ORDER BY tx_type"
    );
    let by_type = sqlx::query_as_with::<_, TypeTotal, _>(&by_type_sql, to_arguments(&bindings))
        .fetch_all(pool)
        .await?;

    let key = match bucket {
        Bucket::Day => "substr(tx_date, 1, 10)",
        Bucket::Month => "substr(tx_date, 1, 7)",
    };
    let series_sql = format!(
        "SELECT {key} AS bucket, \
                COALESCE(SUM(CASE WHEN tx_type = 'Income' THEN amount END), 0.0) AS income, \
                COALESCE(SUM(CASE WHEN tx_type = 'Expense' THEN amount END), 0.0) AS expense, \
                COALESCE(SUM(amount), 0.0) AS total \
         FROM transactions {where_clause} GROUP BY bucket ORDER BY bucket"
    );
    let series = sqlx::query_as_with::<_, BucketTotal, _>(&series_sql, to_arguments(&bindings))
        .fetch_all(pool)
        .await?;

    let income = by_type
        .iter()
        .filter(|t| t.tx_type == "Income")
        .map(|t| t.total)
        .sum::<f64>();
    let expense = by_type
        .iter()
        .filter(|t| t.tx_type == "Expense")
        .map(|t| t.total)
        .sum::<f64>();

    debug!(?window, %bucket, buckets = series.len(), "Transaction summary");
    Ok(TransactionSummary {
        by_type,
        income,
        expense,
        net_balance: income - expense,
        series: fill_gaps(bucket, series),
    })
}

/// Employee count per department; blank departments count as Unassigned.
pub async fn headcount_by_department(pool: &SqlitePool) -> AppResult<Vec<DepartmentCount>> {
    let rows = sqlx::query_as::<_, DepartmentCount>(
        r#"
        SELECT COALESCE(NULLIF(TRIM(department), ''), 'Unassigned') AS department,
               COUNT(*) AS count
        FROM employees
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn pending_counts(pool: &SqlitePool) -> AppResult<OverviewCounts> {
    let counts = sqlx::query_as::<_, OverviewCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM employees) AS employees,
            (SELECT COUNT(*) FROM customers) AS customers,
            (SELECT COUNT(*) FROM purchase_orders WHERE status = 'Pending')
                AS pending_purchase_orders,
            (SELECT COUNT(*) FROM tickets WHERE status = 'Open') AS open_tickets
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(counts)
}

pub async fn crm_overview(pool: &SqlitePool) -> AppResult<CrmOverview> {
    let overview = sqlx::query_as::<_, CrmOverview>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM tickets WHERE status = 'Open') AS open_tickets,
            (SELECT COUNT(*) FROM customers) AS customers,
            (SELECT COUNT(*) FROM sales_orders) AS sales_orders
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(overview)
}

/// Absences inside the trailing window, newest first.
pub async fn recent_absences(
    pool: &SqlitePool,
    days: u32,
    today: NaiveDate,
) -> AppResult<Vec<AttendanceView>> {
    let since = window_start(Window::TrailingDays(days), today)?;
    let rows = sqlx::query_as::<_, AttendanceView>(
        r#"
        SELECT a.id, e.emp_code, e.name, a.date, a.status, a.note
        FROM attendance a
        JOIN employees e ON a.emp_id = e.id
        WHERE a.status = 'Absent' AND a.date >= ?
        ORDER BY a.date DESC, a.id DESC
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// One-page summary: title, then Employees, Customers, Pending POs and Open
/// Tickets counts.
pub async fn snapshot_pdf(pool: &SqlitePool, title: Option<&str>) -> AppResult<Vec<u8>> {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_SNAPSHOT_TITLE);
    let counts = pending_counts(pool).await?;

    let bytes = SnapshotPdf::new(title)
        .section("Employees", counts.employees.to_string())
        .section("Customers", counts.customers.to_string())
        .section("Pending POs", counts.pending_purchase_orders.to_string())
        .section("Open Tickets", counts.open_tickets.to_string())
        .render();

    info!(title, bytes = bytes.len(), "Snapshot PDF generated");
    Ok(bytes)
}
