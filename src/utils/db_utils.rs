use crate::error::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Arguments, Column, Row, SqlitePool, TypeInfo, ValueRef};
use std::fmt;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;
use utoipa::ToSchema;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    I64(i64),
    F64(f64),
    Date(NaiveDate),
    Null,
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlValue::Text(v) => serializer.serialize_str(v),
            SqlValue::I64(v) => serializer.serialize_i64(*v),
            SqlValue::F64(v) => serializer.serialize_f64(*v),
            SqlValue::Date(v) => serializer.collect_str(v),
            SqlValue::Null => serializer.serialize_none(),
        }
    }
}

/// Cell text as written to CSV; NULL is an empty field.
impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(v) => f.write_str(v),
            SqlValue::I64(v) => write!(f, "{v}"),
            SqlValue::F64(v) => write!(f, "{v}"),
            SqlValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            SqlValue::Null => Ok(()),
        }
    }
}

/// Untyped projection: column names in select order plus decoded rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub rows_affected: u64,
    /// Row id of the inserted row; None for updates and ignored inserts
    pub generated_id: Option<i64>,
}

/// The business tables. This is the only source of identifiers ever
/// interpolated into command text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema,
    Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TableKind {
    Employees,
    Attendance,
    Leaves,
    Transactions,
    Suppliers,
    PurchaseOrders,
    Customers,
    Tickets,
    SalesOrders,
}

impl TableKind {
    /// Allow-list check for table names arriving as request text.
    pub fn parse(raw: &str) -> AppResult<Self> {
        TableKind::from_str(raw.trim())
            .map_err(|_| AppError::Validation(format!("Unknown table '{raw}'")))
    }

    pub fn table_name(self) -> &'static str {
        match self {
            TableKind::Employees => "employees",
            TableKind::Attendance => "attendance",
            TableKind::Leaves => "leaves",
            TableKind::Transactions => "transactions",
            TableKind::Suppliers => "suppliers",
            TableKind::PurchaseOrders => "purchase_orders",
            TableKind::Customers => "customers",
            TableKind::Tickets => "tickets",
            TableKind::SalesOrders => "sales_orders",
        }
    }

    /// Columns in store order; also the CSV export header.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Employees => &[
                "id", "emp_code", "name", "department", "role", "hire_date", "email", "phone",
            ],
            TableKind::Attendance => &["id", "emp_id", "date", "status", "note"],
            TableKind::Leaves => &[
                "id", "emp_id", "leave_type", "start_date", "end_date", "reason", "status",
                "applied_on",
            ],
            TableKind::Transactions => &[
                "id", "tx_date", "tx_type", "category", "amount", "reference", "notes",
            ],
            TableKind::Suppliers => &["id", "name", "contact", "email", "address"],
            TableKind::PurchaseOrders => &[
                "id", "po_no", "supplier_id", "created_on", "due_date", "items", "total_amount",
                "status", "notes",
            ],
            TableKind::Customers => &[
                "id", "cust_code", "name", "email", "phone", "company", "notes",
            ],
            TableKind::Tickets => &[
                "id", "customer_id", "subject", "description", "created_on", "status",
                "assigned_to",
            ],
            TableKind::SalesOrders => &[
                "id", "order_no", "customer_id", "order_date", "total_amount", "status", "notes",
            ],
        }
    }

    pub fn select_all_sql(self) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY id",
            self.columns().join(", "),
            self.table_name()
        )
    }
}

/// Bind values in order; used by every dynamic read and write.
pub fn to_arguments(values: &[SqlValue]) -> SqliteArguments<'_> {
    let mut args = SqliteArguments::default();
    for value in values {
        match value {
            SqlValue::Text(v) => args.add(v.as_str()),
            SqlValue::I64(v) => args.add(*v),
            SqlValue::F64(v) => args.add(*v),
            SqlValue::Date(v) => args.add(*v),
            SqlValue::Null => args.add(None::<String>),
        }
    }
    args
}

fn decode_row(row: &SqliteRow) -> AppResult<Vec<SqlValue>> {
    let mut values = Vec::with_capacity(row.columns().len());
    for i in 0..row.columns().len() {
        let raw = row.try_get_raw(i)?;
        if raw.is_null() {
            values.push(SqlValue::Null);
            continue;
        }
        let value = match raw.type_info().name() {
            "INTEGER" => SqlValue::I64(row.try_get(i)?),
            "REAL" => SqlValue::F64(row.try_get(i)?),
            "BLOB" => {
                let bytes: Vec<u8> = row.try_get(i)?;
                SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => SqlValue::Text(row.try_get(i)?),
        };
        values.push(value);
    }
    Ok(values)
}

/// Run a parameterized read and decode every column by its storage class.
pub async fn query(pool: &SqlitePool, sql: &str, params: &[SqlValue]) -> AppResult<RowSet> {
    debug!(sql = %sql, params = ?params, "Running query");

    let rows = sqlx::query_with(sql, to_arguments(params))
        .fetch_all(pool)
        .await?;

    let columns = rows
        .first()
        .map(|r| r.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();

    let rows = rows.iter().map(decode_row).collect::<AppResult<Vec<_>>>()?;
    Ok(RowSet { columns, rows })
}

/// Run a single parameterized write. Each call commits on its own.
pub async fn execute(
    pool: &SqlitePool,
    sql: &str,
    params: &[SqlValue],
) -> AppResult<CommandOutcome> {
    debug!(sql = %sql, params = ?params, "Executing command");

    let result = sqlx::query_with(sql, to_arguments(params))
        .execute(pool)
        .await?;

    let is_insert = sql
        .trim_start()
        .get(..6)
        .is_some_and(|verb| verb.eq_ignore_ascii_case("INSERT"));

    Ok(CommandOutcome {
        rows_affected: result.rows_affected(),
        generated_id: (is_insert && result.rows_affected() > 0)
            .then(|| result.last_insert_rowid()),
    })
}

/// Every row of a business table, columns in store order.
pub async fn table_rows(pool: &SqlitePool, table: TableKind) -> AppResult<RowSet> {
    let mut rows = query(pool, &table.select_all_sql(), &[]).await?;
    // an empty result carries no column metadata
    rows.columns = table.columns().iter().map(|c| c.to_string()).collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use strum::IntoEnumIterator;

    #[test]
    fn table_names_come_from_the_allow_list() {
        assert_eq!(
            TableKind::parse("purchase_orders").unwrap(),
            TableKind::PurchaseOrders
        );
        assert!(TableKind::parse("users").is_err());
        assert!(TableKind::parse("employees; DROP TABLE employees").is_err());
        for table in TableKind::iter() {
            assert_eq!(table.as_ref(), table.table_name());
            assert_eq!(table.columns()[0], "id");
        }
    }

    #[actix_web::test]
    async fn execute_reports_generated_id_for_inserts_only() {
        let pool = memory_pool().await;
        let inserted = execute(
            &pool,
            "INSERT INTO suppliers (name, contact) VALUES (?, ?)",
            &["Acme".into(), SqlValue::Null],
        )
        .await
        .unwrap();
        assert_eq!(inserted.rows_affected, 1);
        assert_eq!(inserted.generated_id, Some(1));

        let updated = execute(
            &pool,
            "UPDATE suppliers SET contact = ? WHERE id = ?",
            &["Jane".into(), 1_i64.into()],
        )
        .await
        .unwrap();
        assert_eq!(updated.rows_affected, 1);
        assert_eq!(updated.generated_id, None);
    }

    #[actix_web::test]
    async fn query_decodes_storage_classes() {
        let pool = memory_pool().await;
        execute(
            &pool,
            "INSERT INTO transactions (tx_date, tx_type, amount, notes) VALUES (?, ?, ?, ?)",
            &[
                NaiveDate::from_ymd_opt(2026, 1, 2).unwrap().into(),
                "Income".into(),
                12.5_f64.into(),
                SqlValue::Null,
            ],
        )
        .await
        .unwrap();

        let rows = query(
            &pool,
            "SELECT id, tx_date, amount, notes FROM transactions WHERE tx_type = ?",
            &["Income".into()],
        )
        .await
        .unwrap();

        assert_eq!(rows.columns, vec!["id", "tx_date", "amount", "notes"]);
        assert_eq!(
            rows.rows,
            vec![vec![
                SqlValue::I64(1),
                SqlValue::Text("2026-01-02".into()),
                SqlValue::F64(12.5),
                SqlValue::Null,
            ]]
        );
    }

    #[actix_web::test]
    async fn unique_collision_is_a_constraint_violation() {
        let pool = memory_pool().await;
        let sql = "INSERT INTO customers (cust_code, name) VALUES (?, ?)";
        execute(&pool, sql, &["C1".into(), "Ann".into()]).await.unwrap();
        let err = execute(&pool, sql, &["C1".into(), "Bob".into()])
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[actix_web::test]
    async fn empty_table_keeps_store_columns() {
        let pool = memory_pool().await;
        let rows = table_rows(&pool, TableKind::Tickets).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(rows.columns, TableKind::Tickets.columns());
    }
}
