//! Bulk CSV import/export for the business tables.
//!
//! Import is row-tolerant: every row is inserted on its own, a bad row is
//! logged and counted as skipped, and the run always finishes with a report.

use crate::error::{AppError, AppResult};
use crate::model::status::{TxType, parse_enum};
use crate::utils::csv_io::{CsvRow, RawRecord, read_records, write_rows};
use crate::utils::db_utils::{TableKind, execute, table_rows};
use crate::utils::validation::{check_email, parse_date, require_text};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ImportKind {
    Employees,
    Customers,
    Transactions,
}

impl ImportKind {
    pub fn parse(raw: &str) -> AppResult<Self> {
        ImportKind::from_str(raw.trim()).map_err(|_| {
            AppError::Validation(format!(
                "Unknown import kind '{raw}'. Allowed: employees, customers, transactions"
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ImportReport {
    pub total: usize,
    pub inserted: usize,
    pub skipped: usize,
}

enum RowOutcome {
    Inserted,
    /// natural key already present
    Ignored,
}

/// First non-blank value among the accepted header names.
fn field<'a>(record: &'a RawRecord, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| record.get(*name))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

fn required(record: &RawRecord, names: &[&str]) -> AppResult<String> {
    require_text(names[0], field(record, names).unwrap_or_default())
}

fn date_or_today(record: &RawRecord, names: &[&str], today: NaiveDate) -> AppResult<NaiveDate> {
    match field(record, names) {
        Some(raw) => parse_date(names[0], raw),
        None => Ok(today),
    }
}

fn optional_email(record: &RawRecord) -> AppResult<Option<String>> {
    let email = field(record, &["email"]).map(str::to_string);
    check_email("email", email.as_deref())?;
    Ok(email)
}

/// Free text is stored verbatim; only an all-blank cell becomes NULL.
fn optional(record: &RawRecord, name: &str) -> Option<String> {
    record
        .get(name)
        .filter(|v| !v.trim().is_empty())
        .cloned()
}

/// Missing or non-numeric amounts import as zero; a negative or non-finite
/// number rejects the row.
fn amount(record: &RawRecord) -> AppResult<f64> {
    let Some(raw) = field(record, &["amount"]) else {
        return Ok(0.0);
    };
    match raw.parse::<f64>() {
        Ok(v) if !v.is_finite() => Err(AppError::Validation(format!(
            "amount '{raw}' is not a finite number"
        ))),
        Ok(v) if v < 0.0 => Err(AppError::Validation(format!(
            "amount '{raw}' must not be negative"
        ))),
        Ok(v) => Ok(v),
        Err(_) => Ok(0.0),
    }
}

fn ignored_or_inserted(rows_affected: u64) -> RowOutcome {
    if rows_affected == 0 {
        RowOutcome::Ignored
    } else {
        RowOutcome::Inserted
    }
}

async fn insert_employee(
    pool: &SqlitePool,
    record: &RawRecord,
    today: NaiveDate,
) -> AppResult<RowOutcome> {
    let emp_code = required(record, &["emp_code", "code"])?;
    let name = required(record, &["name"])?;
    let hire_date = date_or_today(record, &["hire_date"], today)?;
    let email = optional_email(record)?;

    let outcome = execute(
        pool,
        r#"
        INSERT OR IGNORE INTO employees (emp_code, name, department, role, hire_date, email, phone)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        &[
            emp_code.into(),
            name.into(),
            optional(record, "department").into(),
            optional(record, "role").into(),
            hire_date.into(),
            email.into(),
            optional(record, "phone").into(),
        ],
    )
    .await?;
    Ok(ignored_or_inserted(outcome.rows_affected))
}

async fn insert_customer(pool: &SqlitePool, record: &RawRecord) -> AppResult<RowOutcome> {
    let cust_code = required(record, &["cust_code", "code"])?;
    let name = required(record, &["name"])?;
    let email = optional_email(record)?;

    let outcome = execute(
        pool,
        r#"
        INSERT OR IGNORE INTO customers (cust_code, name, email, phone, company, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        &[
            cust_code.into(),
            name.into(),
            email.into(),
            optional(record, "phone").into(),
            optional(record, "company").into(),
            optional(record, "notes").into(),
        ],
    )
    .await?;
    Ok(ignored_or_inserted(outcome.rows_affected))
}

async fn insert_transaction(
    pool: &SqlitePool,
    record: &RawRecord,
    today: NaiveDate,
) -> AppResult<RowOutcome> {
    let tx_type: TxType = parse_enum("tx_type", &required(record, &["tx_type", "type"])?)?;
    let tx_date = date_or_today(record, &["tx_date", "date"], today)?;
    let amount = amount(record)?;

    execute(
        pool,
        r#"
        INSERT INTO transactions (tx_date, tx_type, category, amount, reference, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        &[
            tx_date.into(),
            tx_type.as_ref().into(),
            optional(record, "category").into(),
            amount.into(),
            optional(record, "reference").into(),
            optional(record, "notes").into(),
        ],
    )
    .await?;
    Ok(RowOutcome::Inserted)
}

async fn run_import(
    pool: &SqlitePool,
    kind: ImportKind,
    rows: Vec<CsvRow>,
    today: NaiveDate,
) -> ImportReport {
    let mut report = ImportReport {
        total: rows.len(),
        ..Default::default()
    };

    for (idx, row) in rows.into_iter().enumerate() {
        let row_no = idx + 1;
        let result = match row {
            Ok(record) => match kind {
                ImportKind::Employees => insert_employee(pool, &record, today).await,
                ImportKind::Customers => insert_customer(pool, &record).await,
                ImportKind::Transactions => insert_transaction(pool, &record, today).await,
            },
            Err(reason) => Err(AppError::Coercion(reason)),
        };

        match result {
            Ok(RowOutcome::Inserted) => report.inserted += 1,
            Ok(RowOutcome::Ignored) => {
                debug!(row = row_no, %kind, "Duplicate key, row ignored");
                report.skipped += 1;
            }
            Err(e) => {
                warn!(row = row_no, %kind, error = %e, "Import row skipped");
                report.skipped += 1;
            }
        }
    }

    info!(
        %kind,
        total = report.total,
        inserted = report.inserted,
        skipped = report.skipped,
        "Import finished"
    );
    report
}

/// Insert already-decoded rows; never fails as a whole.
#[instrument(skip(pool, rows), fields(rows = rows.len()))]
pub async fn import_rows(
    pool: &SqlitePool,
    kind: ImportKind,
    rows: Vec<RawRecord>,
    today: NaiveDate,
) -> ImportReport {
    run_import(pool, kind, rows.into_iter().map(Ok).collect(), today).await
}

/// Decode a CSV upload and import it. Only a missing header fails the call;
/// undecodable data rows are counted as skipped.
#[instrument(skip(pool, bytes), fields(bytes = bytes.len()))]
pub async fn import_csv(
    pool: &SqlitePool,
    kind: ImportKind,
    bytes: &[u8],
    today: NaiveDate,
) -> AppResult<ImportReport> {
    let rows = read_records(bytes)?;
    Ok(run_import(pool, kind, rows, today).await)
}

/// Whole table as CSV: store columns as header, rows in id order.
pub async fn export_table(pool: &SqlitePool, table: TableKind) -> AppResult<Vec<u8>> {
    let rows = table_rows(pool, table).await?;
    info!(%table, rows = rows.len(), "Exporting table");
    write_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn import_kind_is_an_allow_list() {
        assert_eq!(ImportKind::parse("Employees").unwrap(), ImportKind::Employees);
        assert!(ImportKind::parse("users").is_err());
    }

    #[actix_web::test]
    async fn bad_rows_are_skipped_without_aborting() {
        let pool = memory_pool().await;
        let rows = vec![
            record(&[("emp_code", "E1"), ("name", "Ann")]),
            record(&[("name", "No Code")]),
            record(&[("code", "E2"), ("name", "Bob"), ("hire_date", "yesterday")]),
            record(&[("code", "E3"), ("name", "Cy"), ("email", "not-an-email")]),
            record(&[("code", "E4"), ("name", "Di"), ("hire_date", "2025-02-03 09:30:00")]),
        ];
        let report = import_rows(&pool, ImportKind::Employees, rows, today()).await;
        assert_eq!(
            report,
            ImportReport {
                total: 5,
                inserted: 2,
                skipped: 3
            }
        );

        let hire: String = sqlx::query_scalar("SELECT hire_date FROM employees WHERE emp_code = 'E4'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(hire, "2025-02-03");
        let default_hire: String =
            sqlx::query_scalar("SELECT hire_date FROM employees WHERE emp_code = 'E1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(default_hire, "2026-06-01");
    }

    #[actix_web::test]
    async fn blank_column_falls_back_to_alias() {
        let pool = memory_pool().await;
        let rows = vec![record(&[("emp_code", " "), ("code", "E1"), ("name", "Ann")])];
        let report = import_rows(&pool, ImportKind::Employees, rows, today()).await;
        assert_eq!(report.inserted, 1);

        let code: String = sqlx::query_scalar("SELECT emp_code FROM employees")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(code, "E1");
    }

    #[actix_web::test]
    async fn quoted_free_text_keeps_its_spaces() {
        let pool = memory_pool().await;
        let csv = "cust_code,name,notes\n C1 , Ann ,\"  call after 5  \"\nC2,Bob,\"   \"\n";
        let report = import_csv(&pool, ImportKind::Customers, csv.as_bytes(), today())
            .await
            .unwrap();
        assert_eq!(report.inserted, 2);

        let (code, name, notes): (String, String, Option<String>) =
            sqlx::query_as("SELECT cust_code, name, notes FROM customers WHERE cust_code = 'C1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!((code.as_str(), name.as_str()), ("C1", "Ann"));
        assert_eq!(notes.as_deref(), Some("  call after 5  "));

        let blank: Option<String> =
            sqlx::query_scalar("SELECT notes FROM customers WHERE cust_code = 'C2'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(blank, None);
    }

    #[actix_web::test]
    async fn duplicate_keys_are_ignored() {
        let pool = memory_pool().await;
        let rows = vec![
            record(&[("cust_code", "C1"), ("name", "Ann")]),
            record(&[("cust_code", "C1"), ("name", "Again")]),
        ];
        let report = import_rows(&pool, ImportKind::Customers, rows, today()).await;
        assert_eq!((report.inserted, report.skipped), (1, 1));
        assert_eq!(count(&pool, "customers").await, 1);
    }

    #[actix_web::test]
    async fn non_numeric_amounts_import_as_zero() {
        let pool = memory_pool().await;
        let rows: Vec<RawRecord> = (0..4)
            .map(|i| record(&[("type", "expense"), ("amount", if i % 2 == 0 { "n/a" } else { "" })]))
            .collect();
        let report = import_rows(&pool, ImportKind::Transactions, rows, today()).await;
        assert_eq!(report.inserted, 4);

        let total: f64 = sqlx::query_scalar("SELECT SUM(amount) FROM transactions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 0.0);
        let tx_type: String = sqlx::query_scalar("SELECT tx_type FROM transactions LIMIT 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(tx_type, "Expense");
    }

    #[actix_web::test]
    async fn transaction_rows_need_a_known_type_and_sane_amount() {
        let pool = memory_pool().await;
        let rows = vec![
            record(&[("tx_type", "Income"), ("amount", "10.5"), ("tx_date", "2026-05-01")]),
            record(&[("amount", "3")]),
            record(&[("tx_type", "Refund"), ("amount", "3")]),
            record(&[("tx_type", "Income"), ("amount", "-3")]),
            record(&[("tx_type", "Income"), ("amount", "inf")]),
            record(&[("tx_type", "Income"), ("date", "01/05/2026")]),
        ];
        let report = import_rows(&pool, ImportKind::Transactions, rows, today()).await;
        assert_eq!((report.total, report.inserted, report.skipped), (6, 1, 5));
    }

    #[actix_web::test]
    async fn csv_upload_counts_unreadable_rows() {
        let pool = memory_pool().await;
        let mut bytes = b"Code,Name,Email\nC1,Ann,ann@corp.test\n".to_vec();
        bytes.extend_from_slice(&[b'C', b'2', b',', 0xff, b'\n']);
        bytes.extend_from_slice(b"C3,Cy,\n");

        let report = import_csv(&pool, ImportKind::Customers, &bytes, today())
            .await
            .unwrap();
        assert_eq!(
            report,
            ImportReport {
                total: 3,
                inserted: 2,
                skipped: 1
            }
        );
        assert!(import_csv(&pool, ImportKind::Customers, b"", today()).await.is_err());
    }

    #[actix_web::test]
    async fn export_then_import_round_trips() {
        let source = memory_pool().await;
        let csv = "emp_code,name,department,hire_date,email,phone\n\
                   E1,\"Doe, Jane\",Ops,2024-01-02,jane@corp.test,555 0100 22\n\
                   E2,Bob,,2024-03-04,,\n";
        let first = import_csv(&source, ImportKind::Employees, csv.as_bytes(), today())
            .await
            .unwrap();
        assert_eq!(first.inserted, 2);

        let exported = export_table(&source, TableKind::Employees).await.unwrap();
        let text = String::from_utf8(exported.clone()).unwrap();
        assert!(text.starts_with("id,emp_code,name,department,role,hire_date,email,phone\n"));

        let target = memory_pool().await;
        let again = import_csv(&target, ImportKind::Employees, &exported, today())
            .await
            .unwrap();
        assert_eq!(again.inserted, 2);
        assert_eq!(
            table_rows(&target, TableKind::Employees).await.unwrap().rows,
            table_rows(&source, TableKind::Employees).await.unwrap().rows
        );

        let repeat = import_csv(&target, ImportKind::Employees, &exported, today())
            .await
            .unwrap();
        assert_eq!((repeat.inserted, repeat.skipped), (0, 2));
    }

    #[actix_web::test]
    async fn export_of_empty_table_is_header_only() {
        let pool = memory_pool().await;
        let bytes = export_table(&pool, TableKind::Suppliers).await.unwrap();
        assert_eq!(bytes, b"id,name,contact,email,address\n");
    }
}
