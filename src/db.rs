use crate::auth::password::hash_password;
use crate::model::role::Role;
use anyhow::{Context, Result, anyhow};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// Business tables first, then the auth tables that reference them.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        emp_code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        department TEXT,
        role TEXT,
        hire_date TEXT NOT NULL,
        email TEXT,
        phone TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        emp_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
        date TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('Present', 'Absent', 'Leave')),
        note TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS leaves (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        emp_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
        leave_type TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        reason TEXT,
        status TEXT NOT NULL DEFAULT 'Pending'
            CHECK (status IN ('Pending', 'Approved', 'Rejected')),
        applied_on TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tx_date TEXT NOT NULL,
        tx_type TEXT NOT NULL CHECK (tx_type IN ('Income', 'Expense')),
        category TEXT,
        amount REAL NOT NULL DEFAULT 0 CHECK (amount >= 0),
        reference TEXT,
        notes TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS suppliers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        contact TEXT,
        email TEXT,
        address TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS purchase_orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        po_no TEXT NOT NULL UNIQUE,
        supplier_id INTEGER REFERENCES suppliers(id) ON DELETE SET NULL,
        created_on TEXT NOT NULL,
        due_date TEXT,
        items TEXT,
        total_amount REAL NOT NULL DEFAULT 0 CHECK (total_amount >= 0),
        status TEXT NOT NULL DEFAULT 'Pending'
            CHECK (status IN ('Pending', 'Approved', 'Received', 'Cancelled')),
        notes TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        cust_code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        email TEXT,
        phone TEXT,
        company TEXT,
        notes TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS tickets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id INTEGER REFERENCES customers(id) ON DELETE SET NULL,
        subject TEXT NOT NULL,
        description TEXT,
        created_on TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'Open' CHECK (status IN ('Open', 'Closed')),
        assigned_to TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS sales_orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_no TEXT NOT NULL UNIQUE,
        customer_id INTEGER REFERENCES customers(id) ON DELETE SET NULL,
        order_date TEXT NOT NULL,
        total_amount REAL NOT NULL DEFAULT 0 CHECK (total_amount >= 0),
        status TEXT NOT NULL DEFAULT 'New'
            CHECK (status IN ('New', 'Confirmed', 'Fulfilled', 'Cancelled')),
        notes TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password TEXT NOT NULL,
        role_id INTEGER NOT NULL,
        employee_id INTEGER REFERENCES employees(id) ON DELETE SET NULL,
        last_login_at TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS refresh_tokens (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        jti TEXT NOT NULL UNIQUE,
        expires_at INTEGER NOT NULL,
        revoked INTEGER NOT NULL DEFAULT 0
    )"#,
];

pub async fn init_db(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Create every table that does not exist yet.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    for ddl in SCHEMA {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .context("Failed to apply schema")?;
    }
    info!(tables = SCHEMA.len(), "Schema ready");
    Ok(())
}

/// Seed the first administrator so a fresh store can be logged into.
pub async fn seed_admin(pool: &SqlitePool, username: &str, password: &str) -> Result<bool> {
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if users > 0 {
        return Ok(false);
    }

    let hashed = hash_password(password).map_err(|e| anyhow!("Failed to hash password: {e}"))?;
    sqlx::query("INSERT INTO users (username, password, role_id) VALUES (?, ?, ?)")
        .bind(username)
        .bind(hashed)
        .bind(Role::Admin as i64)
        .execute(pool)
        .await?;

    info!(username, "Seeded administrator account");
    Ok(true)
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    // one connection, otherwise every pooled connection sees its own empty database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    migrate(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn migrate_is_idempotent() {
        let pool = memory_pool().await;
        migrate(&pool).await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 11);
    }

    #[actix_web::test]
    async fn seed_admin_only_on_empty_store() {
        let pool = memory_pool().await;
        assert!(seed_admin(&pool, "admin", "secret").await.unwrap());
        assert!(!seed_admin(&pool, "other", "secret").await.unwrap());

        let role: i64 = sqlx::query_scalar("SELECT role_id FROM users WHERE username = 'ADMIN'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(role, Role::Admin as i64);
    }

    #[actix_web::test]
    async fn attendance_cascades_with_employee() {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO employees (emp_code, name, hire_date) VALUES ('E1', 'Ann', '2024-01-01')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO attendance (emp_id, date, status) VALUES (1, '2024-02-01', 'Present')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("DELETE FROM employees WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(left, 0);
    }

    #[actix_web::test]
    async fn purchase_order_supplier_is_nulled_out() {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO suppliers (name) VALUES ('Acme')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO purchase_orders (po_no, supplier_id, created_on) VALUES ('PO-1', 1, '2024-01-01')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("DELETE FROM suppliers WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let supplier: Option<i64> =
            sqlx::query_scalar("SELECT supplier_id FROM purchase_orders WHERE po_no = 'PO-1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(supplier, None);
    }
}
