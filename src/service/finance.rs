use crate::error::AppResult;
use crate::model::status::TxType;
use crate::model::transaction::Transaction;
use crate::utils::db_utils::{SqlValue, execute, to_arguments};
use crate::utils::validation::{check_amount, clean};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewTransaction {
    /// Defaults to today
    #[schema(example = "2026-01-15", value_type = Option<String>)]
    pub tx_date: Option<NaiveDate>,
    pub tx_type: TxType,
    #[schema(example = "Sales")]
    pub category: Option<String>,
    #[schema(example = 1250.5)]
    pub amount: f64,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionFilter {
    pub tx_type: Option<TxType>,
    /// Inclusive lower bound on tx_date
    #[param(value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on tx_date
    #[param(value_type = Option<String>)]
    pub to: Option<NaiveDate>,
}

pub async fn record_transaction(
    pool: &SqlitePool,
    input: NewTransaction,
    today: NaiveDate,
) -> AppResult<Transaction> {
    check_amount("amount", input.amount, false)?;

    let tx = Transaction {
        id: 0,
        tx_date: input.tx_date.unwrap_or(today),
        tx_type: input.tx_type.to_string(),
        category: clean(input.category.as_deref()),
        amount: input.amount,
        reference: clean(input.reference.as_deref()),
        notes: clean(input.notes.as_deref()),
    };

    let outcome = execute(
        pool,
        r#"
        INSERT INTO transactions (tx_date, tx_type, category, amount, reference, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        &[
            tx.tx_date.into(),
            tx.tx_type.as_str().into(),
            tx.category.clone().into(),
            tx.amount.into(),
            tx.reference.clone().into(),
            tx.notes.clone().into(),
        ],
    )
    .await?;

    info!(tx_type = %tx.tx_type, amount = tx.amount, "Transaction recorded");
    Ok(Transaction {
        id: outcome.generated_id.unwrap_or_default(),
        ..tx
    })
}

/// Transactions newest first.
pub async fn list_transactions(
    pool: &SqlitePool,
    filter: &TransactionFilter,
) -> AppResult<Vec<Transaction>> {
    let mut conditions = Vec::new();
    let mut bindings: Vec<SqlValue> = Vec::new();

    if let Some(tx_type) = filter.tx_type {
        conditions.push("tx_type = ?");
        bindings.push(tx_type.as_ref().into());
    }
    if let Some(from) = filter.from {
        conditions.push("tx_date >= ?");
        bindings.push(from.into());
    }
    if let Some(to) = filter.to {
        conditions.push("tx_date <= ?");
        bindings.push(to.into());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT id, tx_date, tx_type, category, amount, reference, notes \
         FROM transactions {where_clause} ORDER BY tx_date DESC, id DESC"
    );
    debug!(sql = %sql, bindings = ?bindings, "Fetching transactions");

    let rows = sqlx::query_as_with::<_, Transaction, _>(&sql, to_arguments(&bindings))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
