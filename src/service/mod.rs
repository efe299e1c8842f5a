pub mod crm;
pub mod data;
pub mod finance;
pub mod hr;
pub mod procurement;
pub mod reports;

use crate::error::{AppError, AppResult};
use crate::model::status::StatusFlow;
use crate::utils::db_utils::{SqlValue, TableKind, execute, query};
use sqlx::SqlitePool;
use tracing::info;

/// Clamp page/per_page the way every list view does.
pub fn paginate(page: Option<u32>, per_page: Option<u32>) -> (u32, u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(20).clamp(1, 100);
    (page, per_page, (page - 1) * per_page)
}

/// Move a record's status to `target`, only from one of the statuses the
/// flow allows. The check and the write are one conditional UPDATE; when it
/// matches nothing the row is looked up to tell a missing id apart from a
/// disallowed transition.
pub(crate) async fn transition<S: StatusFlow>(
    pool: &SqlitePool,
    table: TableKind,
    label: &str,
    id: i64,
    target: S,
) -> AppResult<()> {
    let sources = target.sources();
    if sources.is_empty() {
        return Err(AppError::Validation(format!(
            "{label} status cannot be set to {}",
            target.as_ref()
        )));
    }

    let placeholders = vec!["?"; sources.len()].join(", ");
    let sql = format!(
        "UPDATE {} SET status = ? WHERE id = ? AND status IN ({placeholders})",
        table.table_name()
    );
    let mut params: Vec<SqlValue> = vec![target.as_ref().into(), id.into()];
    params.extend(sources.iter().map(|s| SqlValue::from(s.as_ref())));

    let outcome = execute(pool, &sql, &params).await?;
    if outcome.rows_affected > 0 {
        info!(table = %table, id, status = target.as_ref(), "Status updated");
        return Ok(());
    }

    let current = query(
        pool,
        &format!("SELECT status FROM {} WHERE id = ?", table.table_name()),
        &[id.into()],
    )
    .await?;

    match current.rows.first().and_then(|row| row.first()) {
        None => Err(AppError::NotFound(format!("{label} {id} not found"))),
        Some(status) => Err(AppError::Validation(format!(
            "{label} {id} is {status} and cannot change to {}",
            target.as_ref()
        ))),
    }
}
