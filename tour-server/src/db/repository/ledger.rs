//! Ledger Repository

use super::{RepoError, RepoResult};
use shared::models::{LedgerEntry, LedgerEntryCreate, LedgerEntryUpdate};
use sqlx::SqlitePool;

const ENTRY_SELECT: &str = "SELECT id, group_id, happened_on, category, description, amount, currency, payer, created_at, updated_at FROM ledger_entries";

pub async fn find_for_group(pool: &SqlitePool, group_id: i64) -> RepoResult<Vec<LedgerEntry>> {
    let sql = format!("{ENTRY_SELECT} WHERE group_id = ? ORDER BY happened_on, created_at");
    let rows = sqlx::query_as::<_, LedgerEntry>(&sql)
        .bind(group_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LedgerEntry>> {
    let sql = format!("{ENTRY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, LedgerEntry>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: LedgerEntryCreate) -> RepoResult<LedgerEntry> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let currency = data.currency.unwrap_or_else(|| "TWD".to_string());
    sqlx::query(
        "INSERT INTO ledger_entries (id, group_id, happened_on, category, description, amount, currency, payer, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(data.group_id)
    .bind(&data.happened_on)
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.amount)
    .bind(&currency)
    .bind(&data.payer)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create ledger entry".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: LedgerEntryUpdate,
) -> RepoResult<LedgerEntry> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE ledger_entries SET happened_on = COALESCE(?1, happened_on), \
         category = COALESCE(?2, category), description = COALESCE(?3, description), \
         amount = COALESCE(?4, amount), currency = COALESCE(?5, currency), \
         payer = COALESCE(?6, payer), updated_at = ?7 WHERE id = ?8",
    )
    .bind(&data.happened_on)
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.amount)
    .bind(&data.currency)
    .bind(&data.payer)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Ledger entry {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Ledger entry {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM ledger_entries WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
