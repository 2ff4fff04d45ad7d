//! Spot Repository

use super::{RepoError, RepoResult};
use shared::models::{Spot, SpotCreate, SpotUpdate};
use sqlx::SqlitePool;

const SPOT_SELECT: &str =
    "SELECT id, name, category, address, description, audio_lang, created_at, updated_at FROM spots";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Spot>> {
    let sql = format!("{SPOT_SELECT} ORDER BY name");
    let rows = sqlx::query_as::<_, Spot>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Spot>> {
    let sql = format!("{SPOT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Spot>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: SpotCreate) -> RepoResult<Spot> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO spots (id, name, category, address, description, audio_lang, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.category)
    .bind(&data.address)
    .bind(&data.description)
    .bind(&data.audio_lang)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create spot".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: SpotUpdate) -> RepoResult<Spot> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE spots SET name = COALESCE(?1, name), category = COALESCE(?2, category), \
         address = COALESCE(?3, address), description = COALESCE(?4, description), \
         audio_lang = COALESCE(?5, audio_lang), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.category)
    .bind(&data.address)
    .bind(&data.description)
    .bind(&data.audio_lang)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Spot {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Spot {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM spots WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
