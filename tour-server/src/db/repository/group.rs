//! Tour Group Repository

use super::{RepoError, RepoResult};
use shared::models::{TourGroup, TourGroupCreate, TourGroupUpdate};
use sqlx::SqlitePool;

const GROUP_SELECT: &str =
    "SELECT id, name, destination, join_code, starts_on, ends_on, created_at, updated_at FROM groups";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<TourGroup>> {
    let sql = format!("{GROUP_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, TourGroup>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<TourGroup>> {
    let sql = format!("{GROUP_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, TourGroup>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// 依加入碼找團體（LINE 綁定流程入口）
pub async fn find_by_join_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<TourGroup>> {
    let sql = format!("{GROUP_SELECT} WHERE join_code = ? LIMIT 1");
    let row = sqlx::query_as::<_, TourGroup>(&sql)
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: TourGroupCreate) -> RepoResult<TourGroup> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let join_code = data.join_code.unwrap_or_else(shared::util::join_code);

    // 加入碼全域唯一
    if find_by_join_code(pool, &join_code).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Join code '{join_code}' already exists"
        )));
    }

    sqlx::query(
        "INSERT INTO groups (id, name, destination, join_code, starts_on, ends_on, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.destination)
    .bind(&join_code)
    .bind(&data.starts_on)
    .bind(&data.ends_on)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create group".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: TourGroupUpdate) -> RepoResult<TourGroup> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE groups SET name = COALESCE(?1, name), destination = COALESCE(?2, destination), \
         starts_on = COALESCE(?3, starts_on), ends_on = COALESCE(?4, ends_on), updated_at = ?5 \
         WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.destination)
    .bind(&data.starts_on)
    .bind(&data.ends_on)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Group {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Group {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM groups WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
