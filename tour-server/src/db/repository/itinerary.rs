//! Itinerary Repository

use super::{RepoError, RepoResult};
use shared::models::{ItineraryDay, ItineraryDayCreate, ItineraryDayUpdate};
use sqlx::SqlitePool;

const DAY_SELECT: &str =
    "SELECT id, group_id, day_no, date, title, content, created_at, updated_at FROM itinerary_days";

pub async fn find_for_group(pool: &SqlitePool, group_id: i64) -> RepoResult<Vec<ItineraryDay>> {
    let sql = format!("{DAY_SELECT} WHERE group_id = ? ORDER BY day_no");
    let rows = sqlx::query_as::<_, ItineraryDay>(&sql)
        .bind(group_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ItineraryDay>> {
    let sql = format!("{DAY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, ItineraryDay>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ItineraryDayCreate) -> RepoResult<ItineraryDay> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO itinerary_days (id, group_id, day_no, date, title, content, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(data.group_id)
    .bind(data.day_no)
    .bind(&data.date)
    .bind(&data.title)
    .bind(&data.content)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create itinerary day".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ItineraryDayUpdate,
) -> RepoResult<ItineraryDay> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE itinerary_days SET day_no = COALESCE(?1, day_no), date = COALESCE(?2, date), \
         title = COALESCE(?3, title), content = COALESCE(?4, content), updated_at = ?5 WHERE id = ?6",
    )
    .bind(data.day_no)
    .bind(&data.date)
    .bind(&data.title)
    .bind(&data.content)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Itinerary day {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Itinerary day {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM itinerary_days WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
