//! Hotel Repository

use super::{RepoError, RepoResult};
use shared::models::{Hotel, HotelCreate, HotelUpdate};
use sqlx::SqlitePool;

const HOTEL_SELECT: &str = "SELECT id, group_id, name, address, phone, check_in_date, check_out_date, notes, created_at, updated_at FROM hotels";

pub async fn find_all(pool: &SqlitePool, group_id: Option<i64>) -> RepoResult<Vec<Hotel>> {
    let rows = match group_id {
        Some(gid) => {
            let sql = format!("{HOTEL_SELECT} WHERE group_id = ? ORDER BY check_in_date, id");
            sqlx::query_as::<_, Hotel>(&sql).bind(gid).fetch_all(pool).await?
        }
        None => {
            let sql = format!("{HOTEL_SELECT} ORDER BY check_in_date, id");
            sqlx::query_as::<_, Hotel>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Hotel>> {
    let sql = format!("{HOTEL_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Hotel>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: HotelCreate) -> RepoResult<Hotel> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO hotels (id, group_id, name, address, phone, check_in_date, check_out_date, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(data.group_id)
    .bind(&data.name)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.check_in_date)
    .bind(&data.check_out_date)
    .bind(&data.notes)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create hotel".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: HotelUpdate) -> RepoResult<Hotel> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE hotels SET group_id = COALESCE(?1, group_id), name = COALESCE(?2, name), \
         address = COALESCE(?3, address), phone = COALESCE(?4, phone), \
         check_in_date = COALESCE(?5, check_in_date), check_out_date = COALESCE(?6, check_out_date), \
         notes = COALESCE(?7, notes), updated_at = ?8 WHERE id = ?9",
    )
    .bind(data.group_id)
    .bind(&data.name)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.check_in_date)
    .bind(&data.check_out_date)
    .bind(&data.notes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Hotel {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Hotel {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM hotels WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
