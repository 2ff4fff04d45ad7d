//! Check-in Repository
//!
//! 在席語義：`traveler_id` 帶 UNIQUE 約束，資料庫層保證同一團員
//! 至多一筆有效記錄，併發重複報到以 INSERT OR IGNORE 吸收。

use super::{RepoError, RepoResult};
use shared::models::CheckIn;
use sqlx::SqlitePool;

const CHECK_IN_SELECT: &str = "SELECT id, traveler_id, location_name, created_at FROM check_ins";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<CheckIn>> {
    let sql = format!("{CHECK_IN_SELECT} ORDER BY created_at");
    let rows = sqlx::query_as::<_, CheckIn>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// 某團的有效報到記錄（跨 travelers 關聯過濾）
pub async fn find_for_group(pool: &SqlitePool, group_id: i64) -> RepoResult<Vec<CheckIn>> {
    let rows = sqlx::query_as::<_, CheckIn>(
        "SELECT c.id, c.traveler_id, c.location_name, c.created_at FROM check_ins c \
         JOIN travelers t ON t.id = c.traveler_id WHERE t.group_id = ? ORDER BY c.created_at",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_traveler(
    pool: &SqlitePool,
    traveler_id: i64,
) -> RepoResult<Option<CheckIn>> {
    let sql = format!("{CHECK_IN_SELECT} WHERE traveler_id = ?");
    let row = sqlx::query_as::<_, CheckIn>(&sql)
        .bind(traveler_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// 目前已報到的團員 ID 集合（載入/重新同步用）
pub async fn active_traveler_ids(pool: &SqlitePool) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar("SELECT traveler_id FROM check_ins")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

/// 報到：不存在才插入，回傳實際寫入的記錄
///
/// UNIQUE(traveler_id) 之下兩個併發插入只會成功一個，
/// 後寫者由 OR IGNORE 吸收後讀回既有記錄。
pub async fn insert_if_absent(
    pool: &SqlitePool,
    traveler_id: i64,
    location_name: Option<&str>,
) -> RepoResult<CheckIn> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT OR IGNORE INTO check_ins (id, traveler_id, location_name, created_at) \
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(id)
    .bind(traveler_id)
    .bind(location_name)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_traveler(pool, traveler_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to record check-in".into()))
}

/// 取消報到：刪除該團員的在席記錄（無記錄時回傳 false）
pub async fn delete_by_traveler(pool: &SqlitePool, traveler_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM check_ins WHERE traveler_id = ?")
        .bind(traveler_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
