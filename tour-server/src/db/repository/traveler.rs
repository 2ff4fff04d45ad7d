//! Traveler Repository

use super::{RepoError, RepoResult};
use shared::models::{TravelerCreate, TravelerUpdate};
use sqlx::SqlitePool;

const TRAVELER_SELECT: &str = "SELECT id, name, room_no, full_name, room_number, gender, dietary_needs, line_user_id, group_id, created_at, updated_at FROM travelers";

// 降級路徑用的縮減 SELECT：只讀各代結構都有的欄位，
// 避免在缺少選配欄位的部署上連回讀都失敗
const TRAVELER_CORE_SELECT: &str =
    "SELECT id, name, room_no, full_name, room_number, gender, group_id, created_at, updated_at FROM travelers";

/// 名冊資料列（含新舊兩代欄位）
///
/// 結構歷經改版：v1 寫 `name`/`room_no`，v2 起寫 `full_name`/`room_number`。
/// 舊資料列可能僅填舊欄位，正規化交由 `roster::normalize` 處理，
/// 這裡只忠實映射資料庫內容。
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TravelerRow {
    pub id: i64,
    pub name: Option<String>,
    pub room_no: Option<String>,
    pub full_name: Option<String>,
    pub room_number: Option<String>,
    pub gender: Option<String>,
    // 0003 新增的選配欄位；縮減 SELECT 不含它們，缺席時取預設 None
    #[sqlx(default)]
    pub dietary_needs: Option<String>,
    #[sqlx(default)]
    pub line_user_id: Option<String>,
    pub group_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

pub async fn find_all(pool: &SqlitePool, group_id: Option<i64>) -> RepoResult<Vec<TravelerRow>> {
    let rows = match group_id {
        Some(gid) => {
            let sql = format!("{TRAVELER_SELECT} WHERE group_id = ? ORDER BY created_at, id");
            sqlx::query_as::<_, TravelerRow>(&sql)
                .bind(gid)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{TRAVELER_SELECT} ORDER BY created_at, id");
            sqlx::query_as::<_, TravelerRow>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<TravelerRow>> {
    let sql = format!("{TRAVELER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, TravelerRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// 縮減欄位版的單筆查詢（降級寫入後的回讀）
async fn find_by_id_core(pool: &SqlitePool, id: i64) -> RepoResult<Option<TravelerRow>> {
    let sql = format!("{TRAVELER_CORE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, TravelerRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// 依顯示名稱在團內找團員（綁定流程用；同時比對新舊姓名欄位）
pub async fn find_by_name_in_group(
    pool: &SqlitePool,
    group_id: i64,
    display_name: &str,
) -> RepoResult<Option<TravelerRow>> {
    let sql = format!(
        "{TRAVELER_SELECT} WHERE group_id = ?1 AND (full_name = ?2 OR name = ?2) LIMIT 1"
    );
    let row = sqlx::query_as::<_, TravelerRow>(&sql)
        .bind(group_id)
        .bind(display_name)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// 寫入完整欄位集（可能因部署結構缺少選配欄位而回報 SchemaDrift）
pub async fn insert(pool: &SqlitePool, data: &TravelerCreate) -> RepoResult<TravelerRow> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO travelers (id, full_name, room_number, gender, dietary_needs, line_user_id, group_id, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(&data.full_name)
    .bind(&data.room_number)
    .bind(&data.gender)
    .bind(&data.dietary_needs)
    .bind(&data.line_user_id)
    .bind(data.group_id)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create traveler".into()))
}

/// 僅寫入保證穩定的核心欄位（降級寫入路徑）
pub async fn insert_core(pool: &SqlitePool, data: &TravelerCreate) -> RepoResult<TravelerRow> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO travelers (id, full_name, room_number, group_id, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(id)
    .bind(&data.full_name)
    .bind(&data.room_number)
    .bind(data.group_id)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id_core(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create traveler".into()))
}

/// 更新完整欄位集（可能回報 SchemaDrift）
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &TravelerUpdate,
) -> RepoResult<TravelerRow> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE travelers SET full_name = COALESCE(?1, full_name), room_number = COALESCE(?2, room_number), \
         gender = COALESCE(?3, gender), dietary_needs = COALESCE(?4, dietary_needs), \
         line_user_id = COALESCE(?5, line_user_id), group_id = COALESCE(?6, group_id), updated_at = ?7 \
         WHERE id = ?8",
    )
    .bind(&data.full_name)
    .bind(&data.room_number)
    .bind(&data.gender)
    .bind(&data.dietary_needs)
    .bind(&data.line_user_id)
    .bind(data.group_id)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Traveler {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Traveler {id} not found")))
}

/// 僅更新核心欄位（降級寫入路徑）
pub async fn update_core(
    pool: &SqlitePool,
    id: i64,
    data: &TravelerUpdate,
) -> RepoResult<TravelerRow> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE travelers SET full_name = COALESCE(?1, full_name), room_number = COALESCE(?2, room_number), \
         updated_at = ?3 WHERE id = ?4",
    )
    .bind(&data.full_name)
    .bind(&data.room_number)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Traveler {id} not found")));
    }
    find_by_id_core(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Traveler {id} not found")))
}

/// 硬刪除（check_ins 由外鍵 CASCADE 一併清除）
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM travelers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// 綁定 LINE 推播身分
pub async fn bind_line_user(
    pool: &SqlitePool,
    id: i64,
    line_user_id: &str,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE travelers SET line_user_id = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(line_user_id)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// 取得團內已綁定的 LINE 身分清單（推播用，可能含重複綁定）
pub async fn bound_line_ids(pool: &SqlitePool, group_id: i64) -> RepoResult<Vec<String>> {
    let ids: Vec<String> = sqlx::query_scalar(
        "SELECT line_user_id FROM travelers WHERE group_id = ? AND line_user_id IS NOT NULL",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}
