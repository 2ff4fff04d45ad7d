//! RosterService - 名冊操作入口
//!
//! 讀取端做新舊欄位正規化；寫入端做結構漂移容錯：完整欄位寫入失敗
//! 且錯誤屬於 SchemaDrift 時，改以核心欄位（full_name / room_number）
//! 重寫一次，並以「已儲存但有警告」的成功變體回報呼叫端。

use serde_json::Value;
use sqlx::SqlitePool;

use crate::db::repository::{RepoError, traveler};
use crate::roster::{import, normalize, room_sort};
use crate::utils::{AppError, AppResult};
use shared::models::{Traveler, TravelerCreate, TravelerUpdate};

/// 降級寫入時被略過的選配欄位
const OPTIONAL_FIELDS: [&str; 3] = ["gender", "dietary_needs", "line_user_id"];

/// 儲存結果
///
/// `degraded == true` 表示「已儲存，但部分選配欄位未寫入」。
/// 呼叫端必須把它當成與完整成功不同的成功變體呈現，而非失敗。
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub traveler: Traveler,
    pub degraded: bool,
    pub skipped_fields: Vec<&'static str>,
}

impl SaveOutcome {
    fn full(traveler: Traveler) -> Self {
        Self {
            traveler,
            degraded: false,
            skipped_fields: Vec::new(),
        }
    }

    fn degraded(traveler: Traveler) -> Self {
        Self {
            traveler,
            degraded: true,
            skipped_fields: OPTIONAL_FIELDS.to_vec(),
        }
    }
}

/// 名冊服務
#[derive(Clone)]
pub struct RosterService {
    pool: SqlitePool,
}

impl RosterService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 列出團員（正規化後；`sort_rooms` 時依房號自然排序）
    pub async fn list_travelers(
        &self,
        group_id: Option<i64>,
        sort_rooms: bool,
    ) -> AppResult<Vec<Traveler>> {
        let rows = traveler::find_all(&self.pool, group_id).await?;
        let mut travelers: Vec<Traveler> =
            rows.into_iter().map(normalize::traveler_from_row).collect();
        if sort_rooms {
            room_sort::sort_by_room(&mut travelers);
        }
        Ok(travelers)
    }

    pub async fn get_traveler(&self, id: i64) -> AppResult<Traveler> {
        let row = traveler::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Traveler {id} not found")))?;
        Ok(normalize::traveler_from_row(row))
    }

    /// 新增團員（結構漂移時降級為核心欄位寫入）
    pub async fn create_traveler(&self, data: TravelerCreate) -> AppResult<SaveOutcome> {
        if data.full_name.trim().is_empty() {
            return Err(AppError::validation("姓名不可為空"));
        }
        if data.room_number.trim().is_empty() {
            return Err(AppError::validation("房號不可為空"));
        }

        match traveler::insert(&self.pool, &data).await {
            Ok(row) => Ok(SaveOutcome::full(normalize::traveler_from_row(row))),
            Err(RepoError::SchemaDrift(msg)) => {
                tracing::warn!(error = %msg, "Traveler insert hit schema drift, retrying with core fields");
                let row = traveler::insert_core(&self.pool, &data).await?;
                Ok(SaveOutcome::degraded(normalize::traveler_from_row(row)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 更新團員（結構漂移時降級為核心欄位寫入）
    pub async fn update_traveler(&self, id: i64, data: TravelerUpdate) -> AppResult<SaveOutcome> {
        if let Some(name) = &data.full_name
            && name.trim().is_empty()
        {
            return Err(AppError::validation("姓名不可為空"));
        }
        if let Some(room) = &data.room_number
            && room.trim().is_empty()
        {
            return Err(AppError::validation("房號不可為空"));
        }

        match traveler::update(&self.pool, id, &data).await {
            Ok(row) => Ok(SaveOutcome::full(normalize::traveler_from_row(row))),
            Err(RepoError::SchemaDrift(msg)) => {
                tracing::warn!(error = %msg, "Traveler update hit schema drift, retrying with core fields");
                let row = traveler::update_core(&self.pool, id, &data).await?;
                Ok(SaveOutcome::degraded(normalize::traveler_from_row(row)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_traveler(&self, id: i64) -> AppResult<bool> {
        Ok(traveler::delete(&self.pool, id).await?)
    }

    /// 批次匯入試算表資料列
    ///
    /// 無法解析出姓名的列被靜默略過；回傳實際插入的筆數。
    /// 個別插入同樣走漂移容錯路徑。
    pub async fn bulk_import(&self, group_id: Option<i64>, rows: &[Value]) -> AppResult<u64> {
        let candidates = import::parse_rows(group_id, rows);
        let mut inserted = 0u64;
        for data in candidates {
            match traveler::insert(&self.pool, &data).await {
                Ok(_) => inserted += 1,
                Err(RepoError::SchemaDrift(_)) => {
                    traveler::insert_core(&self.pool, &data).await?;
                    inserted += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{memory_pool, migrated_pool};
    use serde_json::json;

    fn make_create(name: &str, room: &str) -> TravelerCreate {
        TravelerCreate {
            full_name: name.to_string(),
            room_number: room.to_string(),
            gender: Some("男".to_string()),
            dietary_needs: Some("素食".to_string()),
            line_user_id: None,
            group_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_full_schema() {
        let service = RosterService::new(migrated_pool().await);

        let outcome = service.create_traveler(make_create("王小明", "101")).await.unwrap();
        assert!(!outcome.degraded);
        assert!(outcome.skipped_fields.is_empty());
        assert_eq!(outcome.traveler.gender, "男");

        let listed = service.list_travelers(None, false).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].full_name, "王小明");
        assert_eq!(listed[0].dietary_needs, "素食");
    }

    #[tokio::test]
    async fn test_list_normalizes_legacy_rows() {
        let pool = migrated_pool().await;
        // 舊版客戶端寫入的資料列：僅填 name / room_no
        sqlx::query(
            "INSERT INTO travelers (id, name, room_no, created_at, updated_at) VALUES (1, '陳舊客', '9', 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let service = RosterService::new(pool);
        let listed = service.list_travelers(None, false).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].full_name, "陳舊客");
        assert_eq!(listed[0].room_number, "9");
        assert_eq!(listed[0].gender, "未指定");
        assert_eq!(listed[0].dietary_needs, "無");
    }

    #[tokio::test]
    async fn test_list_sorted_by_room() {
        let service = RosterService::new(migrated_pool().await);
        for (name, room) in [("甲", "10"), ("乙", "9"), ("丙", "101")] {
            service.create_traveler(make_create(name, room)).await.unwrap();
        }

        let listed = service.list_travelers(None, true).await.unwrap();
        let rooms: Vec<&str> = listed.iter().map(|t| t.room_number.as_str()).collect();
        assert_eq!(rooms, vec!["9", "10", "101"]);
    }

    #[tokio::test]
    async fn test_validation_rejects_empty_fields() {
        let service = RosterService::new(migrated_pool().await);

        let err = service.create_traveler(make_create(" ", "101")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = service.create_traveler(make_create("王小明", "")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    /// 部署在外的舊結構：travelers 缺 0003 的選配欄位
    /// (dietary_needs / line_user_id)，完整寫入必須降級而非失敗。
    #[tokio::test]
    async fn test_create_degrades_on_schema_drift() {
        let pool = memory_pool().await;
        sqlx::query(
            "CREATE TABLE travelers (
                id INTEGER PRIMARY KEY,
                name TEXT,
                room_no TEXT,
                gender TEXT,
                group_id INTEGER,
                full_name TEXT,
                room_number TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        let service = RosterService::new(pool);
        let outcome = service.create_traveler(make_create("王小明", "101")).await.unwrap();

        assert!(outcome.degraded);
        assert_eq!(
            outcome.skipped_fields,
            vec!["gender", "dietary_needs", "line_user_id"]
        );
        assert_eq!(outcome.traveler.full_name, "王小明");
        assert_eq!(outcome.traveler.room_number, "101");
        // 未寫入的欄位以預設值呈現
        assert_eq!(outcome.traveler.dietary_needs, "無");
    }

    #[tokio::test]
    async fn test_bulk_import_spreadsheet_scenario() {
        let service = RosterService::new(migrated_pool().await);

        let rows = vec![
            json!({"姓名": "王小明", "房號": "101"}),
            json!({"房號": "102"}), // 無姓名 → 略過
        ];
        let inserted = service.bulk_import(None, &rows).await.unwrap();
        assert_eq!(inserted, 1);

        let listed = service.list_travelers(None, false).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].full_name, "王小明");
        assert_eq!(listed[0].room_number, "101");
        assert_eq!(listed[0].gender, "未指定");
        assert_eq!(listed[0].dietary_needs, "無");
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let service = RosterService::new(migrated_pool().await);
        let err = service
            .update_traveler(999, TravelerUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
