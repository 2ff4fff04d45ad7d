//! Check-in Ledger
//!
//! 報到狀態的權威帳：資料庫列為準（UNIQUE(traveler_id) 保證同一團員
//! 至多一筆），記憶體集合提供 O(1) 的在席查詢。
//!
//! 切換採樂觀更新：先翻本地集合再寫資料庫；寫入失敗時回復本地狀態
//! 並重抓權威集合，不做手工回滾運算以外的任何補償。

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use sqlx::SqlitePool;

use crate::db::repository::check_in;
use crate::utils::AppResult;
use shared::models::CheckIn;

/// 切換結果：`checked_in` 為切換後的新狀態
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub checked_in: bool,
    /// 報到時的實際寫入記錄（取消報到為 None）
    pub record: Option<CheckIn>,
}

/// 報到帳
#[derive(Clone)]
pub struct CheckinLedger {
    pool: SqlitePool,
    active: Arc<RwLock<HashSet<i64>>>,
}

impl CheckinLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            active: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// 從資料庫載入目前在席集合（啟動時呼叫）
    pub async fn load(&self) -> AppResult<()> {
        self.reload().await
    }

    /// 丟棄本地狀態，重抓權威集合
    ///
    /// 只有抓取成功才替換本地集合；抓取失敗時保留既有狀態。
    pub async fn reload(&self) -> AppResult<()> {
        let ids = check_in::active_traveler_ids(&self.pool).await?;
        let mut set = self.active.write();
        *set = ids.into_iter().collect();
        Ok(())
    }

    /// O(1) 在席查詢
    pub fn is_checked_in(&self, traveler_id: i64) -> bool {
        self.active.read().contains(&traveler_id)
    }

    /// 目前在席的團員 ID 快照
    pub fn checked_in_ids(&self) -> HashSet<i64> {
        self.active.read().clone()
    }

    /// 切換報到狀態
    ///
    /// 在席 → 刪除記錄（取消報到）；不在席 → 寫入新記錄（報到）。
    /// 兩個併發切換可能競爭；資料庫列語義決定勝者（last-write-wins），
    /// 切換後的任何讀取以資料庫為準。
    pub async fn toggle(
        &self,
        traveler_id: i64,
        location_name: Option<&str>,
    ) -> AppResult<ToggleOutcome> {
        let was_checked_in = self.is_checked_in(traveler_id);

        // 樂觀更新：先翻本地集合，遠端確認前 UI 即可反映
        {
            let mut set = self.active.write();
            if was_checked_in {
                set.remove(&traveler_id);
            } else {
                set.insert(traveler_id);
            }
        }

        let result: AppResult<ToggleOutcome> = if was_checked_in {
            match check_in::delete_by_traveler(&self.pool, traveler_id).await {
                Ok(_) => Ok(ToggleOutcome {
                    checked_in: false,
                    record: None,
                }),
                Err(e) => Err(e.into()),
            }
        } else {
            match check_in::insert_if_absent(&self.pool, traveler_id, location_name).await {
                Ok(record) => Ok(ToggleOutcome {
                    checked_in: true,
                    record: Some(record),
                }),
                Err(e) => Err(e.into()),
            }
        };

        match result {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // 失敗：回復樂觀狀態後重抓權威集合，本地狀態不可再信任
                {
                    let mut set = self.active.write();
                    if was_checked_in {
                        set.insert(traveler_id);
                    } else {
                        set.remove(&traveler_id);
                    }
                }
                if let Err(reload_err) = self.reload().await {
                    tracing::error!(
                        error = %reload_err,
                        "Failed to resynchronize check-in set after toggle failure"
                    );
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::migrated_pool;

    async fn seed_traveler(pool: &SqlitePool, id: i64, name: &str) {
        sqlx::query(
            "INSERT INTO travelers (id, full_name, room_number, created_at, updated_at) VALUES (?1, ?2, '101', 0, 0)",
        )
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
    }

    async fn count_records(pool: &SqlitePool, traveler_id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM check_ins WHERE traveler_id = ?")
            .bind(traveler_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_toggle_checks_in_and_out() {
        let pool = migrated_pool().await;
        seed_traveler(&pool, 1, "王小明").await;
        let ledger = CheckinLedger::new(pool.clone());
        ledger.load().await.unwrap();

        let outcome = ledger.toggle(1, Some("集合點")).await.unwrap();
        assert!(outcome.checked_in);
        assert_eq!(
            outcome.record.as_ref().unwrap().location_name.as_deref(),
            Some("集合點")
        );
        assert!(ledger.is_checked_in(1));
        assert_eq!(count_records(&pool, 1).await, 1);

        let outcome = ledger.toggle(1, None).await.unwrap();
        assert!(!outcome.checked_in);
        assert!(outcome.record.is_none());
        assert!(!ledger.is_checked_in(1));
        assert_eq!(count_records(&pool, 1).await, 0);
    }

    #[tokio::test]
    async fn test_double_toggle_returns_to_original_state() {
        let pool = migrated_pool().await;
        seed_traveler(&pool, 1, "王小明").await;
        let ledger = CheckinLedger::new(pool.clone());
        ledger.load().await.unwrap();

        assert!(!ledger.is_checked_in(1));
        ledger.toggle(1, None).await.unwrap();
        ledger.toggle(1, None).await.unwrap();
        assert!(!ledger.is_checked_in(1));
        assert_eq!(count_records(&pool, 1).await, 0);
    }

    #[tokio::test]
    async fn test_at_most_one_record_after_toggle_sequence() {
        let pool = migrated_pool().await;
        seed_traveler(&pool, 1, "王小明").await;
        let ledger = CheckinLedger::new(pool.clone());
        ledger.load().await.unwrap();

        for _ in 0..5 {
            ledger.toggle(1, Some("大廳")).await.unwrap();
        }
        assert!(count_records(&pool, 1).await <= 1);
        // 奇數次切換 → 在席一筆
        assert_eq!(count_records(&pool, 1).await, 1);
        assert!(ledger.is_checked_in(1));
    }

    #[tokio::test]
    async fn test_failed_toggle_reverts_optimistic_state() {
        let pool = migrated_pool().await;
        seed_traveler(&pool, 1, "王小明").await;
        let ledger = CheckinLedger::new(pool.clone());
        ledger.load().await.unwrap();

        // 不存在的團員：插入違反外鍵 → 寫入失敗 → 樂觀狀態必須回收
        let err = ledger.toggle(999, Some("集合點")).await;
        assert!(err.is_err());
        assert!(!ledger.is_checked_in(999));
        assert_eq!(count_records(&pool, 999).await, 0);
    }

    #[tokio::test]
    async fn test_load_picks_up_existing_records() {
        let pool = migrated_pool().await;
        seed_traveler(&pool, 1, "王小明").await;
        seed_traveler(&pool, 2, "李四").await;
        sqlx::query("INSERT INTO check_ins (id, traveler_id, created_at) VALUES (10, 2, 0)")
            .execute(&pool)
            .await
            .unwrap();

        let ledger = CheckinLedger::new(pool);
        ledger.load().await.unwrap();
        assert!(!ledger.is_checked_in(1));
        assert!(ledger.is_checked_in(2));
    }

    #[tokio::test]
    async fn test_deleting_traveler_cascades_check_in() {
        let pool = migrated_pool().await;
        seed_traveler(&pool, 1, "王小明").await;
        let ledger = CheckinLedger::new(pool.clone());
        ledger.load().await.unwrap();
        ledger.toggle(1, None).await.unwrap();
        assert_eq!(count_records(&pool, 1).await, 1);

        sqlx::query("DELETE FROM travelers WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(count_records(&pool, 1).await, 0);
    }
}
