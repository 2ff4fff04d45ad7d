//! LINE 身分綁定流程
//!
//! 旅客在 LINE 上輸入姓名與團體加入碼，後端比對名冊後把
//! LINE user id 寫回該團員。查無團體或查無同名團員時，
//! 錯誤訊息原樣回給使用者，不重試。

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::repository::{group, traveler};
use crate::roster::normalize;
use crate::utils::{AppError, AppResult};
use shared::models::Traveler;

/// 綁定請求
#[derive(Debug, Clone, Deserialize)]
pub struct BindRequest {
    /// LINE 顯示名稱，須與名冊姓名完全一致
    pub display_name: String,
    /// 團體加入碼
    pub join_code: String,
    /// LINE 平台的使用者識別碼
    pub line_user_id: String,
}

/// 執行綁定，回傳綁定後的團員
pub async fn bind(pool: &SqlitePool, req: &BindRequest) -> AppResult<Traveler> {
    let code = req.join_code.trim();
    let tour_group = group::find_by_join_code(pool, code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("查無加入碼 {code} 對應的團體")))?;

    let display_name = req.display_name.trim();
    let row = traveler::find_by_name_in_group(pool, tour_group.id, display_name)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "「{}」團內查無名為 {display_name} 的團員",
                tour_group.name
            ))
        })?;

    traveler::bind_line_user(pool, row.id, &req.line_user_id).await?;

    let bound = traveler::find_by_id(pool, row.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Traveler {} not found", row.id)))?;
    Ok(normalize::traveler_from_row(bound))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::migrated_pool;
    use shared::models::{TourGroupCreate, TravelerCreate};

    async fn seed(pool: &SqlitePool) -> i64 {
        let g = group::create(
            pool,
            TourGroupCreate {
                name: "北海道五日".to_string(),
                destination: Some("札幌".to_string()),
                join_code: Some("ABC234".to_string()),
                starts_on: None,
                ends_on: None,
            },
        )
        .await
        .unwrap();

        traveler::insert(
            pool,
            &TravelerCreate {
                full_name: "王小明".to_string(),
                room_number: "101".to_string(),
                gender: None,
                dietary_needs: None,
                line_user_id: None,
                group_id: Some(g.id),
            },
        )
        .await
        .unwrap();
        g.id
    }

    #[tokio::test]
    async fn test_bind_happy_path() {
        let pool = migrated_pool().await;
        seed(&pool).await;

        let req = BindRequest {
            display_name: "王小明".to_string(),
            join_code: "ABC234".to_string(),
            line_user_id: "U1234567890".to_string(),
        };
        let traveler = bind(&pool, &req).await.unwrap();
        assert_eq!(traveler.line_user_id.as_deref(), Some("U1234567890"));
    }

    #[tokio::test]
    async fn test_bind_unknown_join_code() {
        let pool = migrated_pool().await;
        seed(&pool).await;

        let req = BindRequest {
            display_name: "王小明".to_string(),
            join_code: "ZZZZZZ".to_string(),
            line_user_id: "U1".to_string(),
        };
        let err = bind(&pool, &req).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bind_unknown_name_surfaces_not_found() {
        let pool = migrated_pool().await;
        seed(&pool).await;

        let req = BindRequest {
            display_name: "不存在的人".to_string(),
            join_code: "ABC234".to_string(),
            line_user_id: "U1".to_string(),
        };
        let err = bind(&pool, &req).await.unwrap_err();
        match err {
            AppError::NotFound(msg) => {
                assert!(msg.contains("不存在的人"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bind_matches_legacy_name_column() {
        let pool = migrated_pool().await;
        let gid = seed(&pool).await;
        // 舊版資料列只有 name 欄位
        sqlx::query(
            "INSERT INTO travelers (id, name, room_no, group_id, created_at, updated_at) VALUES (77, '林阿嬤', '9', ?1, 0, 0)",
        )
        .bind(gid)
        .execute(&pool)
        .await
        .unwrap();

        let req = BindRequest {
            display_name: "林阿嬤".to_string(),
            join_code: "ABC234".to_string(),
            line_user_id: "U9".to_string(),
        };
        let traveler = bind(&pool, &req).await.unwrap();
        assert_eq!(traveler.id, 77);
        assert_eq!(traveler.full_name, "林阿嬤");
    }
}
