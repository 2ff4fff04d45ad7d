//! Traveler API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::roster::SaveOutcome;
use crate::utils::AppResult;
use shared::models::{Traveler, TravelerCreate, TravelerUpdate};

const RESOURCE: &str = "traveler";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub group_id: Option<i64>,
    /// `sort=room` 時依房號自然排序
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    pub group_id: Option<i64>,
}

/// 儲存回應
///
/// `degraded` 區分「完整儲存」與「已儲存但有警告」兩種成功變體。
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub traveler: Traveler,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<SaveOutcome> for SaveResponse {
    fn from(outcome: SaveOutcome) -> Self {
        let warning = outcome.degraded.then(|| {
            format!(
                "已儲存，但部分欄位未寫入：{}",
                outcome.skipped_fields.join("、")
            )
        });
        Self {
            traveler: outcome.traveler,
            degraded: outcome.degraded,
            warning,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// 實際插入筆數（無法解析姓名的列不計入）
    pub inserted: u64,
}

/// GET /api/travelers - 名冊列表（正規化後）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Traveler>>> {
    let sort_rooms = query.sort.as_deref() == Some("room");
    let travelers = state.roster.list_travelers(query.group_id, sort_rooms).await?;
    Ok(Json(travelers))
}

/// GET /api/travelers/:id - 取得單一團員
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Traveler>> {
    let traveler = state.roster.get_traveler(id).await?;
    Ok(Json(traveler))
}

/// POST /api/travelers - 新增團員
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TravelerCreate>,
) -> AppResult<Json<SaveResponse>> {
    let outcome = state.roster.create_traveler(payload).await?;
    let resp = SaveResponse::from(outcome);

    let id = resp.traveler.id.to_string();
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&resp.traveler))
        .await;

    Ok(Json(resp))
}

/// PUT /api/travelers/:id - 更新團員
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TravelerUpdate>,
) -> AppResult<Json<SaveResponse>> {
    let outcome = state.roster.update_traveler(id, payload).await?;
    let resp = SaveResponse::from(outcome);

    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &id_str, Some(&resp.traveler))
        .await;

    Ok(Json(resp))
}

/// DELETE /api/travelers/:id - 刪除團員（報到記錄由外鍵 CASCADE 清除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = state.roster.delete_traveler(id).await?;

    if result {
        let id_str = id.to_string();
        state
            .broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None)
            .await;
    }

    Ok(Json(result))
}

/// POST /api/travelers/import - 批次匯入試算表資料列
pub async fn import(
    State(state): State<ServerState>,
    Query(query): Query<ImportQuery>,
    Json(rows): Json<Vec<serde_json::Value>>,
) -> AppResult<Json<ImportResponse>> {
    let inserted = state.roster.bulk_import(query.group_id, &rows).await?;

    if inserted > 0 {
        // 批次變更不逐筆廣播，通知客戶端全量重抓
        state
            .broadcast_sync::<()>(RESOURCE, "imported", "*", None)
            .await;
    }

    Ok(Json(ImportResponse { inserted }))
}
