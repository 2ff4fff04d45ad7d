//! Check-in API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::checkin::CHECK_IN_RESOURCE;
use crate::core::ServerState;
use crate::db::repository::check_in;
use crate::utils::AppResult;
use shared::models::{CheckIn, CheckInToggle};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub group_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// 切換後的新狀態
    pub checked_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<CheckIn>,
}

/// GET /api/check-ins - 有效報到記錄列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CheckIn>>> {
    let records = match query.group_id {
        Some(gid) => check_in::find_for_group(&state.pool, gid).await?,
        None => check_in::find_all(&state.pool).await?,
    };
    Ok(Json(records))
}

/// GET /api/check-ins/:traveler_id - O(1) 在席查詢
pub async fn status(
    State(state): State<ServerState>,
    Path(traveler_id): Path<i64>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.checkin.is_checked_in(traveler_id)))
}

/// POST /api/check-ins/toggle - 切換報到狀態
///
/// 成功後廣播 created/deleted 同步事件；事件不分團廣播，
/// 訂閱端以自己的名冊過濾。
pub async fn toggle(
    State(state): State<ServerState>,
    Json(payload): Json<CheckInToggle>,
) -> AppResult<Json<ToggleResponse>> {
    let outcome = state
        .checkin
        .toggle(payload.traveler_id, payload.location_name.as_deref())
        .await?;

    let id_str = payload.traveler_id.to_string();
    if outcome.checked_in {
        state
            .broadcast_sync(CHECK_IN_RESOURCE, "created", &id_str, outcome.record.as_ref())
            .await;
    } else {
        state
            .broadcast_sync::<()>(CHECK_IN_RESOURCE, "deleted", &id_str, None)
            .await;
    }

    Ok(Json(ToggleResponse {
        checked_in: outcome.checked_in,
        record: outcome.record,
    }))
}
