//! Tour Group API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::group;
use crate::utils::{AppError, AppResult};
use shared::models::{TourGroup, TourGroupCreate, TourGroupUpdate};

const RESOURCE: &str = "group";

/// GET /api/groups - 取得所有團體
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TourGroup>>> {
    let groups = group::find_all(&state.pool).await?;
    Ok(Json(groups))
}

/// GET /api/groups/:id - 取得單一團體
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TourGroup>> {
    let g = group::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Group {} not found", id)))?;
    Ok(Json(g))
}

/// POST /api/groups - 建立團體（未給加入碼時自動產生）
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TourGroupCreate>,
) -> AppResult<Json<TourGroup>> {
    let g = group::create(&state.pool, payload).await?;

    let id = g.id.to_string();
    state.broadcast_sync(RESOURCE, "created", &id, Some(&g)).await;

    Ok(Json(g))
}

/// PUT /api/groups/:id - 更新團體
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TourGroupUpdate>,
) -> AppResult<Json<TourGroup>> {
    let g = group::update(&state.pool, id, payload).await?;

    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &id_str, Some(&g))
        .await;

    Ok(Json(g))
}

/// DELETE /api/groups/:id - 刪除團體
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = group::delete(&state.pool, id).await?;

    if result {
        let id_str = id.to_string();
        state
            .broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None)
            .await;
    }

    Ok(Json(result))
}
