//! Spot API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::spot;
use crate::utils::{AppError, AppResult};
use shared::models::{Spot, SpotCreate, SpotUpdate};

const RESOURCE: &str = "spot";

/// GET /api/spots - 景點列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Spot>>> {
    let spots = spot::find_all(&state.pool).await?;
    Ok(Json(spots))
}

/// GET /api/spots/:id - 取得單一景點
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Spot>> {
    let s = spot::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Spot {} not found", id)))?;
    Ok(Json(s))
}

/// POST /api/spots - 新增景點
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SpotCreate>,
) -> AppResult<Json<Spot>> {
    let s = spot::create(&state.pool, payload).await?;

    let id = s.id.to_string();
    state.broadcast_sync(RESOURCE, "created", &id, Some(&s)).await;

    Ok(Json(s))
}

/// PUT /api/spots/:id - 更新景點
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SpotUpdate>,
) -> AppResult<Json<Spot>> {
    let s = spot::update(&state.pool, id, payload).await?;

    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &id_str, Some(&s))
        .await;

    Ok(Json(s))
}

/// DELETE /api/spots/:id - 刪除景點
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = spot::delete(&state.pool, id).await?;

    if result {
        let id_str = id.to_string();
        state
            .broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None)
            .await;
    }

    Ok(Json(result))
}
