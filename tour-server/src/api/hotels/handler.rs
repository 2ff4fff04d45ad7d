//! Hotel API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::hotel;
use crate::utils::{AppError, AppResult};
use shared::models::{Hotel, HotelCreate, HotelUpdate};

const RESOURCE: &str = "hotel";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub group_id: Option<i64>,
}

/// GET /api/hotels - 飯店列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Hotel>>> {
    let hotels = hotel::find_all(&state.pool, query.group_id).await?;
    Ok(Json(hotels))
}

/// GET /api/hotels/:id - 取得單一飯店
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Hotel>> {
    let h = hotel::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Hotel {} not found", id)))?;
    Ok(Json(h))
}

/// POST /api/hotels - 新增飯店
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<HotelCreate>,
) -> AppResult<Json<Hotel>> {
    let h = hotel::create(&state.pool, payload).await?;

    let id = h.id.to_string();
    state.broadcast_sync(RESOURCE, "created", &id, Some(&h)).await;

    Ok(Json(h))
}

/// PUT /api/hotels/:id - 更新飯店
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<HotelUpdate>,
) -> AppResult<Json<Hotel>> {
    let h = hotel::update(&state.pool, id, payload).await?;

    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &id_str, Some(&h))
        .await;

    Ok(Json(h))
}

/// DELETE /api/hotels/:id - 刪除飯店
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = hotel::delete(&state.pool, id).await?;

    if result {
        let id_str = id.to_string();
        state
            .broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None)
            .await;
    }

    Ok(Json(result))
}
