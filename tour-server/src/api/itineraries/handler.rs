//! Itinerary API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::itinerary;
use crate::utils::{AppError, AppResult};
use shared::models::{ItineraryDay, ItineraryDayCreate, ItineraryDayUpdate};

const RESOURCE: &str = "itinerary_day";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub group_id: i64,
}

/// GET /api/itineraries?group_id= - 某團的行程（依天序）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ItineraryDay>>> {
    let days = itinerary::find_for_group(&state.pool, query.group_id).await?;
    Ok(Json(days))
}

/// GET /api/itineraries/:id - 取得單日行程
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ItineraryDay>> {
    let day = itinerary::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Itinerary day {} not found", id)))?;
    Ok(Json(day))
}

/// POST /api/itineraries - 新增行程日
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ItineraryDayCreate>,
) -> AppResult<Json<ItineraryDay>> {
    let day = itinerary::create(&state.pool, payload).await?;

    let id = day.id.to_string();
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&day))
        .await;

    Ok(Json(day))
}

/// PUT /api/itineraries/:id - 更新行程日
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ItineraryDayUpdate>,
) -> AppResult<Json<ItineraryDay>> {
    let day = itinerary::update(&state.pool, id, payload).await?;

    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &id_str, Some(&day))
        .await;

    Ok(Json(day))
}

/// DELETE /api/itineraries/:id - 刪除行程日
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = itinerary::delete(&state.pool, id).await?;

    if result {
        let id_str = id.to_string();
        state
            .broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None)
            .await;
    }

    Ok(Json(result))
}
