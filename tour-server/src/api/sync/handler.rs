//! Sync API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::SyncStatus;

/// GET /api/sync/status - 伺服器 epoch 與各資源版本
pub async fn status(State(state): State<ServerState>) -> AppResult<Json<SyncStatus>> {
    Ok(Json(state.sync_status()))
}
