//! Ledger API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::ledger;
use crate::utils::{AppError, AppResult};
use shared::models::{LedgerEntry, LedgerEntryCreate, LedgerEntryUpdate};

const RESOURCE: &str = "ledger_entry";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub group_id: i64,
}

/// 帳目列表回應（含各幣別小計）
#[derive(Debug, Serialize)]
pub struct LedgerListResponse {
    pub entries: Vec<LedgerEntry>,
    /// 幣別 → 合計
    pub totals: std::collections::HashMap<String, f64>,
}

/// GET /api/ledger?group_id= - 某團帳目
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<LedgerListResponse>> {
    let entries = ledger::find_for_group(&state.pool, query.group_id).await?;

    let mut totals = std::collections::HashMap::new();
    for entry in &entries {
        *totals.entry(entry.currency.clone()).or_insert(0.0) += entry.amount;
    }

    Ok(Json(LedgerListResponse { entries, totals }))
}

/// GET /api/ledger/:id - 取得單筆帳目
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LedgerEntry>> {
    let entry = ledger::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ledger entry {} not found", id)))?;
    Ok(Json(entry))
}

/// POST /api/ledger - 記一筆帳
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<LedgerEntryCreate>,
) -> AppResult<Json<LedgerEntry>> {
    if payload.description.trim().is_empty() {
        return Err(AppError::validation("帳目說明不可為空"));
    }
    let entry = ledger::create(&state.pool, payload).await?;

    let id = entry.id.to_string();
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&entry))
        .await;

    Ok(Json(entry))
}

/// PUT /api/ledger/:id - 更新帳目
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<LedgerEntryUpdate>,
) -> AppResult<Json<LedgerEntry>> {
    let entry = ledger::update(&state.pool, id, payload).await?;

    let id_str = id.to_string();
    state
        .broadcast_sync(RESOURCE, "updated", &id_str, Some(&entry))
        .await;

    Ok(Json(entry))
}

/// DELETE /api/ledger/:id - 刪除帳目
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = ledger::delete(&state.pool, id).await?;

    if result {
        let id_str = id.to_string();
        state
            .broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None)
            .await;
    }

    Ok(Json(result))
}
