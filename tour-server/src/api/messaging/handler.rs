//! Messaging API Handlers
//!
//! 對 LINE 的轉送不重試；失敗以上游錯誤原樣回給觸發的操作。

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::traveler;
use crate::messaging::{self, BindRequest, LineMessage, MulticastOutcome};
use crate::utils::{AppError, AppResult};
use shared::message::{BusMessage, NotificationPayload};
use shared::models::Traveler;

#[derive(Debug, Deserialize)]
pub struct PushRequest {
    pub traveler_id: i64,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PushResponse {
    pub sent: bool,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub group_id: i64,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SosRequest {
    pub group_id: Option<i64>,
    pub title: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SosResponse {
    pub delivered: bool,
}

/// POST /api/messaging/push - 單推文字訊息給指定團員
pub async fn push(
    State(state): State<ServerState>,
    Json(payload): Json<PushRequest>,
) -> AppResult<Json<PushResponse>> {
    let row = traveler::find_by_id(&state.pool, payload.traveler_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Traveler {} not found", payload.traveler_id))
        })?;

    let line_user_id = row
        .line_user_id
        .ok_or_else(|| AppError::BusinessRule("該團員尚未綁定 LINE".to_string()))?;

    state.gateway.push_to_one(&line_user_id, &payload.text).await?;
    Ok(Json(PushResponse { sent: true }))
}

/// POST /api/messaging/broadcast - 群發文字訊息給整團已綁定的團員
///
/// 收件人去重；無人綁定時回 0 人成功，不打外部 API。
pub async fn broadcast(
    State(state): State<ServerState>,
    Json(payload): Json<BroadcastRequest>,
) -> AppResult<Json<MulticastOutcome>> {
    let ids = traveler::bound_line_ids(&state.pool, payload.group_id).await?;
    let messages = [LineMessage::text(&payload.text)];
    let outcome = state.gateway.multicast(&ids, &messages).await?;
    Ok(Json(outcome))
}

/// POST /api/messaging/bind - 以顯示名稱 + 加入碼綁定 LINE 身分
pub async fn bind(
    State(state): State<ServerState>,
    Json(payload): Json<BindRequest>,
) -> AppResult<Json<Traveler>> {
    let traveler = messaging::bind(&state.pool, &payload).await?;

    let id = traveler.id.to_string();
    state
        .broadcast_sync("traveler", "updated", &id, Some(&traveler))
        .await;

    Ok(Json(traveler))
}

/// POST /api/messaging/sos - 向所有連線中的看板廣播緊急警報
pub async fn sos(
    State(state): State<ServerState>,
    Json(payload): Json<SosRequest>,
) -> AppResult<Json<SosResponse>> {
    let mut notification = NotificationPayload::critical(
        payload.title.unwrap_or_else(|| "SOS".to_string()),
        payload.message,
    );
    notification.data = payload
        .group_id
        .map(|gid| serde_json::json!({ "group_id": gid }));

    state
        .bus()
        .publish(BusMessage::notification(&notification))
        .await?;

    Ok(Json(SosResponse { delivered: true }))
}
