//! TTS API Handlers
//!
//! 語音導覽的純轉送代理：把外部 TTS 端點的音訊位元流原樣送回，
//! 不落地、不快取。

use axum::{
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::Response,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct TtsQuery {
    pub text: String,
    /// 語言代碼，預設 zh-TW
    pub lang: Option<String>,
}

/// GET /tts?text=&lang= - 語音合成代理
pub async fn tts(
    State(state): State<ServerState>,
    Query(query): Query<TtsQuery>,
) -> AppResult<Response> {
    if query.text.trim().is_empty() {
        return Err(AppError::validation("text 不可為空"));
    }
    let lang = query.lang.as_deref().unwrap_or("zh-TW");

    let resp = state
        .http
        .get(&state.config.tts_api_base)
        .query(&[
            ("ie", "UTF-8"),
            ("client", "tw-ob"),
            ("q", query.text.as_str()),
            ("tl", lang),
        ])
        .send()
        .await
        .map_err(|e| AppError::upstream(format!("TTS fetch failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::upstream(format!(
            "TTS endpoint returned {}",
            resp.status()
        )));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("audio/mpeg")
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from_stream(resp.bytes_stream()))
        .map_err(|e| AppError::internal(format!("Failed to build TTS response: {e}")))
}
