//! Sync API 模組
//!
//! 重連的客戶端先打這裡：epoch 變了表示伺服器重啟過（全量重抓），
//! 否則比對資源版本決定要補抓哪些資源。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync/status", get(handler::status))
}
