//! Messaging API 模組 (LINE 推播 / 綁定 / SOS)

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/messaging", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/push", post(handler::push))
        .route("/broadcast", post(handler::broadcast))
        .route("/bind", post(handler::bind))
        .route("/sos", post(handler::sos))
}
