//! Flight API 模組

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/flights/{flight_no}", get(handler::lookup))
}
