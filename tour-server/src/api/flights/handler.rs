//! Flight API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::flight::FlightStatus;
use crate::utils::AppResult;

/// GET /api/flights/:flight_no - 航班動態
///
/// 上游失敗或未設金鑰時回傳確定性假資料（`source: "mock"`），
/// 不對呼叫端報錯。
pub async fn lookup(
    State(state): State<ServerState>,
    Path(flight_no): Path<String>,
) -> AppResult<Json<FlightStatus>> {
    Ok(Json(state.flight.lookup(&flight_no).await))
}
