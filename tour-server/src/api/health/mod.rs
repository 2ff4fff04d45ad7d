//! 健康檢查路由
//!
//! # 路由列表
//!
//! | 路徑 | 方法 | 說明 |
//! |------|------|------|
//! | /health | GET | 簡單健康檢查 |
//! | /health/detailed | GET | 詳細健康檢查 |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::SystemTime;

use crate::core::ServerState;

/// 健康檢查路由 - 公共路由
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

/// 簡單健康檢查回應
#[derive(Serialize)]
pub struct HealthResponse {
    /// 狀態 (healthy | degraded)
    status: &'static str,
    /// 版本號
    version: &'static str,
    /// 伺服器實例 epoch
    epoch: String,
    /// 執行環境
    environment: String,
}

/// 詳細健康檢查回應
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    /// 執行時間（秒）
    uptime_seconds: u64,
    /// 各組件檢查結果
    checks: HealthChecks,
}

/// 健康檢查詳情
#[derive(Serialize)]
pub struct HealthChecks {
    /// 資料庫檢查
    database: CheckResult,
    /// 訊息匯流排檢查
    message_bus: CheckResult,
}

/// 單項檢查結果
#[derive(Serialize)]
pub struct CheckResult {
    /// 狀態 (ok | error)
    status: &'static str,
    /// 延遲（毫秒）
    latency_ms: Option<u64>,
    /// 錯誤訊息
    message: Option<String>,
}

impl CheckResult {
    fn ok() -> Self {
        Self {
            status: "ok",
            latency_ms: None,
            message: None,
        }
    }

    fn ok_with_latency(latency_ms: u64) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }
}

// 伺服器啟動時間（懶載入靜態變數）
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// 基礎健康檢查
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        epoch: state.epoch.clone(),
        environment: state.config.environment.clone(),
    })
}

/// 包含組件狀態的詳細健康檢查
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    // 檢查資料庫：簡單查詢驗證連線
    let db_start = std::time::Instant::now();
    let db_check = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => CheckResult::ok_with_latency(db_start.elapsed().as_millis() as u64),
        Err(e) => CheckResult::error(format!("Database error: {}", e)),
    };

    // 只要伺服器在執行，訊息匯流排總是就緒的
    let bus_check = CheckResult::ok();

    let all_ok = db_check.status == "ok" && bus_check.status == "ok";

    Json(DetailedHealthResponse {
        status: if all_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: get_uptime_seconds(),
        checks: HealthChecks {
            database: db_check,
            message_bus: bus_check,
        },
    })
}
