//! 統一錯誤處理
//!
//! 提供應用級錯誤型別與回應結構：
//! - [`AppError`] - 應用錯誤列舉
//! - [`AppResponse`] - API 回應結構
//!
//! # 錯誤碼規範
//!
//! | 前綴 | 分類 | 示例 |
//! |------|------|------|
//! | E0xxx | 業務錯誤 | E0003 資源不存在 |
//! | E8xxx | 外部服務錯誤 | E8001 上游服務失敗 |
//! | E9xxx | 系統錯誤 | E9002 資料庫錯誤 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// API 統一回應結構
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 錯誤碼 (E0000 表示成功)
    pub code: String,
    /// 訊息
    pub message: String,
    /// 回應資料
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 應用錯誤列舉
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 業務邏輯錯誤 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 資源不存在 (404)
    NotFound(String),

    #[error("Resource already exists: {0}")]
    /// 資源衝突 (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 驗證失敗 (400)
    Validation(String),

    #[error("Business rule violation: {0}")]
    /// 業務規則違反 (422)
    BusinessRule(String),

    // ========== 外部服務錯誤 (5xx) ==========
    #[error("Upstream service error: {0}")]
    /// 上游服務失敗 (502)，訊息為不透明錯誤字串
    Upstream(String),

    // ========== 系統錯誤 (5xx) ==========
    #[error("Database error: {0}")]
    /// 資料庫錯誤 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 內部錯誤 (500)
    Internal(String),

    #[error("Invalid request: {0}")]
    /// 無效請求 (400)
    Invalid(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),

            // Business rule (422)
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }

            // Upstream provider failure (502)
            AppError::Upstream(msg) => {
                error!(target: "upstream", error = %msg, "Upstream service error");
                (StatusCode::BAD_GATEWAY, "E8001", msg.as_str())
            }

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }

            // Invalid request (400)
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.as_str()),
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

// ========== Helper functions ==========

/// 建立成功回應
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// 建立帶自訂訊息的成功回應（「已儲存但部分欄位未寫入」等降級情況使用）
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}
