//! Repository Module
//!
//! Free-function CRUD operations over the SQLite pool, one module per table.

pub mod check_in;
pub mod group;
pub mod hotel;
pub mod itinerary;
pub mod ledger;
pub mod spot;
pub mod traveler;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// 資料庫結構漂移：寫入的欄位在目前部署的結構中不存在。
    /// 呼叫端可改以核心欄位重試（見名冊服務的降級寫入）。
    #[error("Schema drift: {0}")]
    SchemaDrift(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let msg = db_err.message();
            // SQLite 對缺欄位只在 prepare 階段以訊息回報，無獨立錯誤碼：
            //   INSERT → "table X has no column named Y"
            //   UPDATE/SELECT → "no such column: Y"
            // 判斷集中在這裡，呼叫端拿到的是型別化的 SchemaDrift。
            if msg.contains("has no column named") || msg.contains("no such column") {
                return RepoError::SchemaDrift(msg.to_string());
            }
            if msg.contains("UNIQUE constraint failed") {
                return RepoError::Duplicate(msg.to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            // 漂移若未被服務層攔截處理，對外視為資料庫錯誤
            RepoError::SchemaDrift(msg) | RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
