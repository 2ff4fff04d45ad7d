//! Result type alias for application operations

use super::AppError;

/// Result type used across handlers and services
pub type AppResult<T> = Result<T, AppError>;
