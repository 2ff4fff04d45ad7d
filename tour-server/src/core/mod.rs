//! 核心模組 - 伺服器設定、狀態和錯誤定義
//!
//! # 模組結構
//!
//! - [`Config`] - 伺服器設定
//! - [`ServerState`] - 伺服器狀態
//! - [`Server`] - HTTP 伺服器
//! - [`ServerError`] - 伺服器錯誤

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::{Server, build_app};
pub use state::{ResourceVersions, ServerState};
