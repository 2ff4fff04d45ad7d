//! Spot Model

use serde::{Deserialize, Serialize};

/// Spot entity (景點)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Spot {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    /// 語音導覽語言代碼，供 TTS 代理使用 (例如 "zh-TW", "ja")
    pub audio_lang: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create spot payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotCreate {
    pub name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub audio_lang: Option<String>,
}

/// Update spot payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub audio_lang: Option<String>,
}
