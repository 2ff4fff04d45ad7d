//! Tour Group Model

use serde::{Deserialize, Serialize};

/// Tour group entity (旅行團)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TourGroup {
    pub id: i64,
    pub name: String,
    pub destination: Option<String>,
    /// 加入碼：LINE 綁定流程以此碼指定團體
    pub join_code: String,
    /// 出發日 (ISO 8601 date)
    pub starts_on: Option<String>,
    /// 回程日 (ISO 8601 date)
    pub ends_on: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create group payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourGroupCreate {
    pub name: String,
    pub destination: Option<String>,
    /// 未提供時由伺服端產生
    pub join_code: Option<String>,
    pub starts_on: Option<String>,
    pub ends_on: Option<String>,
}

/// Update group payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TourGroupUpdate {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub starts_on: Option<String>,
    pub ends_on: Option<String>,
}
