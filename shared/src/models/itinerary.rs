//! Itinerary Model

use serde::{Deserialize, Serialize};

/// Itinerary day entity (行程日)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ItineraryDay {
    pub id: i64,
    pub group_id: i64,
    /// 第幾天 (1 起算)
    pub day_no: i64,
    /// 日期 (ISO 8601 date)
    pub date: Option<String>,
    pub title: Option<String>,
    /// 當日行程內容（自由文字，編輯器逐行維護）
    pub content: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create itinerary day payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryDayCreate {
    pub group_id: i64,
    pub day_no: i64,
    pub date: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Update itinerary day payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItineraryDayUpdate {
    pub day_no: Option<i64>,
    pub date: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}
