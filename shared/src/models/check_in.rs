//! Check-in Model
//!
//! 報到採「在席」語義而非日誌：一名團員同時最多一筆有效記錄，
//! 取消報到即刪除該列，不保留歷史。

use serde::{Deserialize, Serialize};

/// Check-in record entity (報到記錄)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CheckIn {
    pub id: i64,
    pub traveler_id: i64,
    /// 集合點名稱（可空）
    pub location_name: Option<String>,
    pub created_at: i64,
}

/// Toggle check-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInToggle {
    pub traveler_id: i64,
    pub location_name: Option<String>,
}
