//! Hotel Model

use serde::{Deserialize, Serialize};

/// Hotel entity (飯店)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Hotel {
    pub id: i64,
    pub group_id: Option<i64>,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// 入住日 (ISO 8601 date)
    pub check_in_date: Option<String>,
    /// 退房日 (ISO 8601 date)
    pub check_out_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create hotel payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelCreate {
    pub group_id: Option<i64>,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub notes: Option<String>,
}

/// Update hotel payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotelUpdate {
    pub group_id: Option<i64>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub notes: Option<String>,
}
