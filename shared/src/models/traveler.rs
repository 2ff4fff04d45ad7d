//! Traveler Model

use serde::{Deserialize, Serialize};

/// 性別未填寫時的預設值
pub const GENDER_UNSPECIFIED: &str = "未指定";

/// 飲食需求未填寫時的預設值
pub const DIETARY_NONE: &str = "無";

/// Traveler entity (團員)
///
/// `gender` 為類列舉字串（男/女/其他），不強制校驗；`dietary_needs` 為
/// 自由文字，逗號分隔多項。兩者缺漏時由名冊層補上預設值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traveler {
    pub id: i64,
    pub full_name: String,
    pub room_number: String,
    pub gender: String,
    pub dietary_needs: String,
    /// LINE 推播身分（綁定流程寫入，未綁定為 None）
    pub line_user_id: Option<String>,
    pub group_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create traveler payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelerCreate {
    pub full_name: String,
    pub room_number: String,
    pub gender: Option<String>,
    pub dietary_needs: Option<String>,
    pub line_user_id: Option<String>,
    pub group_id: Option<i64>,
}

/// Update traveler payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelerUpdate {
    pub full_name: Option<String>,
    pub room_number: Option<String>,
    pub gender: Option<String>,
    pub dietary_needs: Option<String>,
    pub line_user_id: Option<String>,
    pub group_id: Option<i64>,
}
