use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Notification Level ====================

/// 通知級別
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// 普通資訊
    Info,
    /// 警告
    Warning,
    /// 錯誤
    Error,
    /// 緊急（SOS 警報使用此級別）
    Critical,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

// ==================== Payloads ====================

/// 握手載荷 (客戶端 -> 伺服端)
///
/// 包含客戶端的協定版本資訊，用於伺服端進行版本校驗。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakePayload {
    /// 協定版本
    pub version: u16,
    /// 客戶端名稱/標識
    pub client_name: Option<String>,
    /// 客戶端唯一標識 (UUID)
    pub client_id: Option<String>,
}

/// 通知載荷 (伺服端 -> 客戶端)
///
/// 用於向連線中的看板展示系統狀態或緊急警報。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// 標題
    pub title: String,
    /// 訊息內容
    pub message: String,
    /// 通知級別
    pub level: NotificationLevel,
    /// 附加資料 (JSON)
    pub data: Option<serde_json::Value>,
}

/// 同步信號載荷 (伺服端 -> 所有客戶端)
///
/// 當某個資源發生變更時（由某個客戶端請求觸發），伺服端廣播此信號，
/// 通知所有感興趣的客戶端更新本地狀態。
///
/// # 示例
/// - `resource`: "check_in"
/// - `version`: 42
/// - `action`: "created"
/// - `id`: "88123"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// 資源型別 (例如: "traveler", "check_in", "group")
    pub resource: String,
    /// 版本號 (用於客戶端判斷是否需要全量刷新)
    pub version: u64,
    /// 變更型別 ("created", "updated", "deleted")
    pub action: String,
    /// 資源 ID (必填，每次 Sync 都應指定具體的實體 ID)
    pub id: String,
    /// 資源資料 (可選，deleted 時為 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// ==================== Convenience Constructors ====================

impl NotificationPayload {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Info,
            data: None,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Warning,
            data: None,
        }
    }

    /// SOS 警報通知
    pub fn critical(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Critical,
            data: None,
        }
    }
}
