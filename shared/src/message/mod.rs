//! 訊息匯流排訊息型別定義
//!
//! 這些型別在 tour-server 與連線的看板/客戶端之間共享，用於
//! 行程內（記憶體）與網路（TCP）通訊。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// 協定版本號
pub const PROTOCOL_VERSION: u16 = 1;

/// 訊息匯流排事件型別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 握手訊息
    Handshake = 0,
    /// 系統通知（含 SOS 警報）
    Notification = 1,
    /// 資源變更同步信號
    Sync = 2,
}

impl TryFrom<u8> for EventType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventType::Handshake),
            1 => Ok(EventType::Notification),
            2 => Ok(EventType::Sync),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Handshake => write!(f, "handshake"),
            EventType::Notification => write!(f, "notification"),
            EventType::Sync => write!(f, "sync"),
        }
    }
}

/// 訊息匯流排訊息體
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    pub source: Option<String>,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            source: None,
            payload,
        }
    }

    /// 標記訊息來源（除錯用）
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// 建立握手訊息
    pub fn handshake(payload: &HandshakePayload) -> Self {
        Self::new(
            EventType::Handshake,
            serde_json::to_vec(payload).expect("Failed to serialize handshake payload"),
        )
    }

    /// 建立通知訊息
    pub fn notification(payload: &NotificationPayload) -> Self {
        Self::new(
            EventType::Notification,
            serde_json::to_vec(payload).expect("Failed to serialize notification"),
        )
    }

    /// 建立同步信號訊息
    pub fn sync(payload: &SyncPayload) -> Self {
        Self::new(
            EventType::Sync,
            serde_json::to_vec(payload).expect("Failed to serialize sync payload"),
        )
    }

    /// 解析載荷為指定型別
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_message() {
        let payload = HandshakePayload {
            version: PROTOCOL_VERSION,
            client_name: Some("test-client".to_string()),
            client_id: Some("uuid-v4".to_string()),
        };

        let msg = BusMessage::handshake(&payload);
        assert_eq!(msg.event_type, EventType::Handshake);
        assert!(!msg.request_id.is_nil());

        let parsed: HandshakePayload = msg.parse_payload().unwrap();
        assert_eq!(parsed.version, PROTOCOL_VERSION);
    }

    #[test]
    fn test_sync_message_roundtrip() {
        let payload = SyncPayload {
            resource: "check_in".to_string(),
            version: 7,
            action: "created".to_string(),
            id: "42".to_string(),
            data: None,
        };

        let msg = BusMessage::sync(&payload);
        assert_eq!(msg.event_type, EventType::Sync);

        let parsed: SyncPayload = msg.parse_payload().unwrap();
        assert_eq!(parsed.resource, "check_in");
        assert_eq!(parsed.action, "created");
        assert_eq!(parsed.id, "42");
    }

    #[test]
    fn test_event_type_from_u8() {
        assert_eq!(EventType::try_from(0), Ok(EventType::Handshake));
        assert_eq!(EventType::try_from(2), Ok(EventType::Sync));
        assert!(EventType::try_from(9).is_err());
    }
}
