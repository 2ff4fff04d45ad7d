//! Message Bus Service
//!
//! 包裝 [`MessageBus`] 的生命週期：建構、背景任務與關閉。

use std::sync::Arc;

use crate::core::Config;
use crate::message::{MessageBus, TransportConfig};
use shared::message::{EventType, HandshakePayload, PROTOCOL_VERSION};

/// 訊息匯流排服務
#[derive(Debug, Clone)]
pub struct MessageBusService {
    bus: Arc<MessageBus>,
}

impl MessageBusService {
    pub fn new(config: &Config) -> Self {
        let transport_config = TransportConfig {
            tcp_listen_addr: format!("0.0.0.0:{}", config.message_tcp_port),
            ..Default::default()
        };
        Self {
            bus: Arc::new(MessageBus::from_config(transport_config)),
        }
    }

    pub fn bus(&self) -> &Arc<MessageBus> {
        &self.bus
    }

    /// 啟動背景任務：消化客戶端進站訊息（目前只有握手）
    pub fn start_background_tasks(&self) {
        let bus = self.bus.clone();
        let token = bus.shutdown_token().clone();
        let mut rx = bus.subscribe_to_clients();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => {
                        let Ok(msg) = msg else { break };
                        if msg.event_type != EventType::Handshake {
                            continue;
                        }
                        match msg.parse_payload::<HandshakePayload>() {
                            Ok(hs) => {
                                if hs.version != PROTOCOL_VERSION {
                                    tracing::warn!(
                                        client = hs.client_name.as_deref().unwrap_or("unknown"),
                                        client_version = hs.version,
                                        server_version = PROTOCOL_VERSION,
                                        "Client handshake with mismatched protocol version"
                                    );
                                } else {
                                    tracing::info!(
                                        client = hs.client_name.as_deref().unwrap_or("unknown"),
                                        "Client handshake"
                                    );
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Malformed handshake payload");
                            }
                        }
                    }
                }
            }
        });
    }

    /// 關閉匯流排（取消 TCP 伺服器與背景任務）
    pub fn shutdown(&self) {
        self.bus.shutdown();
    }
}
