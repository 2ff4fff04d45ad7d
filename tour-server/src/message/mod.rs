//! 訊息匯流排 - 報到看板與名冊視圖的即時同步通道
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           MessageBus                     │
//! │  ┌───────────────────────────────────┐  │
//! │  │  broadcast::Sender<BusMessage>    │  │
//! │  └───────────────────────────────────┘  │
//! └────────────────┬────────────────────────┘
//!                  │
//!         ┌────────┴────────┐
//!         │ Transport Trait │  ◄── 可插拔
//!         └────────┬────────┘
//!                  │
//!         ┌────────┴────────┐
//!         ▼                 ▼
//!    TcpTransport     MemoryTransport
//!    (區網 TCP)       (同行程)
//! ```
//!
//! 訊框格式：`[event_type u8][len u32 LE][payload]`。
//! 不提供重送/重連；斷線後由客戶端自行重連並以權威讀取補狀態。

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

pub use shared::message::{
    BusMessage, EventType, HandshakePayload, NotificationPayload, SyncPayload,
};

use crate::utils::AppError;

// ========== Transport Trait ==========

#[async_trait]
pub trait Transport: Send + Sync {
    async fn read_message(&self) -> Result<BusMessage, AppError>;
    async fn write_message(&self, msg: &BusMessage) -> Result<(), AppError>;
}

// Helper functions
async fn read_from_stream<R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<BusMessage, AppError> {
    // Read event type (1 byte)
    let mut type_buf = [0u8; 1];
    reader
        .read_exact(&mut type_buf)
        .await
        .map_err(|e| AppError::internal(format!("Read type failed: {}", e)))?;

    let event_type =
        EventType::try_from(type_buf[0]).map_err(|_| AppError::invalid("Invalid event type"))?;

    // Read payload length (4 bytes)
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| AppError::internal(format!("Read len failed: {}", e)))?;

    let len = u32::from_le_bytes(len_buf) as usize;

    // Read payload
    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| AppError::internal(format!("Read payload failed: {}", e)))?;

    Ok(BusMessage::new(event_type, payload))
}

async fn write_to_stream<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    msg: &BusMessage,
) -> Result<(), AppError> {
    let mut data = Vec::new();
    data.push(msg.event_type as u8);
    data.extend_from_slice(&(msg.payload.len() as u32).to_le_bytes());
    data.extend_from_slice(&msg.payload);

    writer
        .write_all(&data)
        .await
        .map_err(|e| AppError::internal(format!("Write failed: {}", e)))?;
    Ok(())
}

// ========== TCP Transport ==========

/// TCP transport implementation
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    pub async fn connect(addr: &str) -> Result<Self, AppError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| AppError::internal(format!("TCP connect failed: {}", e)))?;
        Ok(Self::from_stream(stream))
    }

    fn from_stream(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn read_message(&self) -> Result<BusMessage, AppError> {
        let mut reader = self.reader.lock().await;
        read_from_stream(&mut *reader).await
    }

    async fn write_message(&self, msg: &BusMessage) -> Result<(), AppError> {
        let mut writer = self.writer.lock().await;
        write_to_stream(&mut *writer, msg).await
    }
}

// ========== Memory Transport (In-Process) ==========

/// In-process memory transport for same-process communication
///
/// Uses tokio broadcast channel internally for zero-copy messaging.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    rx: Arc<Mutex<broadcast::Receiver<BusMessage>>>,
    tx: Option<Arc<broadcast::Sender<BusMessage>>>,
}

impl MemoryTransport {
    /// Create from a message bus sender (for receiving broadcasts)
    pub fn new(tx: &broadcast::Sender<BusMessage>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(tx.subscribe())),
            tx: None,
        }
    }

    /// Create with client sender for simulating client messages
    pub fn with_client_sender(
        broadcast_tx: &broadcast::Sender<BusMessage>,
        client_tx: &broadcast::Sender<BusMessage>,
    ) -> Self {
        Self {
            rx: Arc::new(Mutex::new(broadcast_tx.subscribe())),
            tx: Some(Arc::new(client_tx.clone())),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn read_message(&self) -> Result<BusMessage, AppError> {
        let mut rx = self.rx.lock().await;
        rx.recv()
            .await
            .map_err(|e| AppError::internal(e.to_string()))
    }

    async fn write_message(&self, msg: &BusMessage) -> Result<(), AppError> {
        // Send to server via client_tx (for simulating client messages)
        if let Some(tx) = &self.tx {
            tx.send(msg.clone())
                .map_err(|e| AppError::internal(e.to_string()))?;
        }
        Ok(())
    }
}

// ========== Message Bus ==========

/// Configuration for transport layer
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tcp_listen_addr: String,
    /// Capacity of the broadcast channel (default: 1024)
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tcp_listen_addr: "0.0.0.0:8081".to_string(),
            channel_capacity: 1024,
        }
    }
}

/// Unified message bus with pluggable transport
#[derive(Debug, Clone)]
pub struct MessageBus {
    client_tx: broadcast::Sender<BusMessage>,
    server_tx: broadcast::Sender<BusMessage>,
    config: TransportConfig,
    shutdown_token: CancellationToken,
}

impl MessageBus {
    /// Create a new message bus with default configuration
    pub fn new() -> Self {
        Self::from_config(TransportConfig::default())
    }

    /// Create a new message bus from configuration
    pub fn from_config(config: TransportConfig) -> Self {
        let capacity = config.channel_capacity;
        let (client_tx, _) = broadcast::channel(capacity);
        let (server_tx, _) = broadcast::channel(capacity);
        Self {
            client_tx,
            server_tx,
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Publish a message FROM SERVER to all subscribers (broadcast)
    pub async fn publish(&self, msg: BusMessage) -> Result<(), AppError> {
        self.server_tx
            .send(msg)
            .map_err(|e| AppError::internal(e.to_string()))?;
        Ok(())
    }

    /// Send a message TO SERVER (from client)
    pub async fn send_to_server(&self, msg: BusMessage) -> Result<(), AppError> {
        self.client_tx
            .send(msg)
            .map_err(|e| AppError::internal(e.to_string()))?;
        Ok(())
    }

    /// Subscribe to receive messages FROM CLIENTS (server use only)
    pub fn subscribe_to_clients(&self) -> broadcast::Receiver<BusMessage> {
        self.client_tx.subscribe()
    }

    /// Subscribe to receive broadcasts FROM SERVER (clients use this)
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.server_tx.subscribe()
    }

    /// Get a memory transport for in-process communication
    pub fn memory_transport(&self) -> MemoryTransport {
        MemoryTransport::new(&self.server_tx)
    }

    /// Get a client memory transport that can send messages to server
    pub fn client_memory_transport(&self) -> MemoryTransport {
        MemoryTransport::with_client_sender(&self.server_tx, &self.client_tx)
    }

    /// Get the shutdown token (for monitoring shutdown signals)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// Gracefully shutdown the message bus
    ///
    /// This cancels all running tasks including the TCP server.
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }

    /// Start TCP server (for LAN clients: check-in boards, second devices)
    ///
    /// 1. Accepts connections
    /// 2. Reads messages from clients and publishes to client_tx
    /// 3. Forwards server broadcast messages to connected clients
    /// 4. Gracefully shuts down on cancellation signal
    pub async fn start_tcp_server(&self) -> Result<(), AppError> {
        let listener = TcpListener::bind(&self.config.tcp_listen_addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind: {}", e)))?;

        tracing::info!(
            "Message bus TCP server listening on {}",
            self.config.tcp_listen_addr
        );

        let server_tx = self.server_tx.clone();
        let client_tx = self.client_tx.clone();
        let shutdown_token = self.shutdown_token.clone();

        loop {
            tokio::select! {
                // Listen for shutdown signal
                _ = shutdown_token.cancelled() => {
                    tracing::info!("Message bus TCP server shutting down");
                    break;
                }

                // Accept new connections
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            tracing::info!("Client connected: {}", addr);

                            let server_tx = server_tx.clone();
                            let client_tx = client_tx.clone();
                            let shutdown_token = shutdown_token.clone();

                            tokio::spawn(async move {
                                let transport = Arc::new(TcpTransport::from_stream(stream));

                                let mut rx = server_tx.subscribe();
                                let transport_clone = transport.clone();
                                let client_shutdown = shutdown_token.clone();

                                // Forward broadcasts to this client (server → client)
                                tokio::spawn(async move {
                                    loop {
                                        tokio::select! {
                                            _ = client_shutdown.cancelled() => {
                                                tracing::info!("Client {} handler shutting down", addr);
                                                break;
                                            }
                                            msg_result = rx.recv() => {
                                                match msg_result {
                                                    Ok(msg) => {
                                                        if let Err(e) = transport_clone.write_message(&msg).await {
                                                            tracing::info!("Client {} disconnected: {}", addr, e);
                                                            break;
                                                        }
                                                    }
                                                    Err(_) => {
                                                        // Channel closed
                                                        break;
                                                    }
                                                }
                                            }
                                        }
                                    }
                                });

                                // Read messages from client (client → server)
                                loop {
                                    tokio::select! {
                                        _ = shutdown_token.cancelled() => {
                                            break;
                                        }
                                        read_result = transport.read_message() => {
                                            match read_result {
                                                Ok(msg) => {
                                                    if let Err(e) = client_tx.send(msg) {
                                                        tracing::warn!("Failed to publish client message: {}", e);
                                                    }
                                                }
                                                Err(e) => {
                                                    tracing::info!("Client {} read error: {}", addr, e);
                                                    break;
                                                }
                                            }
                                        }
                                    }
                                }
                            });
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_transport() {
        let bus = MessageBus::new();
        let transport = bus.memory_transport();

        // Publish
        let payload = NotificationPayload::info("Test", "Hello");
        let msg = BusMessage::notification(&payload);
        bus.publish(msg.clone()).await.unwrap();

        // Receive via transport
        let received = transport.read_message().await.unwrap();
        assert_eq!(received.event_type, EventType::Notification);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_see_sync_event() {
        let bus = MessageBus::new();
        let t1 = bus.memory_transport();
        let t2 = bus.memory_transport();

        let payload = SyncPayload {
            resource: "check_in".to_string(),
            version: 1,
            action: "created".to_string(),
            id: "42".to_string(),
            data: None,
        };
        let msg = BusMessage::sync(&payload);
        bus.publish(msg.clone()).await.unwrap();

        let r1 = t1.read_message().await.unwrap();
        let r2 = t2.read_message().await.unwrap();

        assert_eq!(r1.event_type, EventType::Sync);
        assert_eq!(r2.event_type, EventType::Sync);

        let p1: SyncPayload = r1.parse_payload().unwrap();
        assert_eq!(p1.id, "42");
    }

    #[tokio::test]
    async fn test_client_memory_transport_reaches_server() {
        let bus = MessageBus::new();
        let client = bus.client_memory_transport();
        let mut server_rx = bus.subscribe_to_clients();

        let payload = HandshakePayload {
            version: shared::message::PROTOCOL_VERSION,
            client_name: Some("board".to_string()),
            client_id: None,
        };
        client
            .write_message(&BusMessage::handshake(&payload))
            .await
            .unwrap();

        let received = server_rx.recv().await.unwrap();
        assert_eq!(received.event_type, EventType::Handshake);
    }
}
