//! 區網看板示範客戶端
//!
//! 連上 tour-server 的 TCP 訊息匯流排，維護一份已報到集合並在
//! 每次變更時印出，示範第二台裝置如何不靠輪詢跟上報到狀態。
//!
//! ```text
//! cargo run --example roster_client -- 127.0.0.1:8081 <traveler_id>...
//! ```

use std::sync::Arc;

use tour_server::checkin::CheckinTracker;
use tour_server::message::{
    BusMessage, EventType, HandshakePayload, NotificationPayload, SyncPayload, TcpTransport,
    Transport,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:8081".to_string());
    let roster: Vec<i64> = args.filter_map(|a| a.parse().ok()).collect();

    if roster.is_empty() {
        eprintln!("用法: roster_client <addr> <traveler_id>...");
        eprintln!("(事件不分團廣播，需要名冊 ID 做客戶端過濾)");
        std::process::exit(1);
    }

    let tracker = Arc::new(CheckinTracker::new(roster));

    let transport = TcpTransport::connect(&addr).await?;
    println!("已連上訊息匯流排 {addr}");

    transport
        .write_message(&BusMessage::handshake(&HandshakePayload {
            version: shared::message::PROTOCOL_VERSION,
            client_name: Some("roster-board".to_string()),
            client_id: None,
        }))
        .await?;

    loop {
        let msg = transport.read_message().await?;
        match msg.event_type {
            EventType::Sync => {
                let Ok(payload) = msg.parse_payload::<SyncPayload>() else {
                    continue;
                };
                tracker.apply(&payload);
                let mut ids: Vec<i64> = tracker.checked_in_ids().into_iter().collect();
                ids.sort_unstable();
                println!(
                    "[{} v{}] 已報到 {} 人: {:?}",
                    payload.resource,
                    payload.version,
                    ids.len(),
                    ids
                );
            }
            EventType::Notification => {
                if let Ok(n) = msg.parse_payload::<NotificationPayload>() {
                    println!("[{}] {} - {}", n.level, n.title, n.message);
                }
            }
            _ => {}
        }
    }
}
