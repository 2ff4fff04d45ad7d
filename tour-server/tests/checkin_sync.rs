//! 報到切換 → 匯流排廣播 → 第二訂閱端 reducer 的完整流程

use std::str::FromStr;
use std::sync::Arc;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio_util::sync::CancellationToken;

use shared::message::{BusMessage, SyncPayload};
use tour_server::checkin::{CHECK_IN_RESOURCE, CheckinLedger, CheckinTracker};
use tour_server::message::MessageBus;

async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .pragma("foreign_keys", "ON");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("apply migrations");
    pool
}

#[tokio::test]
async fn toggle_reaches_second_client_without_refetch() {
    let pool = memory_pool().await;
    sqlx::query(
        "INSERT INTO travelers (id, full_name, room_number, created_at, updated_at) VALUES (1, '王小明', '101', 0, 0)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let ledger = CheckinLedger::new(pool.clone());
    ledger.load().await.unwrap();

    // 第二台裝置：訂閱匯流排，靠 reducer 跟上狀態
    let bus = MessageBus::new();
    let tracker = Arc::new(CheckinTracker::new([1]));
    let rx = bus.subscribe();
    let token = CancellationToken::new();
    let handle = tokio::spawn(tracker.clone().run(rx, token.clone()));

    // 模擬 API handler：切換成功後廣播 created 事件
    let outcome = ledger.toggle(1, Some("集合點")).await.unwrap();
    assert!(outcome.checked_in);
    assert!(ledger.is_checked_in(1));

    let payload = SyncPayload {
        resource: CHECK_IN_RESOURCE.to_string(),
        version: 1,
        action: "created".to_string(),
        id: "1".to_string(),
        data: None,
    };
    bus.publish(BusMessage::sync(&payload)).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // 第二端不重抓名冊即看到報到狀態
    assert!(tracker.is_checked_in(1));

    // 取消報到 → deleted 事件 → 第二端同步移除
    let outcome = ledger.toggle(1, None).await.unwrap();
    assert!(!outcome.checked_in);
    let payload = SyncPayload {
        resource: CHECK_IN_RESOURCE.to_string(),
        version: 2,
        action: "deleted".to_string(),
        id: "1".to_string(),
        data: None,
    };
    bus.publish(BusMessage::sync(&payload)).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!tracker.is_checked_in(1));

    token.cancel();
    handle.await.unwrap();
}
