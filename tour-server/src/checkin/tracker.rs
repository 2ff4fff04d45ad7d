//! Check-in Tracker
//!
//! 連線端（第二台裝置上的名冊看板）的已報到集合。同步事件經由單一
//! reducer 進入：每次都從最新狀態推導下一狀態，不持有過期快照，
//! 避免 callback 式事件處理常見的 stale-closure 問題。
//!
//! 事件不做順序保證；同一團員的 created/deleted 若亂序送達，
//! 可能出現短暫不一致，以下一次權威讀取為準（接受，不另行補救）。

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::CHECK_IN_RESOURCE;
use shared::message::{BusMessage, EventType, SyncPayload};

/// 訂閱端的已報到集合
pub struct CheckinTracker {
    /// 本團名冊（群組過濾在客戶端做：事件不分團廣播）
    roster: RwLock<HashSet<i64>>,
    checked_in: RwLock<HashSet<i64>>,
}

impl CheckinTracker {
    pub fn new(roster: impl IntoIterator<Item = i64>) -> Self {
        Self {
            roster: RwLock::new(roster.into_iter().collect()),
            checked_in: RwLock::new(HashSet::new()),
        }
    }

    /// 更新名冊（換團或名冊重新整理時）
    pub fn set_roster(&self, roster: impl IntoIterator<Item = i64>) {
        let next: HashSet<i64> = roster.into_iter().collect();
        // 名冊縮小時同步清掉已不在團內的報到狀態
        {
            let mut checked = self.checked_in.write();
            checked.retain(|id| next.contains(id));
        }
        *self.roster.write() = next;
    }

    /// 以權威讀取結果重設已報到集合
    pub fn reset_checked_in(&self, ids: impl IntoIterator<Item = i64>) {
        let roster = self.roster.read();
        let next: HashSet<i64> = ids.into_iter().filter(|id| roster.contains(id)).collect();
        drop(roster);
        *self.checked_in.write() = next;
    }

    /// Reducer：套用一筆同步事件
    ///
    /// 非 check_in 資源、不在名冊內的 ID 一律忽略。
    pub fn apply(&self, payload: &SyncPayload) {
        if payload.resource != CHECK_IN_RESOURCE {
            return;
        }
        let Ok(traveler_id) = payload.id.parse::<i64>() else {
            return;
        };
        if !self.roster.read().contains(&traveler_id) {
            return;
        }
        match payload.action.as_str() {
            "created" => {
                self.checked_in.write().insert(traveler_id);
            }
            "deleted" => {
                self.checked_in.write().remove(&traveler_id);
            }
            _ => {}
        }
    }

    pub fn is_checked_in(&self, traveler_id: i64) -> bool {
        self.checked_in.read().contains(&traveler_id)
    }

    pub fn checked_in_count(&self) -> usize {
        self.checked_in.read().len()
    }

    pub fn checked_in_ids(&self) -> HashSet<i64> {
        self.checked_in.read().clone()
    }

    /// 訂閱迴圈：view mount 時啟動，取消權杖落下即停止
    ///
    /// 斷線重連交給傳輸層；lag 只記警告，下一次權威讀取會補正。
    pub async fn run(
        self: Arc<Self>,
        mut rx: broadcast::Receiver<BusMessage>,
        token: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Check-in tracker shutting down");
                    break;
                }
                msg = rx.recv() => {
                    match msg {
                        Ok(msg) if msg.event_type == EventType::Sync => {
                            match msg.parse_payload::<SyncPayload>() {
                                Ok(payload) => self.apply(&payload),
                                Err(e) => {
                                    tracing::warn!(error = %e, "Ignoring malformed sync payload");
                                }
                            }
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "Check-in tracker lagged behind bus");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageBus;

    fn sync_event(resource: &str, action: &str, id: i64) -> SyncPayload {
        SyncPayload {
            resource: resource.to_string(),
            version: 1,
            action: action.to_string(),
            id: id.to_string(),
            data: None,
        }
    }

    #[test]
    fn test_apply_created_and_deleted() {
        let tracker = CheckinTracker::new([1, 2, 3]);

        tracker.apply(&sync_event("check_in", "created", 1));
        assert!(tracker.is_checked_in(1));
        assert_eq!(tracker.checked_in_count(), 1);

        tracker.apply(&sync_event("check_in", "deleted", 1));
        assert!(!tracker.is_checked_in(1));
        assert_eq!(tracker.checked_in_count(), 0);
    }

    #[test]
    fn test_ignores_ids_outside_roster() {
        // 群組過濾在客戶端：不屬於本團名冊的事件一律忽略
        let tracker = CheckinTracker::new([1, 2]);
        tracker.apply(&sync_event("check_in", "created", 99));
        assert!(!tracker.is_checked_in(99));
        assert_eq!(tracker.checked_in_count(), 0);
    }

    #[test]
    fn test_ignores_other_resources() {
        let tracker = CheckinTracker::new([1]);
        tracker.apply(&sync_event("traveler", "created", 1));
        assert!(!tracker.is_checked_in(1));
    }

    #[test]
    fn test_duplicate_events_are_idempotent() {
        let tracker = CheckinTracker::new([1]);
        tracker.apply(&sync_event("check_in", "created", 1));
        tracker.apply(&sync_event("check_in", "created", 1));
        assert_eq!(tracker.checked_in_count(), 1);

        tracker.apply(&sync_event("check_in", "deleted", 1));
        tracker.apply(&sync_event("check_in", "deleted", 1));
        assert_eq!(tracker.checked_in_count(), 0);
    }

    #[test]
    fn test_roster_shrink_clears_state() {
        let tracker = CheckinTracker::new([1, 2]);
        tracker.apply(&sync_event("check_in", "created", 2));
        tracker.set_roster([1]);
        assert!(!tracker.is_checked_in(2));
    }

    #[tokio::test]
    async fn test_run_applies_broadcast_events() {
        let bus = MessageBus::new();
        let tracker = Arc::new(CheckinTracker::new([42]));
        let token = CancellationToken::new();

        // 先訂閱再發布，廣播通道才會緩衝到這個接收端
        let rx = bus.subscribe();
        bus.publish(BusMessage::sync(&sync_event("check_in", "created", 42)))
            .await
            .unwrap();

        let handle = tokio::spawn(tracker.clone().run(rx, token.clone()));
        // 給 reducer 一點時間消化緩衝的事件
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        token.cancel();
        handle.await.unwrap();

        assert!(tracker.is_checked_in(42));
    }
}
