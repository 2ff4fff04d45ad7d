//! 報到模組 - 在席狀態的權威帳與連線端 reducer
//!
//! - [`ledger`] - CheckinLedger：資料庫為準的報到切換（樂觀更新 + 失敗回收）
//! - [`tracker`] - CheckinTracker：訂閱端的已報到集合 reducer

pub mod ledger;
pub mod tracker;

pub use ledger::{CheckinLedger, ToggleOutcome};
pub use tracker::CheckinTracker;

/// 報到記錄在同步訊息中的資源名
pub const CHECK_IN_RESOURCE: &str = "check_in";
