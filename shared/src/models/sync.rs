// shared/src/models/sync.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 同步狀態回應
///
/// 用於客戶端重連時檢查資源版本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatus {
    /// 伺服器實例 epoch (啟動時產生的 UUID)
    /// 用於偵測伺服器重啟
    pub epoch: String,
    /// 各資源型別的目前版本
    pub versions: HashMap<String, u64>,
}
