use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::checkin::CheckinLedger;
use crate::core::Config;
use crate::db::DbService;
use crate::flight::FlightStatusClient;
use crate::messaging::MessagingGateway;
use crate::roster::RosterService;
use crate::services::MessageBusService;
use shared::message::{BusMessage, SyncPayload};
use shared::models::SyncStatus;

/// 資源版本管理器
///
/// 使用 DashMap 實現無鎖並發的版本號管理。
/// 每種資源型別維護獨立的版本號，支援原子遞增。
///
/// # 使用場景
///
/// 用於 broadcast_sync 時自動產生遞增的版本號，
/// 讓客戶端能以版本號判斷資料新舊；重連時搭配 epoch
/// 判斷是否需要全量重抓。
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 建立空的版本管理器
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 遞增指定資源的版本號並回傳新值
    ///
    /// 資源不存在時從 0 開始遞增（回傳 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 取得指定資源的目前版本號
    ///
    /// 資源不存在時回傳 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// 全部資源版本快照
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.versions
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// 伺服器狀態 - 持有所有服務的共享參照
///
/// ServerState 是後端的核心資料結構，以 Arc/連線池實現淺拷貝，
/// 注入到所有 axum handler。依賴一律顯式建構、顯式注入，
/// 不放行程級單例（開在 initialize，收在行程結束）。
///
/// # 服務組件
///
/// | 欄位 | 型別 | 說明 |
/// |------|------|------|
/// | config | Config | 設定項（不可變） |
/// | pool | SqlitePool | 嵌入式資料庫連線池 |
/// | message_bus | MessageBusService | 訊息匯流排服務 |
/// | resource_versions | Arc<ResourceVersions> | 資源版本管理 |
/// | roster | RosterService | 名冊服務 |
/// | checkin | CheckinLedger | 報到帳 |
/// | gateway | MessagingGateway | LINE 推播閘道 |
/// | flight | FlightStatusClient | 航班動態查詢 |
#[derive(Clone)]
pub struct ServerState {
    /// 伺服器設定
    pub config: Config,
    /// 嵌入式資料庫 (SQLite)
    pub pool: SqlitePool,
    /// 訊息匯流排服務
    pub message_bus: MessageBusService,
    /// 資源版本管理器（broadcast_sync 自動遞增版本號）
    pub resource_versions: Arc<ResourceVersions>,
    /// 伺服器實例 epoch（啟動時產生，客戶端用於偵測重啟）
    pub epoch: String,
    /// 名冊服務
    pub roster: RosterService,
    /// 報到帳
    pub checkin: CheckinLedger,
    /// LINE 推播閘道
    pub gateway: MessagingGateway,
    /// 航班動態查詢
    pub flight: FlightStatusClient,
    /// TTS 代理共用的 HTTP client
    pub http: reqwest::Client,
}

impl ServerState {
    /// 初始化伺服器狀態
    ///
    /// 依序初始化：
    /// 1. 工作目錄結構
    /// 2. 資料庫 (work_dir/database/tour.db) 與遷移
    /// 3. 各服務（訊息匯流排、名冊、報到帳、推播閘道、航班查詢）
    /// 4. 報到帳自資料庫載入在席集合
    ///
    /// # Panics
    ///
    /// 資料庫初始化失敗時 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_path = config.database_dir().join("tour.db");
        let db_path_str = db_path.to_string_lossy();

        let db_service = DbService::new(&db_path_str)
            .await
            .expect("Failed to initialize database");
        let pool = db_service.pool;

        // 2. Initialize services
        let message_bus = MessageBusService::new(config);
        let resource_versions = Arc::new(ResourceVersions::new());
        let epoch = Uuid::new_v4().to_string();
        let roster = RosterService::new(pool.clone());
        let checkin = CheckinLedger::new(pool.clone());
        let gateway =
            MessagingGateway::new(config.line_api_base.clone(), config.line_channel_token.clone());
        let flight =
            FlightStatusClient::new(config.flight_api_base.clone(), config.flight_api_key.clone());

        // 3. Load authoritative check-in set
        checkin
            .load()
            .await
            .expect("Failed to load check-in state");

        Self {
            config: config.clone(),
            pool,
            message_bus,
            resource_versions,
            epoch,
            roster,
            checkin,
            gateway,
            flight,
            http: reqwest::Client::new(),
        }
    }

    /// 啟動背景任務
    ///
    /// 必須在 `Server::run()` 之前呼叫
    pub async fn start_background_tasks(&self) {
        self.message_bus.start_background_tasks();
    }

    /// 取得資料庫連線池
    pub fn get_pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// 取得訊息匯流排
    pub fn bus(&self) -> &Arc<crate::message::MessageBus> {
        self.message_bus.bus()
    }

    /// 廣播同步訊息
    ///
    /// 向所有連線的客戶端廣播資源變更通知。
    /// 版本號由 ResourceVersions 自動遞增管理。
    ///
    /// # 參數
    /// - `resource`: 資源型別（如 "traveler", "check_in"）
    /// - `action`: 變更型別（"created", "updated", "deleted"）
    /// - `id`: 資源 ID
    /// - `data`: 資源資料（deleted 時為 None）
    pub async fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        let _ = self.bus().publish(BusMessage::sync(&payload)).await;
    }

    /// 同步狀態（epoch + 各資源版本）
    pub fn sync_status(&self) -> SyncStatus {
        SyncStatus {
            epoch: self.epoch.clone(),
            versions: self.resource_versions.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_versions_increment() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("check_in"), 0);
        assert_eq!(versions.increment("check_in"), 1);
        assert_eq!(versions.increment("check_in"), 2);
        assert_eq!(versions.increment("traveler"), 1);
        assert_eq!(versions.get("check_in"), 2);

        let snapshot = versions.snapshot();
        assert_eq!(snapshot.get("check_in"), Some(&2));
        assert_eq!(snapshot.get("traveler"), Some(&1));
    }
}
