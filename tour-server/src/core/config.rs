use std::path::PathBuf;

/// 伺服器設定 - 團務後端的所有設定項
///
/// # 環境變數
///
/// 所有設定項都可以透過環境變數覆蓋：
///
/// | 環境變數 | 預設值 | 說明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/tour/server | 工作目錄 |
/// | HTTP_PORT | 3000 | HTTP 服務埠 |
/// | MESSAGE_TCP_PORT | 8081 | TCP 訊息匯流排埠 |
/// | ENVIRONMENT | development | 執行環境 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 關閉逾時（毫秒） |
/// | LINE_API_BASE | https://api.line.me | LINE Messaging API 位址 |
/// | LINE_CHANNEL_ACCESS_TOKEN | (無) | LINE channel 權杖（伺服端保管） |
/// | TTS_API_BASE | (Google TTS) | 語音合成端點 |
/// | FLIGHT_API_BASE | (aviationstack) | 航班動態端點 |
/// | FLIGHT_API_KEY | (無) | 航班 API 金鑰；缺漏時改用假資料 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/tour HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目錄，存放資料庫與日誌
    pub work_dir: String,
    /// HTTP API 服務埠
    pub http_port: u16,
    /// TCP 訊息匯流排埠（報到看板直連用）
    pub message_tcp_port: u16,
    /// 執行環境: development | staging | production
    pub environment: String,
    /// 關閉逾時（毫秒）
    pub shutdown_timeout_ms: u64,

    // === 外部服務 ===
    /// LINE Messaging API 位址
    pub line_api_base: String,
    /// LINE channel 權杖（未設定時推播功能回報設定錯誤）
    pub line_channel_token: Option<String>,
    /// TTS 端點
    pub tts_api_base: String,
    /// 航班動態端點
    pub flight_api_base: String,
    /// 航班 API 金鑰（未設定時改用確定性假資料）
    pub flight_api_key: Option<String>,
}

impl Config {
    /// 從環境變數載入設定
    ///
    /// 環境變數未設定時使用預設值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/tour/server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            message_tcp_port: std::env::var("MESSAGE_TCP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),

            line_api_base: std::env::var("LINE_API_BASE")
                .unwrap_or_else(|_| "https://api.line.me".into()),
            line_channel_token: std::env::var("LINE_CHANNEL_ACCESS_TOKEN").ok(),
            tts_api_base: std::env::var("TTS_API_BASE")
                .unwrap_or_else(|_| "https://translate.google.com/translate_tts".into()),
            flight_api_base: std::env::var("FLIGHT_API_BASE")
                .unwrap_or_else(|_| "https://api.aviationstack.com/v1/flights".into()),
            flight_api_key: std::env::var("FLIGHT_API_KEY").ok(),
        }
    }

    /// 以自訂值覆蓋部分設定
    ///
    /// 常用於測試場景
    pub fn with_overrides(
        work_dir: impl Into<String>,
        http_port: u16,
        message_tcp_port: u16,
    ) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.message_tcp_port = message_tcp_port;
        config
    }

    /// 是否生產環境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否開發環境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 資料庫目錄 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日誌目錄 (work_dir/logs)
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 確保工作目錄結構存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
