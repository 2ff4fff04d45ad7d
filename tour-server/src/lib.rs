//! Tour Server - 領隊團務管理系統後端
//!
//! # 架構概述
//!
//! 本模組是團務後端的主入口，提供以下核心功能：
//!
//! - **名冊** (`roster`): 團員名單的正規化讀取、房號排序、批次匯入與容錯寫入
//! - **報到** (`checkin`): 在席語義的報到帳與訂閱端 reducer
//! - **訊息匯流排** (`message`): 記憶體/TCP 傳輸的即時同步通道
//! - **推播** (`messaging`): LINE 推播閘道與身分綁定
//! - **資料庫** (`db`): 嵌入式 SQLite 儲存
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模組結構
//!
//! ```text
//! tour-server/src/
//! ├── core/          # 設定、狀態、伺服器
//! ├── db/            # 資料庫層
//! ├── roster/        # 名冊領域
//! ├── checkin/       # 報到領域
//! ├── message/       # 訊息匯流排
//! ├── messaging/     # LINE 推播閘道
//! ├── flight/        # 航班動態（假資料回退）
//! ├── services/      # 背景服務
//! ├── api/           # HTTP 路由和處理器
//! └── utils/         # 錯誤、日誌
//! ```

pub mod api;
pub mod checkin;
pub mod core;
pub mod db;
pub mod flight;
pub mod message;
pub mod messaging;
pub mod roster;
pub mod services;
pub mod utils;

// Re-export 公共型別
pub use checkin::{CheckinLedger, CheckinTracker};
pub use core::{Config, Server, ServerState};
pub use message::{BusMessage, EventType, MessageBus};
pub use roster::RosterService;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 設定執行環境（dotenv + 日誌）
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ______
 /_  __/___  __  _______
  / / / __ \/ / / / ___/
 / / / /_/ / /_/ / /
/_/  \____/\__,_/_/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
