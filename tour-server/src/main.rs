use tour_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 設定環境 (dotenv, 日誌)
    setup_environment().map_err(|e| anyhow::anyhow!(e.to_string()))?;

    // 列印橫幅
    print_banner();

    tracing::info!("Tour Server starting...");

    // 2. 載入設定
    let config = Config::from_env();

    // 3. 初始化伺服器狀態
    let state = ServerState::initialize(&config).await;

    // 4. 啟動 HTTP 伺服器（Server::run 會啟動背景任務與 TCP 匯流排）
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
