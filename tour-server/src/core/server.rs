//! Server Implementation
//!
//! HTTP 伺服器啟動與路由組裝

use crate::core::{Config, Result, ServerError, ServerState};
use axum::{Router, middleware};
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

/// HTTP 請求日誌中介層
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::health::router())
        .merge(crate::api::sync::router())
        // Data model APIs
        .merge(crate::api::travelers::router())
        .merge(crate::api::check_ins::router())
        .merge(crate::api::groups::router())
        .merge(crate::api::hotels::router())
        .merge(crate::api::spots::router())
        .merge(crate::api::itineraries::router())
        .merge(crate::api::ledger::router())
        // Outbound proxies
        .merge(crate::api::messaging::router())
        .merge(crate::api::flights::router())
        .merge(crate::api::tts::router())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for sharing with tests/tools)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        // Start background tasks
        state.start_background_tasks().await;

        // Start message bus TCP server (LAN check-in boards)
        let bus = state.bus().clone();
        tokio::spawn(async move {
            if let Err(e) = bus.start_tcp_server().await {
                tracing::error!("Message bus TCP server failed: {}", e);
            }
        });

        let app = build_app()
            .with_state(state.clone())
            // Tower HTTP 中介層
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            // HTTP 請求日誌中介層
            .layer(middleware::from_fn(log_request));

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Tour server listening on {}", addr);

        let handle = axum_server::Handle::new();

        // ctrl_c → graceful shutdown（同時收掉訊息匯流排）
        let handle_clone = handle.clone();
        let shutdown_timeout = std::time::Duration::from_millis(self.config.shutdown_timeout_ms);
        let bus_for_shutdown = state.bus().clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            bus_for_shutdown.shutdown();
            handle_clone.graceful_shutdown(Some(shutdown_timeout));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Internal(e.into()))?;

        Ok(())
    }
}
