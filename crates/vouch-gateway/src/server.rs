// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use vouch_core::traits::ReviewerChannel;
use vouch_core::VouchError;
use vouch_engine::DecisionEngine;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: DecisionEngine,
    pub channel: Arc<dyn ReviewerChannel>,
}

/// Gateway server configuration (mirrors GatewayConfig from vouch-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Start the gateway HTTP server.
///
/// Routes:
/// - POST /send-to-client: open a review session
/// - GET /health: liveness probe
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), VouchError> {
    let app = Router::new()
        .route("/send-to-client", post(handlers::post_send_to_client))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VouchError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| VouchError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
