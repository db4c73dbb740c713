// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vouch serve` command implementation.
//!
//! Wires the four long-running pieces together: the SQLite session store,
//! the Telegram dispatcher, the expiry sweeper, and the inbound HTTP
//! gateway. Supports graceful shutdown via signal handlers.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use vouch_config::model::VouchConfig;
use vouch_core::VouchError;
use vouch_engine::{DecisionEngine, Sweeper};
use vouch_gateway::{GatewayState, ServerConfig};
use vouch_notify::HttpNotifier;
use vouch_storage::Database;
use vouch_telegram::{spawn_dispatcher, TelegramReviewer};

use crate::shutdown;

/// Runs the `vouch serve` command.
pub async fn run_serve(config: VouchConfig) -> Result<(), VouchError> {
    init_tracing(&config.service.log_level);

    info!(service = config.service.name.as_str(), "starting vouch serve");

    let db = Database::open(&config.storage.database_path).await?;
    info!(path = config.storage.database_path.as_str(), "session store ready");

    let notifier = Arc::new(HttpNotifier::new()?);
    let engine = DecisionEngine::new(db.clone(), notifier);

    let telegram = TelegramReviewer::new(&config.telegram).map_err(|e| {
        error!(error = %e, "failed to initialize Telegram channel");
        eprintln!("error: Telegram bot token required. Set telegram.bot_token or VOUCH_TELEGRAM_BOT_TOKEN.");
        e
    })?;

    let cancel = shutdown::install_signal_handler();

    // Expiry sweeper.
    {
        let sweeper = Sweeper::new(engine.clone(), config.review.ttl_secs);
        let sweep_cancel = cancel.clone();
        let interval = Duration::from_secs(config.review.sweep_interval_secs);
        tokio::spawn(async move {
            sweeper.run(interval, sweep_cancel).await;
        });
        info!(
            ttl_secs = config.review.ttl_secs,
            sweep_interval_secs = config.review.sweep_interval_secs,
            "expiry sweeper started"
        );
    }

    // Telegram long polling.
    let dispatcher = spawn_dispatcher(
        telegram.bot().clone(),
        engine.clone(),
        config.telegram.allowed_users.clone(),
    );

    // Inbound HTTP gateway, until a shutdown signal arrives.
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    let state = GatewayState {
        engine,
        channel: Arc::new(telegram),
    };

    tokio::select! {
        result = vouch_gateway::start_server(&server_config, state) => {
            error!("gateway exited unexpectedly");
            result?;
        }
        _ = cancel.cancelled() => {
            info!("shutdown signal received");
        }
    }

    dispatcher.abort();
    db.close().await?;

    info!("vouch serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vouch={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
