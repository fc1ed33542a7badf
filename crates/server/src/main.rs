//! `clash-server`: serves `GET /rounds` over the imported catalog.
use std::sync::Arc;

use anyhow::{Context, Result};
use game_server::{AppState, ServerConfig, router};
use runtime::{AbilityRepository, RoundService, RuntimeConfig, SqliteCatalog};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    let _guard = setup_logging(&config)?;

    let runtime_config = RuntimeConfig::from_env();
    let store = SqliteCatalog::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open {}", config.database_url))?;
    let abilities = AbilityRepository::new(Arc::new(store), runtime_config.cache_ttl);
    let rounds = RoundService::new(Arc::new(abilities), runtime_config.game);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, router(AppState::new(Arc::new(rounds))))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Stderr logging, plus a daily rolling file when `CLASH_LOG_DIR` is set.
///
/// The returned guard flushes the file writer on drop.
fn setup_logging(config: &ServerConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(log_dir) = &config.log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "clash-server.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!(dir = %log_dir.display(), "file logging enabled");
    Ok(Some(guard))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
