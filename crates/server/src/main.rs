//! darkroom-sw server entry point.
//!
//! Boots the offline worker against the configured origin and exposes its
//! events as MCP tools on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use darkroom_client::{FetchClient, FetchConfig};
use darkroom_core::config::{AppConfig, Profile};
use darkroom_core::{CacheDb, OfflineWorker, WorkerHandler};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod host;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(origin = %config.origin, profile = ?config.profile, "starting darkroom-sw on stdio transport");

    let cache = CacheDb::open(&config.db_path).await?;
    let fetcher = Arc::new(FetchClient::new(FetchConfig::from(&config))?);
    let worker = OfflineWorker::new(
        config.worker_config(),
        Arc::new(cache.clone()),
        fetcher.clone(),
        Arc::new(host::LogHost),
    );

    if config.profile == Profile::Production {
        register(&worker).await;
    } else {
        tracing::info!("development profile, worker not registered");
    }

    let handler = handler::DarkroomServer::new(worker, cache, fetcher);
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    Ok(())
}

/// Install then activate. Failures are logged and never stop the server.
async fn register(worker: &OfflineWorker) {
    let installed = worker.on_install().await;
    if let Some(error) = &installed.error {
        tracing::warn!(error = %error, "worker installed without pre-cache");
    }

    match worker.on_activate().await {
        Ok(report) => tracing::info!(deleted = ?report.deleted, "worker registered"),
        Err(e) => tracing::error!(error = %e, "worker registration failed"),
    }
}
