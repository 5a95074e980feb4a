//! revisit-host entry point.
//!
//! Boots the history synchronizer and the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use revisit_core::config::AppConfig;
use revisit_core::history::{ChromeHistoryDb, StaticHistory};
use revisit_core::sync::{HistoryWatcher, SyncOptions};
use revisit_core::{
    Bridge, DomainPolicy, HistorySource, HistorySynchronizer, KeyValueStore, MemoryStore, SqliteStore, SystemClock,
};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::info!(?config, "Starting revisit host on stdio transport");

    let store: Arc<dyn KeyValueStore> = match &config.db_path {
        Some(path) => Arc::new(
            SqliteStore::open(path)
                .await
                .with_context(|| format!("failed to open store at {}", path.display()))?,
        ),
        None => {
            tracing::info!("no db_path configured; domain modes will not persist");
            Arc::new(MemoryStore::default())
        }
    };

    let source: Arc<dyn HistorySource> = match &config.history_path {
        Some(path) => Arc::new(ChromeHistoryDb::new(path)?),
        None => Arc::new(StaticHistory::default()),
    };

    let policy = Arc::new(DomainPolicy::load(store, config.max_loose_domains).await);
    tracing::info!(loose_domains = ?policy.loose_domains(), "domain modes loaded");

    let sync = Arc::new(HistorySynchronizer::new(
        source,
        Arc::new(SystemClock),
        policy.clone(),
        SyncOptions::from(&config),
    ));

    // without a watch the cache only refreshes on external_change calls
    let _watcher = match &config.history_path {
        Some(path) => match HistoryWatcher::spawn(path, sync.clone()) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                tracing::warn!(error = %err, "history file watch unavailable");
                None
            }
        },
        None => None,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sync_task = {
        let sync = sync.clone();
        let interval = config.update_interval();
        tokio::spawn(async move { sync.run(interval, shutdown_rx).await })
    };

    let handler = handler::RevisitServer::new(Arc::new(Bridge::new(sync, policy)));
    let server = serve_server(handler, stdio()).await?;
    let reason = server.waiting().await?;
    tracing::info!(?reason, "transport closed");

    let _ = shutdown_tx.send(true);
    sync_task.await?;

    Ok(())
}
