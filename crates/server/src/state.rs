//! Application state shared across handlers.

use anyhow::{Context, Result};
use aviary_core::config::AppConfig;
use aviary_store::{JsonFileStore, StatsStore};
use aviary_upstream::UpstreamClient;
use std::sync::Arc;

/// Shared application state.
///
/// All handles are explicit: there is no module-level singleton, so tests
/// can build as many independent instances as they need.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Account registry store.
    pub accounts: Arc<JsonFileStore>,
    /// Per-account stats store.
    pub stats: Arc<StatsStore>,
    /// Client for the provider's remote API.
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(config: AppConfig) -> Result<Self> {
        let accounts = Arc::new(JsonFileStore::new(config.data.accounts_file()));
        let stats = Arc::new(StatsStore::new(config.data.stats_dir()));
        let upstream = Arc::new(
            UpstreamClient::new(&config.upstream).context("failed to build upstream client")?,
        );

        Ok(Self {
            config: Arc::new(config),
            accounts,
            stats,
            upstream,
        })
    }
}
