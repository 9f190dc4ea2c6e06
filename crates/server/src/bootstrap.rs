//! Startup checks: data directory layout.

use anyhow::{Context, Result};
use aviary_core::config::AppConfig;
use tokio::fs;

/// Create the data directories the stores write into.
///
/// Failing here is unrecoverable: a server that cannot persist accounts
/// must not start.
pub async fn ensure_data_dirs(config: &AppConfig) -> Result<()> {
    fs::create_dir_all(&config.data.dir)
        .await
        .with_context(|| format!("failed to create data dir {}", config.data.dir.display()))?;
    fs::create_dir_all(config.data.stats_dir())
        .await
        .with_context(|| {
            format!(
                "failed to create stats dir {}",
                config.data.stats_dir().display()
            )
        })?;

    tracing::info!(dir = %config.data.dir.display(), "data directories ready");
    Ok(())
}
