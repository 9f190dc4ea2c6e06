//! Per-account profile stats documents.
//!
//! Stats are opaque to the service: whatever JSON object a worker reports is
//! stored verbatim, with a `last_updated` timestamp stamped on every save.

use crate::checked_name;
use crate::error::StoreResult;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Store for per-account stats documents, one JSON file per account.
pub struct StatsStore {
    dir: PathBuf,
}

impl StatsStore {
    /// Create a store rooted at `dir`. The directory is created on first
    /// save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stats documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn stats_path(&self, account: &str) -> StoreResult<PathBuf> {
        let name = checked_name(account)?;
        Ok(self.dir.join(format!("{name}_stats.json")))
    }

    /// Save a stats document for `account`, stamping `last_updated`.
    pub async fn save(&self, account: &str, mut stats: Map<String, Value>) -> StoreResult<()> {
        let path = self.stats_path(account)?;
        let now = OffsetDateTime::now_utc().format(&Rfc3339)?;
        stats.insert("last_updated".to_string(), Value::String(now));

        fs::create_dir_all(&self.dir).await?;
        let data = serde_json::to_vec_pretty(&Value::Object(stats))?;
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp_path, &path).await?;

        tracing::info!(account = %account, "saved profile stats");
        Ok(())
    }

    /// Load the stats document for `account`, if one has been saved.
    pub async fn load(&self, account: &str) -> StoreResult<Option<Value>> {
        let path = self.stats_path(account)?;
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Ok(Some(value)),
                Err(error) => {
                    tracing::error!(account = %account, %error, "corrupt stats file");
                    Ok(None)
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}
