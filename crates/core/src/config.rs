//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Data directory layout.
    #[serde(default)]
    pub data: DataConfig,
    /// Remote provider API settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    /// Create a test configuration rooted at the given data directory, with
    /// the upstream pointed at an address nothing listens on so tests that
    /// never stub the provider fail fast instead of calling out.
    ///
    /// **For testing only.**
    pub fn for_testing(data_dir: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig {
                dir: data_dir.to_path_buf(),
            },
            upstream: UpstreamConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_secs: 2,
            },
        }
    }
}

/// HTTP server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Data directory configuration.
///
/// The layout under the data directory is fixed: one JSON document holding
/// every account record, and one stats document per account under
/// `profile_stats/`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root directory for persisted state.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

impl DataConfig {
    /// Path of the account registry document.
    pub fn accounts_file(&self) -> PathBuf {
        self.dir.join("accounts.json")
    }

    /// Directory holding per-account profile stats documents.
    pub fn stats_dir(&self) -> PathBuf {
        self.dir.join("profile_stats")
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

/// Remote provider API configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the provider's profile API.
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_upstream_base_url() -> String {
    "https://api.gologin.com/browser/v2".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.data.dir, PathBuf::from("data"));
        assert_eq!(config.upstream.timeout_secs, 15);
    }

    #[test]
    fn data_paths_derive_from_dir() {
        let data = DataConfig {
            dir: PathBuf::from("/var/lib/aviary"),
        };
        assert_eq!(
            data.accounts_file(),
            PathBuf::from("/var/lib/aviary/accounts.json")
        );
        assert_eq!(
            data.stats_dir(),
            PathBuf::from("/var/lib/aviary/profile_stats")
        );
    }
}
