//! Client for the browser-automation provider's remote API.
//!
//! Two read operations are proxied: listing the profiles visible to an
//! account's credential, and probing whether the account has exhausted its
//! free request quota. Both hit the same provider endpoint; the quota state
//! is signalled out-of-band via a marker string in the response body, even
//! on an otherwise successful response.

use aviary_core::config::UpstreamConfig;
use serde_json::Value;
use thiserror::Error;

/// Marker the provider embeds in response bodies once the free request
/// quota is exhausted.
const LIMIT_MARKER: &str = "You have reached your free API requests limit";

/// Upstream operation errors.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("provider rejected the account credential")]
    Unauthorized,

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("network error reaching provider: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected provider response format: {0}")]
    UnexpectedFormat(String),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = std::result::Result<T, UpstreamError>;

/// Outcome of a rate-limit probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimitStatus {
    /// Whether the provider reports the free request quota as exhausted.
    pub limit_reached: bool,
}

/// Client for the provider's profile API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Build a client from configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Fetch the profile identifiers visible to `token`.
    ///
    /// The provider responds with `{"profiles": [{"id": ...}, ...]}`;
    /// entries without an `id` are skipped. Anything else is an
    /// [`UpstreamError::UnexpectedFormat`].
    pub async fn list_profiles(&self, token: &str) -> UpstreamResult<Vec<String>> {
        let response = self
            .http
            .get(&self.base_url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(UpstreamError::Unauthorized);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let profiles = body
            .get("profiles")
            .ok_or_else(|| {
                UpstreamError::UnexpectedFormat("response has no 'profiles' key".to_string())
            })?
            .as_array()
            .ok_or_else(|| {
                UpstreamError::UnexpectedFormat("'profiles' is not an array".to_string())
            })?;

        let ids = profiles
            .iter()
            .filter_map(|profile| profile.get("id"))
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        Ok(ids)
    }

    /// Probe whether `token`'s account has hit the free request quota.
    ///
    /// The marker check runs before any status handling: the provider has
    /// been observed returning the marker on non-success statuses too.
    pub async fn check_limit(&self, token: &str) -> UpstreamResult<LimitStatus> {
        let response = self
            .http
            .get(&self.base_url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if body.contains(LIMIT_MARKER) {
            tracing::warn!("provider reports request quota exhausted");
            return Ok(LimitStatus {
                limit_reached: true,
            });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(UpstreamError::Unauthorized);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        Ok(LimitStatus {
            limit_reached: false,
        })
    }
}
