//! Durable storage for the aviary account registry.
//!
//! Two stores, both flat files under the configured data directory:
//! - [`JsonFileStore`]: every account record in one JSON document, with the
//!   lease reconciliation pass applied on every read;
//! - [`StatsStore`]: one opaque JSON stats document per account.

pub mod accounts;
pub mod error;
pub mod stats;

pub use accounts::JsonFileStore;
pub use error::{StoreError, StoreResult};
pub use stats::StatsStore;

/// Validate an account name before it is used as (part of) a file name.
///
/// Names arrive from URL path segments, which excludes `/` but not `..` or
/// backslashes; rejecting those keeps derived paths inside the data
/// directory.
pub(crate) fn checked_name(name: &str) -> StoreResult<&str> {
    if name.is_empty() {
        return Err(StoreError::InvalidName("empty account name".to_string()));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(StoreError::InvalidName(format!(
            "path traversal not allowed: {name}"
        )));
    }
    Ok(name)
}
