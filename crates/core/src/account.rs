//! Account records and their persisted representation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// All registered accounts, keyed by case-sensitive account name.
///
/// A `BTreeMap` keeps the persisted JSON document in a stable order so
/// repeated saves produce identical files for identical state.
pub type AccountMap = BTreeMap<String, AccountRecord>;

/// A single registered account for the browser-automation provider.
///
/// The adoption fields track the lease state: `adopted == false` implies
/// `adopted_by` and `adopted_at` are both `None`. Records written by older
/// deployments may lack the adoption fields entirely; the `#[serde(default)]`
/// attributes backfill them to the unleased defaults on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Opaque API credential for the remote provider.
    pub token: String,
    /// Cached profile identifiers, refreshed explicitly; may be stale.
    #[serde(default)]
    pub profiles: Vec<String>,
    /// Whether the account is currently leased to a worker.
    #[serde(default)]
    pub adopted: bool,
    /// Identifier of the current lease holder (e.g. a VPS instance name).
    #[serde(default)]
    pub adopted_by: Option<String>,
    /// When the current lease was acquired.
    #[serde(default, with = "lenient_rfc3339")]
    pub adopted_at: Option<OffsetDateTime>,
}

impl AccountRecord {
    /// Create a fresh, unleased record with an empty profile cache.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            profiles: Vec::new(),
            adopted: false,
            adopted_by: None,
            adopted_at: None,
        }
    }

    /// Reset the record to the unleased state.
    pub fn clear_adoption(&mut self) {
        self.adopted = false;
        self.adopted_by = None;
        self.adopted_at = None;
    }

    /// Mark the record as leased by `holder` as of `now`.
    pub fn set_adoption(&mut self, holder: impl Into<String>, now: OffsetDateTime) {
        self.adopted = true;
        self.adopted_by = Some(holder.into());
        self.adopted_at = Some(now);
    }
}

/// RFC 3339 (de)serialization for `Option<OffsetDateTime>` that tolerates
/// unparseable stored timestamps instead of failing the whole document.
///
/// A single record with a mangled `adopted_at` must not make the entire
/// account file unreadable; the bad value decodes as `None` and the
/// reconciliation pass warns about the resulting incoherent record.
mod lenient_rfc3339 {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => {
                let formatted = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| OffsetDateTime::parse(&s, &Rfc3339).ok()))
    }
}
