//! The account registry: one JSON document holding every account record.

use crate::checked_name;
use crate::error::{StoreError, StoreResult};
use aviary_core::account::{AccountMap, AccountRecord};
use aviary_core::lease;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Flat-file store for account records.
///
/// Every operation performs a full read-modify-write cycle against the
/// backing document; no state is cached across calls. Mutations (and the
/// persist that a reconciled load may trigger) are serialized through an
/// in-process mutex held across the whole load→mutate→persist section, so
/// two concurrent claims within one process cannot both observe a Free
/// account and both win. Writers in *other* processes sharing the same file
/// remain last-write-wins.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store backed by `path`. The file is created lazily on the
    /// first persist; a missing file reads as an empty registry.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records as stored, without reconciliation.
    ///
    /// A missing or unreadable file yields an empty map; the anomaly is
    /// logged but never surfaced to the caller.
    pub async fn load(&self) -> AccountMap {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<AccountMap>(&bytes) {
                Ok(accounts) => accounts,
                Err(error) => {
                    tracing::error!(path = %self.path.display(), %error, "corrupt account file, treating as empty");
                    AccountMap::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "account file does not exist yet");
                AccountMap::new()
            }
            Err(error) => {
                tracing::error!(path = %self.path.display(), %error, "failed to read account file, treating as empty");
                AccountMap::new()
            }
        }
    }

    /// Load all records with backfill and the lease expiry sweep applied,
    /// persisting first if the sweep changed anything.
    ///
    /// Every account read in the service goes through this method; the
    /// read-time sweep is the only mechanism bounding lease lifetime.
    pub async fn load_reconciled(&self) -> AccountMap {
        let _guard = self.write_lock.lock().await;
        self.load_reconciled_locked().await
    }

    /// Durably overwrite the backing document with `accounts`.
    pub async fn persist(&self, accounts: &AccountMap) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.persist_locked(accounts).await
    }

    /// Names of all registered accounts.
    pub async fn account_names(&self) -> Vec<String> {
        self.load_reconciled().await.into_keys().collect()
    }

    /// Fetch a single account record.
    pub async fn get_account(&self, name: &str) -> StoreResult<AccountRecord> {
        self.load_reconciled()
            .await
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Insert or overwrite an account with the given credential, an empty
    /// profile cache, and no lease.
    pub async fn upsert_account(&self, name: &str, token: &str) -> StoreResult<()> {
        checked_name(name)?;
        let _guard = self.write_lock.lock().await;
        let mut accounts = self.load_reconciled_locked().await;
        accounts.insert(name.to_string(), AccountRecord::new(token));
        self.persist_locked(&accounts).await
    }

    /// Replace the cached profile list for an existing account.
    ///
    /// A missing account is a warned no-op: the profile cache is advisory
    /// and refreshes race with registration.
    pub async fn set_profiles(&self, name: &str, profiles: Vec<String>) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut accounts = self.load_reconciled_locked().await;
        match accounts.get_mut(name) {
            Some(record) => {
                record.profiles = profiles;
                self.persist_locked(&accounts).await?;
                tracing::info!(account = %name, "updated profile cache");
                Ok(())
            }
            None => {
                tracing::warn!(account = %name, "ignoring profile update for unknown account");
                Ok(())
            }
        }
    }

    /// Claim the lease on `name` for `holder`.
    ///
    /// Fails with [`StoreError::LeaseHeld`] when a different holder owns the
    /// lease; a re-claim by the same holder succeeds and refreshes the
    /// acquisition timestamp.
    pub async fn claim(&self, name: &str, holder: &str) -> StoreResult<()> {
        if holder.is_empty() {
            return Err(StoreError::MissingHolder);
        }

        let _guard = self.write_lock.lock().await;
        let mut accounts = self.load_reconciled_locked().await;
        let record = accounts
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        lease::try_claim(record, holder, OffsetDateTime::now_utc()).map_err(|conflict| {
            StoreError::LeaseHeld {
                account: name.to_string(),
                holder: conflict.holder,
            }
        })?;

        self.persist_locked(&accounts).await?;
        tracing::info!(account = %name, holder = %holder, "lease claimed");
        Ok(())
    }

    /// Release the lease on `name` unconditionally, returning the previous
    /// holder if there was one.
    pub async fn release(&self, name: &str) -> StoreResult<Option<String>> {
        let _guard = self.write_lock.lock().await;
        let mut accounts = self.load_reconciled_locked().await;
        let record = accounts
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        let previous = lease::release(record);
        self.persist_locked(&accounts).await?;
        tracing::info!(account = %name, previous_holder = ?previous, "lease released");
        Ok(previous)
    }

    /// Reconciled load assuming the write lock is already held.
    async fn load_reconciled_locked(&self) -> AccountMap {
        let mut accounts = self.load().await;
        if lease::reconcile(OffsetDateTime::now_utc(), &mut accounts) {
            // A failed persist here leaves stale leases in the file; they
            // will be swept again on the next read.
            if let Err(error) = self.persist_locked(&accounts).await {
                tracing::error!(%error, "failed to persist reconciled accounts");
            }
        }
        accounts
    }

    /// Atomic persist assuming the write lock is already held: write a temp
    /// file alongside the target, fsync, rename.
    async fn persist_locked(&self, accounts: &AccountMap) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec_pretty(accounts)?;
        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(path = %self.path.display(), accounts = accounts.len(), "persisted account registry");
        Ok(())
    }
}
