//! Lease (adoption) semantics over account records.
//!
//! The lease state machine has two states per account: Free
//! (`adopted == false`) and Held (`adopted == true` with holder and
//! timestamp). Expiry is lazy: there is no background sweeper, so a lease
//! only has a hard upper bound because every read path runs [`reconcile`]
//! before returning records to a caller.
//!
//! All functions here are pure over in-memory records; persistence and
//! locking live in the store layer.

use crate::account::{AccountMap, AccountRecord};
use time::{Duration, OffsetDateTime};

/// How long an unreleased lease stays valid before the next reconciled load
/// forcibly frees it.
pub const UNLOCK_TIMEOUT: Duration = Duration::minutes(5);

/// A claim was refused because another holder currently owns the lease.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeldByOther {
    /// The holder the lease currently belongs to.
    pub holder: String,
}

/// Normalize and expire account records in place, returning whether anything
/// changed (and therefore needs persisting).
///
/// Two passes per record:
/// - coherence backfill: an unleased record must not carry holder fields;
/// - expiry sweep: a lease held longer than [`UNLOCK_TIMEOUT`] is reset to
///   Free, with a warning naming the previous holder.
///
/// A held record with no parseable `adopted_at` cannot expire; it is logged
/// and left alone rather than guessed at.
pub fn reconcile(now: OffsetDateTime, accounts: &mut AccountMap) -> bool {
    let mut changed = false;

    for (name, record) in accounts.iter_mut() {
        if !record.adopted && (record.adopted_by.is_some() || record.adopted_at.is_some()) {
            record.adopted_by = None;
            record.adopted_at = None;
            changed = true;
        }

        match (record.adopted, record.adopted_at) {
            (true, Some(since)) if now - since > UNLOCK_TIMEOUT => {
                tracing::warn!(
                    account = %name,
                    holder = ?record.adopted_by,
                    adopted_at = %since,
                    "auto-releasing lease past unlock timeout"
                );
                record.clear_adoption();
                changed = true;
            }
            (true, None) => {
                tracing::warn!(
                    account = %name,
                    "held record has no adoption timestamp; lease cannot expire"
                );
            }
            _ => {}
        }
    }

    changed
}

/// Attempt to claim `record` for `holder` as of `now`.
///
/// Succeeds when the record is Free, or already held by the same holder
/// (re-claim refreshes the acquisition timestamp). Fails when a different
/// holder owns the lease. Holder validation (non-empty) is the caller's
/// responsibility.
pub fn try_claim(
    record: &mut AccountRecord,
    holder: &str,
    now: OffsetDateTime,
) -> Result<(), HeldByOther> {
    if record.adopted {
        if let Some(current) = record.adopted_by.as_deref() {
            if current != holder {
                return Err(HeldByOther {
                    holder: current.to_string(),
                });
            }
        }
    }
    record.set_adoption(holder, now);
    Ok(())
}

/// Release the lease on `record` unconditionally, returning the previous
/// holder if there was one.
///
/// Release is not holder-checked: any caller may free any lease. Callers
/// that need a handover audit trail use the returned holder.
pub fn release(record: &mut AccountRecord) -> Option<String> {
    let previous = record.adopted_by.take();
    record.clear_adoption();
    previous
}
