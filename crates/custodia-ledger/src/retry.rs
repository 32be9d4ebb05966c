//! Optimistic-concurrency retry guard.
//!
//! Wallet mutations are not commutative under interleaving: two concurrent
//! withdrawals must not both pass an insufficiency check against a stale
//! balance. The store therefore rejects a save whose expected version is
//! stale, and this guard reruns the whole read-mutate-save cycle from a
//! fresh load — an explicit bounded loop with a fixed backoff, nothing
//! declarative about it.
//!
//! Only `VersionConflict` is retried. Every other error is a deterministic
//! outcome of the input and passes through on first occurrence. When the
//! attempt budget is exhausted the conflict surfaces as
//! `ConcurrentModification`, never silently dropped.

use std::thread;

use custodia_types::{CustodiaError, LedgerConfig, Result};

/// Run `cycle` until it succeeds, fails deterministically, or exhausts
/// `config.max_retry_attempts` (total attempts, initial one included).
///
/// The closure must perform the *entire* cycle — load, validate, mutate,
/// save — so each attempt observes fresh state.
///
/// # Errors
/// Propagates the closure's deterministic errors unchanged; maps an
/// unresolved `VersionConflict` to `ConcurrentModification` once the
/// attempt budget is spent.
pub fn with_retry<T, F>(config: &LedgerConfig, op: &'static str, mut cycle: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut attempt: u32 = 1;
    loop {
        match cycle() {
            Ok(value) => return Ok(value),
            Err(CustodiaError::VersionConflict {
                wallet_id,
                expected_version,
            }) => {
                if attempt >= config.max_retry_attempts {
                    tracing::warn!(
                        op,
                        wallet = %wallet_id,
                        attempts = attempt,
                        "Retry attempts exhausted, surfacing conflict"
                    );
                    return Err(CustodiaError::ConcurrentModification(wallet_id));
                }
                tracing::warn!(
                    op,
                    wallet = %wallet_id,
                    attempt,
                    expected_version,
                    backoff_ms = config.retry_backoff_ms,
                    "Version conflict, retrying from fresh load"
                );
                thread::sleep(config.retry_backoff());
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
