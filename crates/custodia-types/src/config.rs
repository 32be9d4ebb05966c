//! Configuration for the settlement engine and its retry guard.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunable policy for the settlement engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Transactions with `amount` strictly above this threshold are created
    /// `PENDING` and require a manual approval decision; amounts at or
    /// below it auto-settle.
    pub large_transaction_limit: Decimal,
    /// Total attempts per operation when version conflicts occur
    /// (initial attempt included).
    pub max_retry_attempts: u32,
    /// Fixed delay between attempts, in milliseconds.
    pub retry_backoff_ms: u64,
}

impl LedgerConfig {
    /// The backoff as a [`Duration`].
    #[must_use]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            large_transaction_limit: Decimal::from(constants::DEFAULT_LARGE_TRANSACTION_LIMIT),
            max_retry_attempts: constants::DEFAULT_MAX_RETRY_ATTEMPTS,
            retry_backoff_ms: constants::DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}
