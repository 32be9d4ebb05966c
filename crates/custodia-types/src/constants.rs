//! System-wide constants for the Custodia wallet ledger.

/// Amounts strictly above the large-transaction limit require manual
/// approval; the limit itself auto-settles. Unscaled units of the wallet
/// currency (see [`crate::LedgerConfig`] for the `Decimal` form).
pub const DEFAULT_LARGE_TRANSACTION_LIMIT: u64 = 1000;

/// Total attempts the retry guard makes per operation
/// (1 initial + 2 retries).
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 3;

/// Fixed backoff between retry attempts, in milliseconds.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 100;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Custodia";
