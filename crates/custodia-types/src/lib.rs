//! # custodia-types
//!
//! Shared types, errors, and configuration for the **Custodia** wallet ledger.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`WalletId`], [`CustomerId`], [`TransactionId`]
//! - **Wallet model**: [`Wallet`], [`Currency`] — the balance pair and its
//!   guarded mutation primitives
//! - **Transaction model**: [`Transaction`], [`TransactionKind`],
//!   [`TransactionStatus`], [`CounterpartyKind`]
//! - **Configuration**: [`LedgerConfig`] (settlement threshold, retry policy)
//! - **Errors**: [`CustodiaError`] with `CU_ERR_` prefix codes and the
//!   coarse [`ErrorKind`] classification
//! - **Constants**: system-wide defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod transaction;
pub mod wallet;

// Re-export all primary types at crate root for ergonomic imports:
//   use custodia_types::{Wallet, Transaction, TransactionStatus, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use transaction::*;
pub use wallet::*;

// Constants are accessed via `custodia_types::constants::FOO`
// (not re-exported to avoid name collisions).
