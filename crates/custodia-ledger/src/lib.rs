//! # custodia-ledger
//!
//! The settlement engine of the Custodia wallet ledger.
//!
//! ## Operations
//!
//! - **deposit** — credit the ledger total; amounts at or below the
//!   large-transaction limit also credit the usable balance and settle
//!   immediately, larger amounts wait `PENDING` for a manual decision.
//! - **withdraw** — reserve against the usable balance; small amounts also
//!   debit the ledger total and settle immediately, large ones wait.
//! - **approve** — finalize a `PENDING` transaction: apply (or reverse) the
//!   deferred half of the mutation and move the status to its terminal state.
//!
//! ## Concurrency
//!
//! Every operation runs its whole read-mutate-save cycle inside the
//! [`retry`] guard. The store rejects a save against a stale wallet version;
//! the guard re-reads, re-validates, and re-applies from scratch, up to a
//! bounded attempt count with a fixed backoff. Exactly one writer wins per
//! conflict round, so racing mutations can never double-spend a balance.

pub mod retry;
pub mod settlement;

pub use retry::with_retry;
pub use settlement::{
    Decision, DepositRequest, SettlementEngine, SettlementReceipt, WithdrawRequest,
};
