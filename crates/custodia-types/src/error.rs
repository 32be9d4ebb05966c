//! Error types for the Custodia wallet ledger.
//!
//! All errors use the `CU_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Wallet errors
//! - 2xx: Transaction errors
//! - 3xx: Amount / balance errors
//! - 4xx: Concurrency errors
//! - 9xx: General / internal errors
//!
//! Callers branch on error values, not on caught exceptions. The coarse
//! [`ErrorKind`] classification tells an embedding layer how to surface a
//! failure (missing resource, bad input, or business-rule conflict);
//! [`CustodiaError::is_transient`] tells the retry guard what it may rerun.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{TransactionId, WalletId};

/// Central error enum for all Custodia operations.
#[derive(Debug, Error)]
pub enum CustodiaError {
    // =================================================================
    // Wallet Errors (1xx)
    // =================================================================
    /// The requested wallet does not exist in the store.
    #[error("CU_ERR_100: Wallet not found: {0}")]
    WalletNotFound(WalletId),

    /// The wallet is not active for withdrawals.
    #[error("CU_ERR_101: Wallet is not active: {0}")]
    WalletInactive(WalletId),

    // =================================================================
    // Transaction Errors (2xx)
    // =================================================================
    /// The requested transaction does not exist in the store.
    #[error("CU_ERR_200: Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// The transaction already left the PENDING state; approval and denial
    /// are terminal and happen exactly once.
    #[error("CU_ERR_201: Transaction processed already: {0}")]
    TransactionAlreadyProcessed(TransactionId),

    // =================================================================
    // Amount / Balance Errors (3xx)
    // =================================================================
    /// A deposit or withdrawal was requested with a non-positive amount.
    #[error("CU_ERR_300: Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// Not enough total balance to perform the operation.
    #[error("CU_ERR_301: Balance is not sufficient: need {needed}, have {balance}")]
    InsufficientBalance { needed: Decimal, balance: Decimal },

    /// Not enough usable (unreserved) balance to perform the operation.
    #[error("CU_ERR_302: Usable balance is not sufficient: need {needed}, have {usable}")]
    InsufficientUsableBalance { needed: Decimal, usable: Decimal },

    // =================================================================
    // Concurrency Errors (4xx)
    // =================================================================
    /// The wallet row changed between load and save. Transient: the retry
    /// guard reruns the whole read-mutate-save cycle on this error and
    /// nothing else does.
    #[error("CU_ERR_400: Version conflict on {wallet_id}: expected version {expected_version}")]
    VersionConflict {
        wallet_id: WalletId,
        expected_version: u64,
    },

    /// The retry guard exhausted its attempts without winning a conflict
    /// round. Surfaced to the caller as a conflict; the request may be
    /// retried from the outside.
    #[error("CU_ERR_401: Concurrent modification on {0}, retry the request")]
    ConcurrentModification(WalletId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CU_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CustodiaError>;

/// Coarse classification of an error, for embedding layers that map
/// failures onto a transport surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced wallet or transaction does not resolve.
    NotFound,
    /// The input itself was invalid (non-positive amount).
    BadRequest,
    /// A business rule rejected the operation against current state.
    Conflict,
    /// Nothing the caller did wrong; an internal failure.
    Internal,
}

impl CustodiaError {
    /// Classify this error for the embedding layer.
    ///
    /// `VersionConflict` classifies as [`ErrorKind::Conflict`]: it should
    /// never escape the retry guard, but if one does leak it is still a
    /// concurrency conflict from the caller's point of view.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WalletNotFound(_) | Self::TransactionNotFound(_) => ErrorKind::NotFound,
            Self::NonPositiveAmount(_) => ErrorKind::BadRequest,
            Self::WalletInactive(_)
            | Self::TransactionAlreadyProcessed(_)
            | Self::InsufficientBalance { .. }
            | Self::InsufficientUsableBalance { .. }
            | Self::VersionConflict { .. }
            | Self::ConcurrentModification(_) => ErrorKind::Conflict,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the retry guard may rerun the operation on this error.
    ///
    /// Only a stale-version save qualifies. Every other kind is a
    /// deterministic outcome of the input and must surface immediately.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = CustodiaError::WalletNotFound(WalletId::new());
        let msg = format!("{err}");
        assert!(msg.starts_with("CU_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn insufficient_usable_balance_display() {
        let err = CustodiaError::InsufficientUsableBalance {
            needed: Decimal::new(1200, 0),
            usable: Decimal::new(600, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("CU_ERR_302"));
        assert!(msg.contains("1200"));
        assert!(msg.contains("600"));
    }

    #[test]
    fn all_errors_have_cu_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(CustodiaError::WalletInactive(WalletId::new())),
            Box::new(CustodiaError::TransactionAlreadyProcessed(TransactionId::new())),
            Box::new(CustodiaError::NonPositiveAmount(Decimal::ZERO)),
            Box::new(CustodiaError::ConcurrentModification(WalletId::new())),
            Box::new(CustodiaError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("CU_ERR_"),
                "Error missing CU_ERR_ prefix: {msg}"
            );
        }
    }

    #[test]
    fn kind_classification() {
        assert_eq!(
            CustodiaError::WalletNotFound(WalletId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CustodiaError::NonPositiveAmount(Decimal::NEGATIVE_ONE).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            CustodiaError::WalletInactive(WalletId::new()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            CustodiaError::ConcurrentModification(WalletId::new()).kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn only_version_conflict_is_transient() {
        let transient = CustodiaError::VersionConflict {
            wallet_id: WalletId::new(),
            expected_version: 3,
        };
        assert!(transient.is_transient());

        assert!(!CustodiaError::WalletNotFound(WalletId::new()).is_transient());
        assert!(!CustodiaError::ConcurrentModification(WalletId::new()).is_transient());
        assert!(
            !CustodiaError::InsufficientUsableBalance {
                needed: Decimal::ONE,
                usable: Decimal::ZERO,
            }
            .is_transient()
        );
    }
}
