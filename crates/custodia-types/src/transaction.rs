//! Transaction record — a single deposit or withdrawal attempt and its
//! settlement status.
//!
//! State machine: `PENDING -> {APPROVED, DENIED}`, both terminal. A
//! transaction at or below the large-transaction limit is created directly
//! in `APPROVED` (auto-settlement); above it, creation lands in `PENDING`
//! and an explicit approval decision finalizes it exactly once.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{TransactionId, WalletId};

/// Direction of a transaction relative to the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdraw => "WITHDRAW",
        };
        write!(f, "{s}")
    }
}

/// Settlement status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// Awaiting a manual approval decision.
    Pending,
    /// Settled. Terminal.
    Approved,
    /// Rejected and reversed. Terminal.
    Denied,
}

impl TransactionStatus {
    /// Whether a decision is still outstanding.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether no further transition can leave this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Denied)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Denied => "DENIED",
        };
        write!(f, "{s}")
    }
}

/// Channel of the counterparty on the other side of a transaction.
/// Informational only to the ledger core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CounterpartyKind {
    /// A bank account, identified by IBAN.
    Iban,
    /// A payment instrument (e.g., card).
    Payment,
}

impl fmt::Display for CounterpartyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Iban => "IBAN",
            Self::Payment => "PAYMENT",
        };
        write!(f, "{s}")
    }
}

/// Record of a single deposit or withdrawal attempt.
///
/// Created exactly once by the settlement engine; `status` changes exactly
/// once when a pending transaction is approved or denied; every other field
/// is immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier.
    pub id: TransactionId,
    /// The wallet this transaction belongs to.
    pub wallet_id: WalletId,
    /// Transacted amount. Always strictly positive.
    pub amount: Decimal,
    /// Deposit or withdraw.
    pub kind: TransactionKind,
    /// Counterparty channel descriptor.
    pub counterparty_kind: CounterpartyKind,
    /// Free-form counterparty description (e.g., an IBAN string).
    pub counterparty: String,
    /// Settlement status.
    pub status: TransactionStatus,
    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction record for a wallet.
    #[must_use]
    pub fn new(
        wallet_id: WalletId,
        amount: Decimal,
        kind: TransactionKind,
        counterparty_kind: CounterpartyKind,
        counterparty: impl Into<String>,
        status: TransactionStatus,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            wallet_id,
            amount,
            kind,
            counterparty_kind,
            counterparty: counterparty.into(),
            status,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction[{}] {} {} {} ({})",
            self.id, self.kind, self.amount, self.status, self.counterparty_kind,
        )
    }
}
