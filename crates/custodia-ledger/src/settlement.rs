//! Settlement engine — deposit, withdraw, and the approval decision.
//!
//! The engine owns the business rules of §two-phase settlement: it loads a
//! wallet through the store, composes the wallet's guarded mutation
//! primitives, records the movement as a [`Transaction`], and commits both
//! atomically. A version conflict on commit sends the whole cycle back
//! through the retry guard.
//!
//! Settlement policy:
//!
//! | amount vs limit | deposit                         | withdraw                        |
//! |-----------------|---------------------------------|---------------------------------|
//! | `<=` limit      | balance+, usable+, `APPROVED`   | usable-, balance-, `APPROVED`   |
//! | `>` limit       | balance+, `PENDING`             | usable- (reserve), `PENDING`    |
//!
//! A pending deposit holds the credited amount outside the usable balance;
//! a pending withdrawal keeps the reserved amount inside the ledger total.
//! The approval decision then applies or reverses the deferred half.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use custodia_store::WalletStore;
use custodia_types::{
    CounterpartyKind, CustodiaError, LedgerConfig, Result, Transaction, TransactionId,
    TransactionKind, TransactionStatus, Wallet, WalletId,
};

use crate::retry::with_retry;

/// Manual approval decision for a `PENDING` transaction.
///
/// A dedicated two-variant enum: the terminal states are the only valid
/// decisions, so "decide pending" is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Approve,
    Deny,
}

/// A deposit order for the settlement engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Target wallet.
    pub wallet_id: WalletId,
    /// Amount to credit. Must be strictly positive.
    pub amount: Decimal,
    /// Channel the funds arrive from.
    pub source: CounterpartyKind,
    /// Free-form counterparty description.
    pub counterparty: String,
}

/// A withdrawal order for the settlement engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    /// Source wallet.
    pub wallet_id: WalletId,
    /// Amount to debit. Must be strictly positive.
    pub amount: Decimal,
    /// Channel the funds leave through.
    pub destination: CounterpartyKind,
    /// Free-form counterparty description.
    pub counterparty: String,
}

/// Outcome of a successful settlement operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    /// The transaction created or finalized by the operation.
    pub transaction_id: TransactionId,
    /// The wallet the transaction belongs to.
    pub wallet_id: WalletId,
    /// Status after the operation (`PENDING` means a decision is awaited).
    pub status: TransactionStatus,
    /// Committed ledger total after the operation.
    pub balance: Decimal,
    /// Committed usable balance after the operation.
    pub usable_balance: Decimal,
}

impl SettlementReceipt {
    fn for_committed(wallet: &Wallet, transaction: &Transaction) -> Self {
        Self {
            transaction_id: transaction.id,
            wallet_id: wallet.id,
            status: transaction.status,
            balance: wallet.balance,
            usable_balance: wallet.usable_balance,
        }
    }
}

/// The settlement engine. Stateless apart from its store handle and policy;
/// the wallet row's version is the only concurrency token it relies on.
pub struct SettlementEngine<S: WalletStore> {
    store: S,
    config: LedgerConfig,
}

impl<S: WalletStore> SettlementEngine<S> {
    /// Create an engine with the default policy
    /// (limit 1000, 3 attempts, 100ms backoff).
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    /// Create an engine with a custom policy.
    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// The store this engine commits through.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active policy.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Credit a wallet.
    ///
    /// The ledger total is increased unconditionally. At or below the
    /// large-transaction limit the usable balance follows and the
    /// transaction settles `APPROVED`; above it the credit stays
    /// unavailable until an [`approve`](Self::approve) decision.
    ///
    /// # Errors
    /// `WalletNotFound`, `NonPositiveAmount`, or `ConcurrentModification`
    /// if the retry budget is spent.
    pub fn deposit(&self, request: &DepositRequest) -> Result<SettlementReceipt> {
        with_retry(&self.config, "deposit", || self.deposit_cycle(request))
    }

    fn deposit_cycle(&self, request: &DepositRequest) -> Result<SettlementReceipt> {
        let mut wallet = self.store.load_wallet_for_update(request.wallet_id)?;
        if request.amount <= Decimal::ZERO {
            return Err(CustodiaError::NonPositiveAmount(request.amount));
        }

        let expected_version = wallet.version;
        wallet.increase_balance(request.amount);

        let status = if request.amount > self.config.large_transaction_limit {
            TransactionStatus::Pending
        } else {
            wallet.increase_usable_balance(request.amount);
            TransactionStatus::Approved
        };

        let transaction = Transaction::new(
            wallet.id,
            request.amount,
            TransactionKind::Deposit,
            request.source,
            request.counterparty.clone(),
            status,
        );

        self.store.save(&wallet, &transaction, expected_version)?;

        tracing::info!(
            wallet = %wallet.id,
            transaction = %transaction.id,
            amount = %request.amount,
            status = %status,
            balance = %wallet.balance,
            usable = %wallet.usable_balance,
            "Deposit settled"
        );
        Ok(SettlementReceipt::for_committed(&wallet, &transaction))
    }

    /// Debit a wallet.
    ///
    /// The amount is reserved against the usable balance unconditionally.
    /// At or below the large-transaction limit the ledger total follows and
    /// the transaction settles `APPROVED`; above it the reservation holds
    /// until an [`approve`](Self::approve) decision.
    ///
    /// Requires both activity flags on the wallet (inherited gating; see
    /// [`Wallet::is_withdraw_active`]).
    ///
    /// # Errors
    /// `WalletNotFound`, `NonPositiveAmount`, `WalletInactive`,
    /// `InsufficientUsableBalance`, or `ConcurrentModification` if the
    /// retry budget is spent.
    pub fn withdraw(&self, request: &WithdrawRequest) -> Result<SettlementReceipt> {
        with_retry(&self.config, "withdraw", || self.withdraw_cycle(request))
    }

    fn withdraw_cycle(&self, request: &WithdrawRequest) -> Result<SettlementReceipt> {
        let mut wallet = self.store.load_wallet_for_update(request.wallet_id)?;
        if request.amount <= Decimal::ZERO {
            return Err(CustodiaError::NonPositiveAmount(request.amount));
        }
        if !wallet.is_withdraw_active() {
            return Err(CustodiaError::WalletInactive(wallet.id));
        }

        let expected_version = wallet.version;

        // Reserve first: a pending withdrawal must never leave the amount
        // spendable by anyone else.
        wallet.decrease_usable_balance(request.amount)?;

        let status = if request.amount > self.config.large_transaction_limit {
            TransactionStatus::Pending
        } else {
            wallet.decrease_balance(request.amount)?;
            TransactionStatus::Approved
        };

        let transaction = Transaction::new(
            wallet.id,
            request.amount,
            TransactionKind::Withdraw,
            request.destination,
            request.counterparty.clone(),
            status,
        );

        self.store.save(&wallet, &transaction, expected_version)?;

        tracing::info!(
            wallet = %wallet.id,
            transaction = %transaction.id,
            amount = %request.amount,
            status = %status,
            balance = %wallet.balance,
            usable = %wallet.usable_balance,
            "Withdrawal settled"
        );
        Ok(SettlementReceipt::for_committed(&wallet, &transaction))
    }

    /// Finalize a `PENDING` transaction.
    ///
    /// Resolution table:
    ///
    /// | kind     | decision | wallet effect            | final status |
    /// |----------|----------|--------------------------|--------------|
    /// | Deposit  | Approve  | usable balance +amount   | `APPROVED`   |
    /// | Deposit  | Deny     | balance -amount          | `DENIED`     |
    /// | Withdraw | Approve  | balance -amount          | `APPROVED`   |
    /// | Withdraw | Deny     | usable balance +amount   | `DENIED`     |
    ///
    /// A denial reverses exactly what the creation deferred: the denied
    /// deposit gives back its ledger credit, the denied withdrawal refunds
    /// its reservation.
    ///
    /// # Errors
    /// `TransactionNotFound`, `WalletNotFound`,
    /// `TransactionAlreadyProcessed` if the status is already terminal, or
    /// `ConcurrentModification` if the retry budget is spent.
    pub fn approve(
        &self,
        transaction_id: TransactionId,
        decision: Decision,
    ) -> Result<SettlementReceipt> {
        with_retry(&self.config, "approve", || {
            self.approve_cycle(transaction_id, decision)
        })
    }

    fn approve_cycle(
        &self,
        transaction_id: TransactionId,
        decision: Decision,
    ) -> Result<SettlementReceipt> {
        let mut transaction = self.store.load_transaction(transaction_id)?;
        let mut wallet = self.store.load_wallet_for_update(transaction.wallet_id)?;

        if !transaction.status.is_pending() {
            return Err(CustodiaError::TransactionAlreadyProcessed(transaction_id));
        }

        let expected_version = wallet.version;

        match (transaction.kind, decision) {
            (TransactionKind::Deposit, Decision::Approve) => {
                wallet.increase_usable_balance(transaction.amount);
            }
            (TransactionKind::Deposit, Decision::Deny) => {
                wallet.decrease_balance(transaction.amount)?;
            }
            (TransactionKind::Withdraw, Decision::Approve) => {
                wallet.decrease_balance(transaction.amount)?;
            }
            (TransactionKind::Withdraw, Decision::Deny) => {
                wallet.increase_usable_balance(transaction.amount);
            }
        }

        transaction.status = match decision {
            Decision::Approve => TransactionStatus::Approved,
            Decision::Deny => TransactionStatus::Denied,
        };

        self.store.save(&wallet, &transaction, expected_version)?;

        tracing::info!(
            wallet = %wallet.id,
            transaction = %transaction.id,
            kind = %transaction.kind,
            status = %transaction.status,
            balance = %wallet.balance,
            usable = %wallet.usable_balance,
            "Pending transaction finalized"
        );
        Ok(SettlementReceipt::for_committed(&wallet, &transaction))
    }
}
