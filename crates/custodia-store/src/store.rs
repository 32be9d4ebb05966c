//! The `WalletStore` contract the settlement engine requires.
//!
//! One wallet row is the only shared mutable resource in the system, and
//! its integer `version` is the sole concurrency token. The contract is
//! deliberately small: a snapshot load, a transaction load, and one atomic
//! save that commits wallet and transaction together or not at all.

use std::sync::Arc;

use custodia_types::{Result, Transaction, TransactionId, Wallet, WalletId};

/// Storage contract for wallets and their transactions.
///
/// Methods take `&self`; implementations are expected to be internally
/// synchronized so a single store can serve concurrent request handlers.
pub trait WalletStore {
    /// Load a snapshot of a wallet intended for a subsequent [`save`].
    ///
    /// The returned wallet's `version` field is the committed version; the
    /// caller must pass it back as `expected_version` when saving.
    ///
    /// # Errors
    /// Returns `WalletNotFound` if the id does not resolve.
    ///
    /// [`save`]: WalletStore::save
    fn load_wallet_for_update(&self, id: WalletId) -> Result<Wallet>;

    /// Load a transaction by id.
    ///
    /// # Errors
    /// Returns `TransactionNotFound` if the id does not resolve.
    fn load_transaction(&self, id: TransactionId) -> Result<Transaction>;

    /// Atomically commit a mutated wallet together with the transaction
    /// that mutated it. All-or-nothing: readers never observe the wallet
    /// without its transaction or vice versa.
    ///
    /// # Errors
    /// Returns `VersionConflict` if the committed wallet version no longer
    /// equals `expected_version` (someone else saved in between). Nothing
    /// is written in that case.
    fn save(&self, wallet: &Wallet, transaction: &Transaction, expected_version: u64)
    -> Result<()>;

    /// Insert a freshly created wallet.
    ///
    /// # Errors
    /// Returns `Internal` if a wallet with the same id already exists.
    fn insert_wallet(&self, wallet: Wallet) -> Result<()>;

    /// Plain read of a wallet, outside any update cycle.
    ///
    /// # Errors
    /// Returns `WalletNotFound` if the id does not resolve.
    fn wallet(&self, id: WalletId) -> Result<Wallet>;

    /// All transactions recorded against a wallet, oldest first.
    ///
    /// # Errors
    /// Returns `WalletNotFound` if the id does not resolve.
    fn transactions_for_wallet(&self, id: WalletId) -> Result<Vec<Transaction>>;
}

// Forwarding impls so engines can borrow or share a store across threads.

impl<S: WalletStore + ?Sized> WalletStore for &S {
    fn load_wallet_for_update(&self, id: WalletId) -> Result<Wallet> {
        (**self).load_wallet_for_update(id)
    }

    fn load_transaction(&self, id: TransactionId) -> Result<Transaction> {
        (**self).load_transaction(id)
    }

    fn save(
        &self,
        wallet: &Wallet,
        transaction: &Transaction,
        expected_version: u64,
    ) -> Result<()> {
        (**self).save(wallet, transaction, expected_version)
    }

    fn insert_wallet(&self, wallet: Wallet) -> Result<()> {
        (**self).insert_wallet(wallet)
    }

    fn wallet(&self, id: WalletId) -> Result<Wallet> {
        (**self).wallet(id)
    }

    fn transactions_for_wallet(&self, id: WalletId) -> Result<Vec<Transaction>> {
        (**self).transactions_for_wallet(id)
    }
}

impl<S: WalletStore + ?Sized> WalletStore for Arc<S> {
    fn load_wallet_for_update(&self, id: WalletId) -> Result<Wallet> {
        (**self).load_wallet_for_update(id)
    }

    fn load_transaction(&self, id: TransactionId) -> Result<Transaction> {
        (**self).load_transaction(id)
    }

    fn save(
        &self,
        wallet: &Wallet,
        transaction: &Transaction,
        expected_version: u64,
    ) -> Result<()> {
        (**self).save(wallet, transaction, expected_version)
    }

    fn insert_wallet(&self, wallet: Wallet) -> Result<()> {
        (**self).insert_wallet(wallet)
    }

    fn wallet(&self, id: WalletId) -> Result<Wallet> {
        (**self).wallet(id)
    }

    fn transactions_for_wallet(&self, id: WalletId) -> Result<Vec<Transaction>> {
        (**self).transactions_for_wallet(id)
    }
}
