//! Thread-safe in-memory store with compare-and-set versioning.
//!
//! A single `RwLock` guards both tables so [`MemoryStore::save`] can commit
//! wallet and transaction in one critical section. The committed wallet
//! version is the CAS token: a save whose `expected_version` no longer
//! matches fails with `VersionConflict` and writes nothing.

use std::collections::HashMap;
use std::sync::RwLock;

use custodia_types::{CustodiaError, Result, Transaction, TransactionId, Wallet, WalletId};

use crate::store::WalletStore;

#[derive(Default)]
struct Tables {
    wallets: HashMap<WalletId, Wallet>,
    transactions: HashMap<TransactionId, Transaction>,
}

/// In-memory [`WalletStore`] implementation.
///
/// Safe to share behind an `Arc` across concurrent request handlers; the
/// version check in [`save`](WalletStore::save) guarantees that two racing
/// mutations on the same wallet never both commit against the same version.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of wallets currently stored.
    pub fn wallet_count(&self) -> usize {
        self.inner.read().expect("store lock poisoned").wallets.len()
    }

    /// Number of transactions currently stored.
    pub fn transaction_count(&self) -> usize {
        self.inner
            .read()
            .expect("store lock poisoned")
            .transactions
            .len()
    }
}

impl WalletStore for MemoryStore {
    fn load_wallet_for_update(&self, id: WalletId) -> Result<Wallet> {
        let tables = self.inner.read().expect("store lock poisoned");
        tables
            .wallets
            .get(&id)
            .cloned()
            .ok_or(CustodiaError::WalletNotFound(id))
    }

    fn load_transaction(&self, id: TransactionId) -> Result<Transaction> {
        let tables = self.inner.read().expect("store lock poisoned");
        tables
            .transactions
            .get(&id)
            .cloned()
            .ok_or(CustodiaError::TransactionNotFound(id))
    }

    fn save(
        &self,
        wallet: &Wallet,
        transaction: &Transaction,
        expected_version: u64,
    ) -> Result<()> {
        debug_assert!(wallet.is_consistent(), "saving inconsistent wallet {wallet}");

        let mut tables = self.inner.write().expect("store lock poisoned");
        let stored = tables
            .wallets
            .get(&wallet.id)
            .ok_or(CustodiaError::WalletNotFound(wallet.id))?;

        if stored.version != expected_version {
            tracing::debug!(
                wallet = %wallet.id,
                expected = expected_version,
                committed = stored.version,
                "Stale save rejected"
            );
            return Err(CustodiaError::VersionConflict {
                wallet_id: wallet.id,
                expected_version,
            });
        }

        tables.wallets.insert(wallet.id, wallet.clone());
        tables
            .transactions
            .insert(transaction.id, transaction.clone());
        Ok(())
    }

    fn insert_wallet(&self, wallet: Wallet) -> Result<()> {
        let mut tables = self.inner.write().expect("store lock poisoned");
        if tables.wallets.contains_key(&wallet.id) {
            return Err(CustodiaError::Internal(format!(
                "wallet {} already exists",
                wallet.id
            )));
        }
        tables.wallets.insert(wallet.id, wallet);
        Ok(())
    }

    fn wallet(&self, id: WalletId) -> Result<Wallet> {
        self.load_wallet_for_update(id)
    }

    fn transactions_for_wallet(&self, id: WalletId) -> Result<Vec<Transaction>> {
        let tables = self.inner.read().expect("store lock poisoned");
        if !tables.wallets.contains_key(&id) {
            return Err(CustodiaError::WalletNotFound(id));
        }
        let mut txs: Vec<Transaction> = tables
            .transactions
            .values()
            .filter(|tx| tx.wallet_id == id)
            .cloned()
            .collect();
        // UUIDv7 ids are time-ordered, so this is creation order.
        txs.sort_by_key(|tx| tx.id);
        Ok(txs)
    }
}
