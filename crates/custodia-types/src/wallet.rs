//! Wallet entity — the balance pair and its guarded mutation primitives.
//!
//! Every wallet tracks two non-negative decimals: `balance` (the ledger
//! total) and `usable_balance` (the portion not reserved by pending
//! transactions). The invariant `0 <= usable_balance <= balance` holds at
//! every observable point.
//!
//! The four primitives below are the only paths by which balances change;
//! the settlement engine composes them and never touches the fields
//! directly. Each primitive bumps `version`, the optimistic concurrency
//! token the store compares on save.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CustodiaError, CustomerId, Result, WalletId};

/// Currency a wallet is denominated in. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Try,
    Usd,
    Eur,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Try => "TRY",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        };
        write!(f, "{s}")
    }
}

/// A customer-owned wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Unique wallet identifier.
    pub id: WalletId,
    /// The owning customer. Authorization against it lives outside the core.
    pub customer_id: CustomerId,
    /// Human-readable wallet name.
    pub name: String,
    /// Denomination currency, fixed at creation.
    pub currency: Currency,
    /// Whether the wallet may be used for shopping.
    pub active_for_shopping: bool,
    /// Whether the wallet may be used for withdrawals.
    pub active_for_withdraw: bool,
    /// Total recorded value, including amounts pending settlement.
    pub balance: Decimal,
    /// The portion of `balance` currently available for spending.
    pub usable_balance: Decimal,
    /// Optimistic concurrency token. Bumped by every mutation primitive and
    /// compared-and-set by the store on save.
    pub version: u64,
}

impl Wallet {
    /// Create a wallet with zero balances at version 0.
    #[must_use]
    pub fn new(
        customer_id: CustomerId,
        name: impl Into<String>,
        currency: Currency,
        active_for_shopping: bool,
        active_for_withdraw: bool,
    ) -> Self {
        Self {
            id: WalletId::new(),
            customer_id,
            name: name.into(),
            currency,
            active_for_shopping,
            active_for_withdraw,
            balance: Decimal::ZERO,
            usable_balance: Decimal::ZERO,
            version: 0,
        }
    }

    /// Add `amount` to the ledger total.
    pub fn increase_balance(&mut self, amount: Decimal) {
        self.balance += amount;
        self.version += 1;
    }

    /// Remove `amount` from the ledger total.
    ///
    /// # Errors
    /// Returns [`CustodiaError::InsufficientBalance`] if `amount` exceeds
    /// the current balance; the wallet is left untouched.
    pub fn decrease_balance(&mut self, amount: Decimal) -> Result<()> {
        if self.balance < amount {
            return Err(CustodiaError::InsufficientBalance {
                needed: amount,
                balance: self.balance,
            });
        }
        self.balance -= amount;
        self.version += 1;
        Ok(())
    }

    /// Add `amount` to the usable portion.
    pub fn increase_usable_balance(&mut self, amount: Decimal) {
        self.usable_balance += amount;
        self.version += 1;
    }

    /// Remove `amount` from the usable portion.
    ///
    /// # Errors
    /// Returns [`CustodiaError::InsufficientUsableBalance`] if `amount`
    /// exceeds the current usable balance; the wallet is left untouched.
    pub fn decrease_usable_balance(&mut self, amount: Decimal) -> Result<()> {
        if self.usable_balance < amount {
            return Err(CustodiaError::InsufficientUsableBalance {
                needed: amount,
                usable: self.usable_balance,
            });
        }
        self.usable_balance -= amount;
        self.version += 1;
        Ok(())
    }

    /// Whether withdrawals are permitted on this wallet.
    ///
    /// Note: this requires **both** activity flags, so a wallet disabled
    /// for shopping also cannot withdraw. Inherited behavior, kept as-is
    /// until product says otherwise.
    #[must_use]
    pub fn is_withdraw_active(&self) -> bool {
        self.active_for_withdraw && self.active_for_shopping
    }

    /// The invariant every observable wallet state must satisfy:
    /// `0 <= usable_balance <= balance`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.usable_balance >= Decimal::ZERO && self.usable_balance <= self.balance
    }

    /// The portion of `balance` reserved by pending settlement.
    #[must_use]
    pub fn reserved(&self) -> Decimal {
        self.balance - self.usable_balance
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wallet[{}] {} {} balance={} usable={} v{}",
            self.id, self.name, self.currency, self.balance, self.usable_balance, self.version,
        )
    }
}
