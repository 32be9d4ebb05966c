//! End-to-end settlement lifecycle tests.
//!
//! These exercise the full engine surface against the in-memory store:
//! auto-settlement vs. manual approval, the reservation model for pending
//! transactions, denial reversals, and the wallet invariant across mixed
//! operation sequences.

use custodia_ledger::{Decision, DepositRequest, SettlementEngine, WithdrawRequest};
use custodia_store::{MemoryStore, WalletStore};
use custodia_types::{
    CounterpartyKind, Currency, CustodiaError, CustomerId, TransactionKind, TransactionStatus,
    Wallet, WalletId,
};
use rust_decimal::Decimal;

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

/// Helper: an engine over a fresh store with one seeded wallet.
struct Ledger {
    engine: SettlementEngine<MemoryStore>,
    wallet_id: WalletId,
}

impl Ledger {
    fn new() -> Self {
        Self::with_balances(Decimal::ZERO, Decimal::ZERO)
    }

    /// Seed a wallet at a specific (balance, usable) starting point.
    fn with_balances(balance: Decimal, usable: Decimal) -> Self {
        let engine = SettlementEngine::new(MemoryStore::new());
        let mut wallet = Wallet::new(CustomerId::new(), "checking", Currency::Usd, true, true);
        wallet.increase_balance(balance);
        wallet.increase_usable_balance(usable);
        let wallet_id = wallet.id;
        engine.store().insert_wallet(wallet).unwrap();
        Self { engine, wallet_id }
    }

    fn deposit(&self, amount: Decimal) -> custodia_types::Result<custodia_ledger::SettlementReceipt> {
        self.engine.deposit(&DepositRequest {
            wallet_id: self.wallet_id,
            amount,
            source: CounterpartyKind::Iban,
            counterparty: "TR33 0006 1005 1978".into(),
        })
    }

    fn withdraw(&self, amount: Decimal) -> custodia_types::Result<custodia_ledger::SettlementReceipt> {
        self.engine.withdraw(&WithdrawRequest {
            wallet_id: self.wallet_id,
            amount,
            destination: CounterpartyKind::Payment,
            counterparty: "card-7781".into(),
        })
    }

    fn wallet(&self) -> Wallet {
        self.engine.store().wallet(self.wallet_id).unwrap()
    }
}

// =============================================================================
// Scenario: small withdrawals auto-settle, overspend is rejected
// =============================================================================
#[test]
fn withdraw_then_overdraw_scenario() {
    // Wallet at balance 1000 / usable 800 (200 reserved by earlier activity).
    let ledger = Ledger::with_balances(dec(1000), dec(800));

    let receipt = ledger.withdraw(dec(200)).unwrap();
    assert_eq!(receipt.status, TransactionStatus::Approved);
    assert_eq!(receipt.balance, dec(800));
    assert_eq!(receipt.usable_balance, dec(600));

    // 1200 > usable 600: rejected as a business conflict, state untouched.
    let err = ledger.withdraw(dec(1200)).unwrap_err();
    assert!(matches!(
        err,
        CustodiaError::InsufficientUsableBalance { .. }
    ));
    let wallet = ledger.wallet();
    assert_eq!(wallet.balance, dec(800));
    assert_eq!(wallet.usable_balance, dec(600));
}

// =============================================================================
// Scenario: large deposit held pending, then released by approval
// =============================================================================
#[test]
fn large_deposit_pending_then_approved() {
    let ledger = Ledger::new();

    let receipt = ledger.deposit(dec(1500)).unwrap();
    assert_eq!(receipt.status, TransactionStatus::Pending);
    assert_eq!(receipt.balance, dec(1500));
    assert_eq!(receipt.usable_balance, Decimal::ZERO);

    let decided = ledger
        .engine
        .approve(receipt.transaction_id, Decision::Approve)
        .unwrap();
    assert_eq!(decided.status, TransactionStatus::Approved);
    assert_eq!(decided.balance, dec(1500));
    assert_eq!(decided.usable_balance, dec(1500));
}

// =============================================================================
// Scenario: denial reverses a pending deposit exactly
// =============================================================================
#[test]
fn denied_deposit_restores_pre_deposit_balance() {
    let ledger = Ledger::with_balances(dec(250), dec(250));

    let receipt = ledger.deposit(dec(1500)).unwrap();
    assert_eq!(ledger.wallet().balance, dec(1750));

    ledger
        .engine
        .approve(receipt.transaction_id, Decision::Deny)
        .unwrap();

    let wallet = ledger.wallet();
    assert_eq!(wallet.balance, dec(250), "denial must reverse the credit exactly");
    assert_eq!(wallet.usable_balance, dec(250));
    assert!(wallet.is_consistent());
}

// =============================================================================
// Scenario: pending withdrawal reserves funds; denial refunds them
// =============================================================================
#[test]
fn pending_withdraw_reservation_and_refund() {
    let ledger = Ledger::with_balances(dec(3000), dec(3000));

    let receipt = ledger.withdraw(dec(2000)).unwrap();
    assert_eq!(receipt.status, TransactionStatus::Pending);
    assert_eq!(receipt.balance, dec(3000), "ledger total holds until approval");
    assert_eq!(receipt.usable_balance, dec(1000));

    // The reserved 2000 is not spendable while the decision is pending.
    let err = ledger.withdraw(dec(1500)).unwrap_err();
    assert!(matches!(
        err,
        CustodiaError::InsufficientUsableBalance { .. }
    ));

    ledger
        .engine
        .approve(receipt.transaction_id, Decision::Deny)
        .unwrap();
    let wallet = ledger.wallet();
    assert_eq!(wallet.balance, dec(3000));
    assert_eq!(wallet.usable_balance, dec(3000));
}

// =============================================================================
// Scenario: threshold boundary on both operations
// =============================================================================
#[test]
fn threshold_is_inclusive_for_auto_settlement() {
    let ledger = Ledger::with_balances(dec(5000), dec(5000));
    let limit = ledger.engine.config().large_transaction_limit;

    let deposit = ledger.deposit(limit).unwrap();
    assert_eq!(deposit.status, TransactionStatus::Approved);

    let withdraw = ledger.withdraw(limit).unwrap();
    assert_eq!(withdraw.status, TransactionStatus::Approved);

    let cent_over = limit + Decimal::new(1, 2); // limit + 0.01
    let deposit = ledger.deposit(cent_over).unwrap();
    assert_eq!(deposit.status, TransactionStatus::Pending);

    let withdraw = ledger.withdraw(cent_over).unwrap();
    assert_eq!(withdraw.status, TransactionStatus::Pending);
}

// =============================================================================
// Scenario: approval happens exactly once
// =============================================================================
#[test]
fn approval_decides_exactly_once() {
    let ledger = Ledger::new();
    let receipt = ledger.deposit(dec(1500)).unwrap();

    ledger
        .engine
        .approve(receipt.transaction_id, Decision::Approve)
        .unwrap();
    let before = ledger.wallet();

    for decision in [Decision::Approve, Decision::Deny] {
        let err = ledger
            .engine
            .approve(receipt.transaction_id, decision)
            .unwrap_err();
        assert!(matches!(
            err,
            CustodiaError::TransactionAlreadyProcessed(_)
        ));
    }

    // Balances changed only once.
    assert_eq!(ledger.wallet(), before);
}

// =============================================================================
// Scenario: mixed history, transaction listing, and the invariant
// =============================================================================
#[test]
fn mixed_history_keeps_invariant_and_full_audit_trail() {
    let ledger = Ledger::new();

    ledger.deposit(dec(900)).unwrap(); // auto
    let big_in = ledger.deposit(dec(4000)).unwrap(); // pending
    ledger.withdraw(dec(400)).unwrap(); // auto
    ledger
        .engine
        .approve(big_in.transaction_id, Decision::Approve)
        .unwrap();
    let big_out = ledger.withdraw(dec(2500)).unwrap(); // pending
    ledger
        .engine
        .approve(big_out.transaction_id, Decision::Approve)
        .unwrap();

    let wallet = ledger.wallet();
    assert_eq!(wallet.balance, dec(2000)); // 900 + 4000 - 400 - 2500
    assert_eq!(wallet.usable_balance, dec(2000));
    assert!(wallet.is_consistent());

    let history = ledger
        .engine
        .store()
        .transactions_for_wallet(ledger.wallet_id)
        .unwrap();
    assert_eq!(history.len(), 4);
    assert!(history.iter().all(|tx| tx.status.is_terminal()));
    assert_eq!(history[0].kind, TransactionKind::Deposit);
    assert_eq!(history[0].amount, dec(900));
    assert_eq!(history[3].kind, TransactionKind::Withdraw);
    assert_eq!(history[3].amount, dec(2500));
}

// =============================================================================
// Scenario: inactive wallets accept deposits but refuse withdrawals
// =============================================================================
#[test]
fn inactive_wallet_still_accepts_deposits() {
    let engine = SettlementEngine::new(MemoryStore::new());
    let wallet = Wallet::new(CustomerId::new(), "frozen", Currency::Eur, true, false);
    let wallet_id = wallet.id;
    engine.store().insert_wallet(wallet).unwrap();

    let receipt = engine
        .deposit(&DepositRequest {
            wallet_id,
            amount: dec(100),
            source: CounterpartyKind::Iban,
            counterparty: "DE89 3704 0044".into(),
        })
        .unwrap();
    assert_eq!(receipt.status, TransactionStatus::Approved);

    let err = engine
        .withdraw(&WithdrawRequest {
            wallet_id,
            amount: dec(50),
            destination: CounterpartyKind::Iban,
            counterparty: "DE89 3704 0044".into(),
        })
        .unwrap_err();
    assert!(matches!(err, CustodiaError::WalletInactive(_)));
}
