//! # custodia-store
//!
//! The store boundary of the Custodia wallet ledger.
//!
//! The settlement engine never talks to a database directly; it speaks the
//! [`WalletStore`] contract: load a wallet snapshot whose `version` is the
//! expected version for the subsequent save, then commit wallet and
//! transaction together with compare-and-set on that version. A save
//! against a stale version fails with `VersionConflict` and the engine's
//! retry guard reruns the whole cycle.
//!
//! [`MemoryStore`] is the bundled implementation: thread-safe, in-memory,
//! used by the test suites and by embedders that do not need durability.

pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::WalletStore;
