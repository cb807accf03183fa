//! Ledger Store
//!
//! Persistence for employees, wallets, the merch catalog, purchases and
//! transfers. Balance-mutating operations are atomic and serializable.

mod error;
mod memory;
mod postgres;
mod store;

pub use error::{StoreError, BALANCE_CONSTRAINT};
pub use memory::{LedgerOp, MemoryLedgerStore};
pub use postgres::PgLedgerStore;
pub use store::LedgerStore;
