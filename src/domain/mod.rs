//! Domain module
//!
//! Core domain types and business rules.

pub mod amount;
pub mod context;
pub mod error;
pub mod models;
pub mod policy;

pub use amount::{AmountError, Coins, Quantity};
pub use context::OperationContext;
pub use error::DomainError;
pub use models::{
    CatalogItem, CoinHistory, CounterpartyTotal, Employee, InventoryItem, PurchaseRecord,
    TransferRecord, WalletView, STARTING_BALANCE,
};
pub use policy::{SelfTransferPolicy, WalletPolicy};
