//! coin_wallet Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod auth;
pub mod domain;
pub mod handlers;
pub mod ledger;
pub mod wallet_view;

pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorResponse};
pub use domain::{Coins, DomainError, OperationContext, Quantity, WalletPolicy};
pub use ledger::{LedgerStore, MemoryLedgerStore, PgLedgerStore, StoreError};
