//! Command Handlers module
//!
//! Coordinators for the write side: login, transfers and purchases.
//! Each handler validates its command, resolves names through the ledger
//! store and runs the balance change as one serializable transaction.

mod commands;
mod login_handler;
mod purchase_handler;
mod retry;
mod transfer_handler;


pub use commands::*;
pub use login_handler::{normalize_username, LoginHandler};
pub use purchase_handler::PurchaseHandler;
pub use transfer_handler::TransferHandler;
