//! Wallet view module
//!
//! Read side: a consistent snapshot of one employee's wallet.

mod service;

pub use service::WalletViewService;
