//! Wallet View Service
//!
//! Builds the wallet read model from four independent store reads that run
//! concurrently. The first failure wins: the remaining reads are dropped and
//! no partial view is ever returned.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{CoinHistory, WalletView};
use crate::error::AppError;
use crate::ledger::{LedgerStore, StoreError};

/// Wallet query aggregator
#[derive(Clone)]
pub struct WalletViewService {
    store: Arc<dyn LedgerStore>,
}

impl WalletViewService {
    /// Create a new WalletViewService
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Balance, inventory and coin history of `owner`
    pub async fn get_wallet_view(&self, owner: Uuid) -> Result<WalletView, AppError> {
        let (balance, inventory, sent, received) = tokio::try_join!(
            self.store.balance(owner),
            self.store.inventory(owner),
            self.store.sent_totals(owner),
            self.store.received_totals(owner),
        )
        .map_err(|e| {
            tracing::error!(employee_id = %owner, "Wallet view read failed: {}", e);
            AppError::from(e)
        })?;

        // Authenticated employees always have a wallet
        let coins = balance.ok_or(StoreError::WalletMissing(owner))?;

        tracing::debug!(
            employee_id = %owner,
            coins,
            items = inventory.len(),
            "Wallet view built"
        );

        Ok(WalletView {
            coins,
            inventory,
            coin_history: CoinHistory { received, sent },
        })
    }
}
