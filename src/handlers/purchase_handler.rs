//! Purchase Handler
//!
//! Debits the buyer for catalog merch and records the purchase atomically.

use std::sync::Arc;

use crate::domain::{DomainError, OperationContext, PurchaseRecord, Quantity, WalletPolicy};
use crate::error::AppError;
use crate::ledger::{LedgerStore, StoreError};

use super::retry::with_serialization_retry;
use super::PurchaseCommand;

/// Handler for merch purchases
#[derive(Clone)]
pub struct PurchaseHandler {
    store: Arc<dyn LedgerStore>,
    policy: WalletPolicy,
}

impl PurchaseHandler {
    pub fn new(store: Arc<dyn LedgerStore>, policy: WalletPolicy) -> Self {
        Self { store, policy }
    }

    /// Execute the purchase command
    pub async fn execute(
        &self,
        command: PurchaseCommand,
        context: &OperationContext,
    ) -> Result<PurchaseRecord, AppError> {
        let quantity = Quantity::new(command.quantity).map_err(DomainError::from)?;

        let item = self
            .store
            .find_catalog_item(&command.item_name)
            .await?
            .ok_or_else(|| DomainError::ItemNotFound(command.item_name.clone()))?;

        let total = item.price.times(quantity).map_err(|e| {
            DomainError::InvalidAmount(format!("{} x {}: {}", item.name, quantity.value(), e))
        })?;

        let buyer = command.buyer_id;
        let record = with_serialization_retry("purchase", self.policy.serialization_retries, || {
            self.store.execute_purchase(buyer, &item, quantity, total)
        })
        .await
        .map_err(|e| {
            match &e {
                StoreError::BalanceConstraint => tracing::warn!(
                    request_id = ?context.request_id,
                    %buyer,
                    item = %item.name,
                    %total,
                    "Purchase rejected: insufficient funds"
                ),
                other => tracing::error!(
                    request_id = ?context.request_id,
                    %buyer,
                    item = %item.name,
                    "Purchase failed: {}",
                    other
                ),
            }
            AppError::from(e)
        })?;

        tracing::info!(
            request_id = ?context.request_id,
            purchase_id = record.id,
            %buyer,
            item = %item.name,
            quantity = quantity.value(),
            %total,
            "Purchase committed"
        );

        Ok(record)
    }
}
