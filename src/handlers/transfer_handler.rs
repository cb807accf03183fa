//! Transfer Handler
//!
//! Moves coins between employees in one serializable ledger transaction.

use std::sync::Arc;

use crate::domain::{
    Coins, DomainError, OperationContext, SelfTransferPolicy, TransferRecord, WalletPolicy,
};
use crate::error::AppError;
use crate::ledger::{LedgerStore, StoreError};

use super::retry::with_serialization_retry;
use super::TransferCommand;

/// Handler for coin transfers
#[derive(Clone)]
pub struct TransferHandler {
    store: Arc<dyn LedgerStore>,
    policy: WalletPolicy,
}

impl TransferHandler {
    pub fn new(store: Arc<dyn LedgerStore>, policy: WalletPolicy) -> Self {
        Self { store, policy }
    }

    /// Execute the transfer command
    pub async fn execute(
        &self,
        command: TransferCommand,
        context: &OperationContext,
    ) -> Result<TransferRecord, AppError> {
        // Validate amount before touching the store
        let amount = Coins::new(command.amount).map_err(DomainError::from)?;

        let recipient = self
            .store
            .find_employee_by_username(&command.recipient_username)
            .await?
            .ok_or_else(|| DomainError::RecipientNotFound(command.recipient_username.clone()))?;

        if recipient.id == command.sender_id
            && self.policy.self_transfer == SelfTransferPolicy::Reject
        {
            return Err(DomainError::SelfTransfer.into());
        }

        let sender = command.sender_id;
        let record = with_serialization_retry("transfer", self.policy.serialization_retries, || {
            self.store.execute_transfer(sender, recipient.id, amount)
        })
        .await
        .map_err(|e| {
            match &e {
                StoreError::BalanceConstraint => tracing::warn!(
                    request_id = ?context.request_id,
                    %sender,
                    %amount,
                    "Transfer rejected: insufficient funds"
                ),
                other => tracing::error!(
                    request_id = ?context.request_id,
                    %sender,
                    "Transfer failed: {}",
                    other
                ),
            }
            AppError::from(e)
        })?;

        tracing::info!(
            request_id = ?context.request_id,
            transfer_id = record.id,
            %sender,
            recipient = %recipient.username,
            %amount,
            "Transfer committed"
        );

        Ok(record)
    }
}
