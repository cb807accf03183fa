//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::AmountError;

/// Business rule violations surfaced to callers.
///
/// These are the 400-class outcomes of the wallet operations; everything
/// else is an infrastructure failure and lives in `AppError`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Recipient username does not resolve to an employee
    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    /// Catalog item name does not resolve
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The store rejected a debit that would make a balance negative
    #[error("Not enough coins on balance")]
    InsufficientFunds,

    /// Amount is zero, negative, or too large
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Quantity is zero, negative, or too large
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Sender and recipient resolve to the same employee
    #[error("Cannot transfer coins to yourself")]
    SelfTransfer,
}

impl DomainError {
    /// Check if this is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecipientNotFound(_) | Self::ItemNotFound(_))
    }
}

impl From<AmountError> for DomainError {
    fn from(err: AmountError) -> Self {
        match err {
            AmountError::QuantityNotPositive(_) | AmountError::QuantityOverflow => {
                DomainError::InvalidQuantity(err.to_string())
            }
            AmountError::NotPositive(_) | AmountError::Overflow => {
                DomainError::InvalidAmount(err.to_string())
            }
        }
    }
}
