//! Command definitions
//!
//! Commands represent intentions to change the system state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Command to move coins to another employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCommand {
    /// Authenticated sender
    pub sender_id: Uuid,
    /// Recipient, resolved case-insensitively
    pub recipient_username: String,
    /// Raw amount; validated before the store is touched
    pub amount: i64,
}

impl TransferCommand {
    pub fn new(sender_id: Uuid, recipient_username: impl Into<String>, amount: i64) -> Self {
        Self {
            sender_id,
            recipient_username: recipient_username.into(),
            amount,
        }
    }
}

/// Command to buy merch from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseCommand {
    pub buyer_id: Uuid,
    pub item_name: String,
    pub quantity: i64,
}

impl PurchaseCommand {
    /// Purchase a single unit
    pub fn new(buyer_id: Uuid, item_name: impl Into<String>) -> Self {
        Self {
            buyer_id,
            item_name: item_name.into(),
            quantity: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Command to log in, registering the employee on first use
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub employee_id: Uuid,
    pub token: String,
    /// True when this login registered the employee
    pub registered: bool,
}
