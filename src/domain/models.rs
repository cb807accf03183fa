//! Ledger entities and read-model rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Coins, Quantity};

/// Every wallet starts with this many coins.
pub const STARTING_BALANCE: i64 = 1000;

/// An employee as stored in the ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A merch catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i32,
    pub name: String,
    pub price: Coins,
}

/// Total quantity of one item owned by an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: i64,
}

/// Total coins moved to or from one counterparty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyTotal {
    pub username: String,
    pub amount: i64,
}

/// A committed coin transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: i64,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub amount: Coins,
    pub created_at: DateTime<Utc>,
}

/// A committed merch purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: i64,
    pub buyer_id: Uuid,
    pub item_id: i32,
    pub quantity: Quantity,
    pub total: Coins,
    pub created_at: DateTime<Utc>,
}

/// Sent and received totals, grouped by counterparty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinHistory {
    pub received: Vec<CounterpartyTotal>,
    pub sent: Vec<CounterpartyTotal>,
}

/// Consistent read model of one wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletView {
    pub coins: i64,
    pub inventory: Vec<InventoryItem>,
    pub coin_history: CoinHistory,
}
