//! Ledger Store contract
//!
//! The single authority over balances. Every implementation must:
//! - run `execute_transfer` / `execute_purchase` as one atomic, serializable unit
//! - reject any debit that would make a balance negative *inside* that unit
//!   and report it as `StoreError::BalanceConstraint`
//! - report a lost serializable conflict as `StoreError::SerializationFailure`
//! - return `None` from point lookups on a miss instead of an error

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    CatalogItem, Coins, CounterpartyTotal, Employee, InventoryItem, PurchaseRecord, Quantity,
    TransferRecord,
};

use super::StoreError;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Look up an employee by identity
    async fn find_employee_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError>;

    /// Look up an employee by username, ignoring case
    async fn find_employee_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Employee>, StoreError>;

    /// Create an employee together with a wallet holding `starting_balance`
    async fn create_employee(
        &self,
        username: &str,
        password_hash: &str,
        starting_balance: i64,
    ) -> Result<Employee, StoreError>;

    /// Look up a catalog item by exact name
    async fn find_catalog_item(&self, name: &str) -> Result<Option<CatalogItem>, StoreError>;

    /// Current balance of an employee's wallet
    async fn balance(&self, owner: Uuid) -> Result<Option<i64>, StoreError>;

    /// Purchased quantities per item name, ordered by name
    async fn inventory(&self, owner: Uuid) -> Result<Vec<InventoryItem>, StoreError>;

    /// Coins sent per recipient username, ordered by username
    async fn sent_totals(&self, owner: Uuid) -> Result<Vec<CounterpartyTotal>, StoreError>;

    /// Coins received per sender username, ordered by username
    async fn received_totals(&self, owner: Uuid) -> Result<Vec<CounterpartyTotal>, StoreError>;

    /// Debit sender, credit recipient and record the transfer atomically
    async fn execute_transfer(
        &self,
        sender: Uuid,
        recipient: Uuid,
        amount: Coins,
    ) -> Result<TransferRecord, StoreError>;

    /// Debit buyer by `total` and record the purchase atomically
    async fn execute_purchase(
        &self,
        buyer: Uuid,
        item: &CatalogItem,
        quantity: Quantity,
        total: Coins,
    ) -> Result<PurchaseRecord, StoreError>;
}
