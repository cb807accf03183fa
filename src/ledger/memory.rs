//! In-memory Ledger Store
//!
//! Runs every balance-mutating operation under one lock, which makes the
//! execution order trivially serial. Writes are staged and only applied at
//! commit; a staged balance below zero fails exactly like the PostgreSQL
//! CHECK constraint. Faults and latency can be injected per operation.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{
    CatalogItem, Coins, CounterpartyTotal, Employee, InventoryItem, PurchaseRecord, Quantity,
    TransferRecord,
};

use super::{LedgerStore, StoreError};

/// Default merch catalog (name, price)
const DEFAULT_CATALOG: &[(&str, i64)] = &[
    ("t-shirt", 80),
    ("cup", 20),
    ("book", 50),
    ("pen", 10),
    ("powerbank", 200),
    ("hoody", 300),
    ("umbrella", 200),
    ("socks", 10),
    ("wallet", 50),
    ("pink-hoody", 500),
];

/// Store operations that can be slowed down or made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerOp {
    Balance,
    Inventory,
    SentTotals,
    ReceivedTotals,
    /// Insert of the transfer row, after both balances were staged
    RecordTransfer,
    /// Insert of the purchase row, after the debit was staged
    RecordPurchase,
    /// Commit of a balance-mutating transaction; fails as a serialization conflict
    Commit,
}

#[derive(Debug, Default)]
struct Faults {
    failures: HashMap<LedgerOp, u32>,
    delays: HashMap<LedgerOp, Duration>,
}

#[derive(Debug, Default)]
struct LedgerState {
    employees: HashMap<Uuid, Employee>,
    wallets: HashMap<Uuid, i64>,
    catalog: BTreeMap<String, CatalogItem>,
    transfers: Vec<TransferRecord>,
    purchases: Vec<PurchaseRecord>,
}

impl LedgerState {
    /// Stage a balance change, enforcing the non-negative constraint
    fn stage(
        &self,
        staged: &mut HashMap<Uuid, i64>,
        owner: Uuid,
        delta: i64,
    ) -> Result<(), StoreError> {
        let current = match staged.get(&owner) {
            Some(balance) => *balance,
            None => *self
                .wallets
                .get(&owner)
                .ok_or(StoreError::WalletMissing(owner))?,
        };
        let next = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::InvalidData(format!("balance overflow for {}", owner)))?;
        if next < 0 {
            return Err(StoreError::BalanceConstraint);
        }
        staged.insert(owner, next);
        Ok(())
    }

    fn commit(&mut self, staged: HashMap<Uuid, i64>) {
        self.wallets.extend(staged);
    }

    fn username(&self, id: &Uuid) -> String {
        self.employees
            .get(id)
            .map(|e| e.username.clone())
            .unwrap_or_default()
    }
}

/// Ledger store kept entirely in process memory
#[derive(Debug)]
pub struct MemoryLedgerStore {
    state: Mutex<LedgerState>,
    faults: Mutex<Faults>,
}

impl MemoryLedgerStore {
    /// Create a store seeded with the default merch catalog
    pub fn new() -> Self {
        DEFAULT_CATALOG
            .iter()
            .fold(Self::empty(), |store, (name, price)| {
                store.with_item(name, *price)
            })
    }

    /// Create a store with an empty catalog
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            faults: Mutex::new(Faults::default()),
        }
    }

    /// Add or replace a catalog item. Non-positive prices are ignored.
    pub fn with_item(mut self, name: &str, price: i64) -> Self {
        if let Ok(price) = Coins::new(price) {
            let state = self.state.get_mut();
            let id = match state.catalog.get(name) {
                Some(existing) => existing.id,
                None => state.catalog.len() as i32 + 1,
            };
            state.catalog.insert(
                name.to_string(),
                CatalogItem {
                    id,
                    name: name.to_string(),
                    price,
                },
            );
        }
        self
    }

    /// Make the next `times` executions of `op` fail
    pub async fn fail(&self, op: LedgerOp, times: u32) {
        self.faults.lock().await.failures.insert(op, times);
    }

    /// Delay every execution of `op`
    pub async fn delay(&self, op: LedgerOp, duration: Duration) {
        self.faults.lock().await.delays.insert(op, duration);
    }

    /// Remove all injected failures and delays
    pub async fn clear_faults(&self) {
        let mut faults = self.faults.lock().await;
        faults.failures.clear();
        faults.delays.clear();
    }

    /// Number of committed transfers
    pub async fn transfer_count(&self) -> usize {
        self.state.lock().await.transfers.len()
    }

    /// Number of committed purchases
    pub async fn purchase_count(&self) -> usize {
        self.state.lock().await.purchases.len()
    }

    /// Sum of all wallet balances
    pub async fn total_coins(&self) -> i64 {
        self.state.lock().await.wallets.values().sum()
    }

    /// Sleep or fail according to the injected faults for `op`
    async fn trip(&self, op: LedgerOp) -> Result<(), StoreError> {
        let (delay, fail) = {
            let mut faults = self.faults.lock().await;
            let delay = faults.delays.get(&op).copied();
            let fail = match faults.failures.get_mut(&op) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            };
            (delay, fail)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if fail {
            return Err(match op {
                LedgerOp::Commit => StoreError::SerializationFailure,
                other => StoreError::Unavailable(format!("injected failure in {:?}", other)),
            });
        }
        Ok(())
    }
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

fn totals(entries: impl Iterator<Item = (String, i64)>) -> Vec<CounterpartyTotal> {
    let mut grouped: BTreeMap<String, i64> = BTreeMap::new();
    for (username, amount) in entries {
        *grouped.entry(username).or_default() += amount;
    }
    grouped
        .into_iter()
        .map(|(username, amount)| CounterpartyTotal { username, amount })
        .collect()
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn find_employee_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        Ok(self.state.lock().await.employees.get(&id).cloned())
    }

    async fn find_employee_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Employee>, StoreError> {
        let wanted = username.to_lowercase();
        let state = self.state.lock().await;
        Ok(state
            .employees
            .values()
            .find(|e| e.username.to_lowercase() == wanted)
            .cloned())
    }

    async fn create_employee(
        &self,
        username: &str,
        password_hash: &str,
        starting_balance: i64,
    ) -> Result<Employee, StoreError> {
        let wanted = username.to_lowercase();
        let mut state = self.state.lock().await;

        if state
            .employees
            .values()
            .any(|e| e.username.to_lowercase() == wanted)
        {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }
        if starting_balance < 0 {
            return Err(StoreError::BalanceConstraint);
        }

        let employee = Employee {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.wallets.insert(employee.id, starting_balance);
        state.employees.insert(employee.id, employee.clone());

        Ok(employee)
    }

    async fn find_catalog_item(&self, name: &str) -> Result<Option<CatalogItem>, StoreError> {
        Ok(self.state.lock().await.catalog.get(name).cloned())
    }

    async fn balance(&self, owner: Uuid) -> Result<Option<i64>, StoreError> {
        self.trip(LedgerOp::Balance).await?;
        Ok(self.state.lock().await.wallets.get(&owner).copied())
    }

    async fn inventory(&self, owner: Uuid) -> Result<Vec<InventoryItem>, StoreError> {
        self.trip(LedgerOp::Inventory).await?;
        let state = self.state.lock().await;

        let mut grouped: BTreeMap<String, i64> = BTreeMap::new();
        for purchase in state.purchases.iter().filter(|p| p.buyer_id == owner) {
            if let Some(item) = state.catalog.values().find(|i| i.id == purchase.item_id) {
                *grouped.entry(item.name.clone()).or_default() +=
                    i64::from(purchase.quantity.value());
            }
        }

        Ok(grouped
            .into_iter()
            .map(|(name, quantity)| InventoryItem { name, quantity })
            .collect())
    }

    async fn sent_totals(&self, owner: Uuid) -> Result<Vec<CounterpartyTotal>, StoreError> {
        self.trip(LedgerOp::SentTotals).await?;
        let state = self.state.lock().await;
        Ok(totals(
            state
                .transfers
                .iter()
                .filter(|t| t.sender_id == owner)
                .map(|t| (state.username(&t.recipient_id), t.amount.value())),
        ))
    }

    async fn received_totals(&self, owner: Uuid) -> Result<Vec<CounterpartyTotal>, StoreError> {
        self.trip(LedgerOp::ReceivedTotals).await?;
        let state = self.state.lock().await;
        Ok(totals(
            state
                .transfers
                .iter()
                .filter(|t| t.recipient_id == owner)
                .map(|t| (state.username(&t.sender_id), t.amount.value())),
        ))
    }

    async fn execute_transfer(
        &self,
        sender: Uuid,
        recipient: Uuid,
        amount: Coins,
    ) -> Result<TransferRecord, StoreError> {
        let mut state = self.state.lock().await;

        let mut staged = HashMap::new();
        state.stage(&mut staged, sender, -amount.value())?;
        state.stage(&mut staged, recipient, amount.value())?;

        self.trip(LedgerOp::RecordTransfer).await?;
        let record = TransferRecord {
            id: state.transfers.len() as i64 + 1,
            sender_id: sender,
            recipient_id: recipient,
            amount,
            created_at: Utc::now(),
        };

        self.trip(LedgerOp::Commit).await?;
        state.commit(staged);
        state.transfers.push(record.clone());

        Ok(record)
    }

    async fn execute_purchase(
        &self,
        buyer: Uuid,
        item: &CatalogItem,
        quantity: Quantity,
        total: Coins,
    ) -> Result<PurchaseRecord, StoreError> {
        let mut state = self.state.lock().await;

        let mut staged = HashMap::new();
        state.stage(&mut staged, buyer, -total.value())?;

        self.trip(LedgerOp::RecordPurchase).await?;
        let record = PurchaseRecord {
            id: state.purchases.len() as i64 + 1,
            buyer_id: buyer,
            item_id: item.id,
            quantity,
            total,
            created_at: Utc::now(),
        };

        self.trip(LedgerOp::Commit).await?;
        state.commit(staged);
        state.purchases.push(record.clone());

        Ok(record)
    }
}
