//! PostgreSQL Ledger Store
//!
//! Balance-mutating operations run in a SERIALIZABLE transaction; the
//! `wallets_balance_non_negative` CHECK constraint is what actually refuses
//! an overdraft, so two racing debits can never both commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::{
    CatalogItem, Coins, CounterpartyTotal, Employee, InventoryItem, PurchaseRecord, Quantity,
    TransferRecord,
};

use super::{LedgerStore, StoreError};

type EmployeeRow = (Uuid, String, String, DateTime<Utc>);

/// Ledger store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    /// Create a new store with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction at SERIALIZABLE isolation
    async fn begin_serializable(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Apply a signed balance change to one wallet
    async fn adjust_balance(
        tx: &mut Transaction<'_, Postgres>,
        owner: Uuid,
        delta: i64,
    ) -> Result<(), StoreError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = balance + $2
            WHERE employee_id = $1
            "#,
        )
        .bind(owner)
        .bind(delta)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::WalletMissing(owner));
        }
        Ok(())
    }

    async fn counterparty_totals(
        &self,
        sql: &'static str,
        owner: Uuid,
    ) -> Result<Vec<CounterpartyTotal>, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(username, amount)| CounterpartyTotal { username, amount })
            .collect())
    }
}

fn employee_from_row((id, username, password_hash, created_at): EmployeeRow) -> Employee {
    Employee {
        id,
        username,
        password_hash,
        created_at,
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn find_employee_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT employee_id, username, password_hash, created_at
            FROM employees
            WHERE employee_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(employee_from_row))
    }

    async fn find_employee_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Employee>, StoreError> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT employee_id, username, password_hash, created_at
            FROM employees
            WHERE lower(username) = lower($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(employee_from_row))
    }

    async fn create_employee(
        &self,
        username: &str,
        password_hash: &str,
        starting_balance: i64,
    ) -> Result<Employee, StoreError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO employees (employee_id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING employee_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::from(e).for_username(username))?;

        sqlx::query(
            r#"
            INSERT INTO wallets (employee_id, balance)
            VALUES ($1, $2)
            "#,
        )
        .bind(id)
        .bind(starting_balance)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| StoreError::from(e).for_username(username))?;

        tracing::debug!(employee_id = %id, username, "Employee and wallet created");

        Ok(Employee {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    async fn find_catalog_item(&self, name: &str) -> Result<Option<CatalogItem>, StoreError> {
        let row: Option<(i32, String, i64)> = sqlx::query_as(
            r#"
            SELECT item_id, name, price
            FROM merch_items
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, name, price)| -> Result<CatalogItem, StoreError> {
            let price = Coins::new(price).map_err(|e| {
                StoreError::InvalidData(format!("catalog item {}: {}", name, e))
            })?;
            Ok(CatalogItem { id, name, price })
        })
        .transpose()
    }

    async fn balance(&self, owner: Uuid) -> Result<Option<i64>, StoreError> {
        let balance: Option<i64> =
            sqlx::query_scalar("SELECT balance FROM wallets WHERE employee_id = $1")
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?;

        Ok(balance)
    }

    async fn inventory(&self, owner: Uuid) -> Result<Vec<InventoryItem>, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT m.name, SUM(p.quantity)::BIGINT AS quantity
            FROM purchases p
            JOIN merch_items m ON m.item_id = p.item_id
            WHERE p.employee_id = $1
            GROUP BY m.name
            ORDER BY m.name
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, quantity)| InventoryItem { name, quantity })
            .collect())
    }

    async fn sent_totals(&self, owner: Uuid) -> Result<Vec<CounterpartyTotal>, StoreError> {
        self.counterparty_totals(
            r#"
            SELECT e.username, SUM(t.amount)::BIGINT AS amount
            FROM transactions t
            JOIN employees e ON e.employee_id = t.receiver_id
            WHERE t.sender_id = $1
            GROUP BY e.username
            ORDER BY e.username
            "#,
            owner,
        )
        .await
    }

    async fn received_totals(&self, owner: Uuid) -> Result<Vec<CounterpartyTotal>, StoreError> {
        self.counterparty_totals(
            r#"
            SELECT e.username, SUM(t.amount)::BIGINT AS amount
            FROM transactions t
            JOIN employees e ON e.employee_id = t.sender_id
            WHERE t.receiver_id = $1
            GROUP BY e.username
            ORDER BY e.username
            "#,
            owner,
        )
        .await
    }

    async fn execute_transfer(
        &self,
        sender: Uuid,
        recipient: Uuid,
        amount: Coins,
    ) -> Result<TransferRecord, StoreError> {
        let mut tx = self.begin_serializable().await?;

        // Statement-level CHECK fires here if the sender would go negative
        Self::adjust_balance(&mut tx, sender, -amount.value()).await?;
        Self::adjust_balance(&mut tx, recipient, amount.value()).await?;

        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO transactions (sender_id, receiver_id, amount)
            VALUES ($1, $2, $3)
            RETURNING transaction_id, created_at
            "#,
        )
        .bind(sender)
        .bind(recipient)
        .bind(amount.value())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(TransferRecord {
            id,
            sender_id: sender,
            recipient_id: recipient,
            amount,
            created_at,
        })
    }

    async fn execute_purchase(
        &self,
        buyer: Uuid,
        item: &CatalogItem,
        quantity: Quantity,
        total: Coins,
    ) -> Result<PurchaseRecord, StoreError> {
        let mut tx = self.begin_serializable().await?;

        Self::adjust_balance(&mut tx, buyer, -total.value()).await?;

        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO purchases (employee_id, item_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING purchase_id, created_at
            "#,
        )
        .bind(buyer)
        .bind(item.id)
        .bind(quantity.value())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PurchaseRecord {
            id,
            buyer_id: buyer,
            item_id: item.id,
            quantity,
            total,
            created_at,
        })
    }
}
