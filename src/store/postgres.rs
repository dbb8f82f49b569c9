//! PostgreSQL Ledger Store
//!
//! `accounts` rows carry a `version` column used as the optimistic
//! concurrency token. Both legs of a transfer are applied by ONE conditional
//! `UPDATE`, so a stale leg can never be written while the other succeeds.

use async_trait::async_trait;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};

use super::error::{ContentionPolicy, StoreError};
use super::{BalanceUpdate, LedgerStore, LedgerTx};
use crate::account::{Account, NewAccount, models::INITIAL_VERSION};
use crate::core_types::{AccountId, TransferId};
use crate::transfer::types::{NewTransfer, Transfer};

const SELECT_ACCOUNT: &str = r#"
    SELECT id, balance, version, created_at, updated_at
    FROM accounts
    WHERE id = $1
"#;

const SELECT_TRANSFER: &str = r#"
    SELECT id, source_account_id, destination_account_id, amount, created_at
    FROM transfers
    WHERE id = $1
"#;

/// Two-row compare-and-swap. A row is changed only if its id AND version
/// match; the caller inspects `rows_affected()` instead of trusting it.
const CAS_BALANCES: &str = r#"
    UPDATE accounts
    SET balance = CASE
            WHEN id = $1 THEN $3
            WHEN id = $4 THEN $6
            ELSE balance
        END,
        version = version + 1,
        updated_at = NOW()
    WHERE (id = $1 AND version = $2)
       OR (id = $4 AND version = $5)
"#;

/// PostgreSQL-backed [`LedgerStore`]
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
    policy: ContentionPolicy,
    lock_timeout_ms: u64,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool, policy: ContentionPolicy) -> Self {
        Self {
            pool,
            policy,
            lock_timeout_ms: 0,
        }
    }

    /// Bound how long a transfer waits on a row lock (SQLSTATE 55P03 on expiry)
    pub fn with_lock_timeout(mut self, lock_timeout_ms: u64) -> Self {
        self.lock_timeout_ms = lock_timeout_ms;
        self
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.policy.classify(e))?;

        if self.lock_timeout_ms > 0 {
            // SET does not take bind parameters; the value is an integer
            let stmt = format!("SET LOCAL lock_timeout = {}", self.lock_timeout_ms);
            sqlx::query(&stmt)
                .execute(&mut *tx)
                .await
                .map_err(|e| self.policy.classify(e))?;
        }

        Ok(Box::new(PgLedgerTx {
            tx: Some(tx),
            policy: self.policy.clone(),
        }))
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(SELECT_ACCOUNT)
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.policy.classify(e))?;

        row.map(|r| row_to_account(&r))
            .transpose()
            .map_err(|e| self.policy.classify(e))
    }

    async fn insert_account(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (id, balance, version, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, balance, version, created_at, updated_at
            "#,
        )
        .bind(account.id() as i64)
        .bind(account.initial_balance())
        .bind(INITIAL_VERSION as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| self.policy.classify(e))?;

        row_to_account(&row).map_err(|e| self.policy.classify(e))
    }

    async fn get_transfer(&self, id: TransferId) -> Result<Option<Transfer>, StoreError> {
        let row = sqlx::query(SELECT_TRANSFER)
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.policy.classify(e))?;

        row.map(|r| row_to_transfer(&r))
            .transpose()
            .map_err(|e| self.policy.classify(e))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| self.policy.classify(e))?;
        Ok(())
    }
}

/// One transfer attempt. Dropped without commit = rolled back by sqlx.
pub struct PgLedgerTx {
    tx: Option<Transaction<'static, Postgres>>,
    policy: ContentionPolicy,
}

impl PgLedgerTx {
    fn conn(&mut self) -> Result<&mut PgConnection, StoreError> {
        self.tx
            .as_mut()
            .map(|tx| &mut **tx)
            .ok_or(StoreError::TransactionClosed)
    }
}

#[async_trait]
impl LedgerTx for PgLedgerTx {
    async fn get_account(&mut self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let policy = self.policy.clone();
        let row = sqlx::query(SELECT_ACCOUNT)
            .bind(id as i64)
            .fetch_optional(self.conn()?)
            .await
            .map_err(|e| policy.classify(e))?;

        row.map(|r| row_to_account(&r))
            .transpose()
            .map_err(|e| policy.classify(e))
    }

    async fn apply_balance_updates(
        &mut self,
        updates: &[BalanceUpdate; 2],
    ) -> Result<u64, StoreError> {
        let policy = self.policy.clone();
        let [first, second] = updates;
        let result = sqlx::query(CAS_BALANCES)
            .bind(first.account_id as i64)
            .bind(first.expected_version as i64)
            .bind(&first.new_balance)
            .bind(second.account_id as i64)
            .bind(second.expected_version as i64)
            .bind(&second.new_balance)
            .execute(self.conn()?)
            .await
            .map_err(|e| policy.classify(e))?;

        Ok(result.rows_affected())
    }

    async fn insert_transfer(&mut self, transfer: &NewTransfer) -> Result<Transfer, StoreError> {
        let policy = self.policy.clone();
        let row = sqlx::query(
            r#"
            INSERT INTO transfers (source_account_id, destination_account_id, amount, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, source_account_id, destination_account_id, amount, created_at
            "#,
        )
        .bind(transfer.source_account_id as i64)
        .bind(transfer.destination_account_id as i64)
        .bind(&transfer.amount)
        .fetch_one(self.conn()?)
        .await
        .map_err(|e| policy.classify(e))?;

        row_to_transfer(&row).map_err(|e| policy.classify(e))
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let tx = self.tx.take().ok_or(StoreError::TransactionClosed)?;
        tx.commit().await.map_err(|e| self.policy.classify(e))
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        let tx = self.tx.take().ok_or(StoreError::TransactionClosed)?;
        tx.rollback().await.map_err(|e| self.policy.classify(e))
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get::<i64, _>("id")? as u64,
        balance: row.try_get("balance")?,
        version: row.try_get::<i64, _>("version")? as u64,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_transfer(row: &PgRow) -> Result<Transfer, sqlx::Error> {
    Ok(Transfer {
        id: row.try_get::<i64, _>("id")? as u64,
        source_account_id: row.try_get::<i64, _>("source_account_id")? as u64,
        destination_account_id: row.try_get::<i64, _>("destination_account_id")? as u64,
        amount: row.try_get("amount")?,
        created_at: row.try_get("created_at")?,
    })
}
