//! In-memory Ledger Store
//!
//! Same contract as the PostgreSQL store, used by unit tests and local runs
//! without a database. Rows touched by an uncommitted transaction are held
//! by that transaction until it commits or rolls back; another transaction's
//! conditional update does not match a held row, the same outcome PostgreSQL
//! produces once the holder commits a new version.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::StoreError;
use super::{BalanceUpdate, LedgerStore, LedgerTx};
use crate::account::{Account, NewAccount, models::INITIAL_VERSION};
use crate::core_types::{AccountId, TransferId};
use crate::transfer::types::{NewTransfer, Transfer};

type TxId = u64;

struct Row {
    account: Account,
    held_by: Option<TxId>,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<AccountId, Row>,
    transfers: BTreeMap<TransferId, Transfer>,
    next_tx: TxId,
    last_transfer_id: TransferId,
}

impl Inner {
    fn release(&mut self, tx: TxId) {
        for row in self.accounts.values_mut() {
            if row.held_by == Some(tx) {
                row.held_by = None;
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed transfer records
    pub fn transfer_count(&self) -> usize {
        lock(&self.inner).transfers.len()
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    // No guard is ever held across a partial mutation, so poison is ignorable
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError> {
        let id = {
            let mut inner = lock(&self.inner);
            inner.next_tx += 1;
            inner.next_tx
        };
        Ok(Box::new(MemoryTx {
            id,
            inner: Arc::clone(&self.inner),
            staged: HashMap::new(),
            pending: Vec::new(),
            finished: false,
        }))
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(lock(&self.inner)
            .accounts
            .get(&id)
            .map(|row| row.account.clone()))
    }

    async fn insert_account(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let mut inner = lock(&self.inner);
        if inner.accounts.contains_key(&account.id()) {
            return Err(StoreError::Duplicate(format!(
                "account {} already exists",
                account.id()
            )));
        }

        let now = Utc::now();
        let created = Account {
            id: account.id(),
            balance: account.initial_balance().clone(),
            version: INITIAL_VERSION,
            created_at: now,
            updated_at: now,
        };
        inner.accounts.insert(
            created.id,
            Row {
                account: created.clone(),
                held_by: None,
            },
        );
        Ok(created)
    }

    async fn get_transfer(&self, id: TransferId) -> Result<Option<Transfer>, StoreError> {
        Ok(lock(&self.inner).transfers.get(&id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub struct MemoryTx {
    id: TxId,
    inner: Arc<Mutex<Inner>>,
    /// Post-images of rows this transaction changed
    staged: HashMap<AccountId, Account>,
    pending: Vec<Transfer>,
    finished: bool,
}

impl MemoryTx {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.finished {
            Err(StoreError::TransactionClosed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LedgerTx for MemoryTx {
    async fn get_account(&mut self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.ensure_open()?;
        if let Some(staged) = self.staged.get(&id) {
            return Ok(Some(staged.clone()));
        }
        Ok(lock(&self.inner)
            .accounts
            .get(&id)
            .map(|row| row.account.clone()))
    }

    async fn apply_balance_updates(
        &mut self,
        updates: &[BalanceUpdate; 2],
    ) -> Result<u64, StoreError> {
        self.ensure_open()?;
        let mut inner = lock(&self.inner);
        let now = Utc::now();
        let mut changed = 0;

        for update in updates {
            let Some(row) = inner.accounts.get_mut(&update.account_id) else {
                continue;
            };
            let held_by_other = row.held_by.is_some_and(|holder| holder != self.id);
            let current_version = self
                .staged
                .get(&update.account_id)
                .map_or(row.account.version, |staged| staged.version);
            if held_by_other || current_version != update.expected_version {
                continue;
            }

            row.held_by = Some(self.id);
            let mut image = self
                .staged
                .get(&update.account_id)
                .cloned()
                .unwrap_or_else(|| row.account.clone());
            image.balance = update.new_balance.clone();
            image.version += 1;
            image.updated_at = now;
            self.staged.insert(update.account_id, image);
            changed += 1;
        }

        Ok(changed)
    }

    async fn insert_transfer(&mut self, transfer: &NewTransfer) -> Result<Transfer, StoreError> {
        self.ensure_open()?;
        let id = {
            let mut inner = lock(&self.inner);
            // Like a sequence, ids are consumed even if the transaction rolls back
            inner.last_transfer_id += 1;
            inner.last_transfer_id
        };
        let record = Transfer {
            id,
            source_account_id: transfer.source_account_id,
            destination_account_id: transfer.destination_account_id,
            amount: transfer.amount.clone(),
            created_at: Utc::now(),
        };
        self.pending.push(record.clone());
        Ok(record)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut inner = lock(&self.inner);
        for (id, image) in self.staged.drain() {
            if let Some(row) = inner.accounts.get_mut(&id) {
                row.account = image;
            }
        }
        for record in self.pending.drain(..) {
            inner.transfers.insert(record.id, record);
        }
        inner.release(self.id);
        self.finished = true;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.staged.clear();
        self.pending.clear();
        lock(&self.inner).release(self.id);
        self.finished = true;
        Ok(())
    }
}

impl Drop for MemoryTx {
    fn drop(&mut self) {
        if !self.finished {
            lock(&self.inner).release(self.id);
        }
    }
}
