//! Ledger Store
//!
//! Durable keyed storage for accounts plus the append-only transfer log.
//!
//! # Contract
//!
//! The transfer engine needs four primitives from storage:
//! - point read by key ([`LedgerStore::get_account`], [`LedgerTx::get_account`])
//! - insert with uniqueness check ([`LedgerStore::insert_account`])
//! - a two-row conditional update that reports how many rows it changed
//!   ([`LedgerTx::apply_balance_updates`])
//! - an insert in the same transaction, made visible together with the
//!   update on [`LedgerTx::commit`] or not at all
//!
//! Reads outside a transaction only ever observe committed state.
//! Dropping a [`LedgerTx`] without committing rolls it back.

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::{ContentionPolicy, StoreError};
pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::account::{Account, NewAccount};
use crate::core_types::{AccountId, TransferId, Version};
use crate::transfer::types::{NewTransfer, Transfer};

/// One leg of a conditional balance update.
///
/// Applied only if the row's version still equals `expected_version`;
/// on success the version advances by one.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceUpdate {
    pub account_id: AccountId,
    pub expected_version: Version,
    pub new_balance: BigDecimal,
}

/// Store handle shared by the repository, the engine and the gateway
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Open a storage transaction for one transfer attempt
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError>;

    /// Committed state of an account
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Insert a new account; `StoreError::Duplicate` if the id exists
    async fn insert_account(&self, account: &NewAccount) -> Result<Account, StoreError>;

    async fn get_transfer(&self, id: TransferId) -> Result<Option<Transfer>, StoreError>;

    /// Liveness probe for health checks
    async fn ping(&self) -> Result<(), StoreError>;
}

/// A single storage transaction
#[async_trait]
pub trait LedgerTx: Send {
    async fn get_account(&mut self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Compare-and-swap both legs in one statement.
    ///
    /// Returns the number of rows whose version predicate held and which
    /// were therefore changed. Rows whose predicate failed are untouched.
    async fn apply_balance_updates(
        &mut self,
        updates: &[BalanceUpdate; 2],
    ) -> Result<u64, StoreError>;

    async fn insert_transfer(&mut self, transfer: &NewTransfer) -> Result<Transfer, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    async fn rollback(&mut self) -> Result<(), StoreError>;
}
