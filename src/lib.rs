//! Ledger Transfers - account balances with atomic, optimistically
//! concurrent transfers on PostgreSQL.
//!
//! # Modules
//!
//! - [`core_types`] - Identifier and version aliases
//! - [`money`] - Exact decimal parsing and formatting
//! - [`error`] - Ledger error taxonomy
//! - [`store`] - Storage seam with PostgreSQL and in-memory backends
//! - [`account`] - Account records and repository
//! - [`retry`] - Bounded exponential backoff with jitter
//! - [`transfer`] - Transfer engine
//! - [`validation`] - Request checks ahead of the engine
//! - [`gateway`] - HTTP API
//! - [`db`] - Connection pool and schema bootstrap

// Core types - must be first!
pub mod core_types;

pub mod account;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod money;
pub mod retry;
pub mod store;
pub mod transfer;
pub mod validation;

// Convenient re-exports at crate root
pub use account::{Account, AccountRepository, NewAccount};
pub use core_types::{AccountId, TransferId, Version};
pub use error::LedgerError;
pub use retry::RetryPolicy;
pub use store::{LedgerStore, MemoryLedgerStore, PgLedgerStore};
pub use transfer::{Transfer, TransferEngine, TransferIntent};
