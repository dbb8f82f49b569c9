//! Ledger Error Types
//!
//! One taxonomy for account creation, lookups and transfers. Every variant
//! has a stable string code and an HTTP status suggestion, and is either
//! terminal (will never succeed if retried) or transient (may succeed).

use thiserror::Error;

use crate::core_types::{AccountId, TransferId};
use crate::store::StoreError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    // === Validation Errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid account identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Source and destination accounts must be different (account {0})")]
    SelfTransfer(AccountId),

    // === Account Errors ===
    #[error("Account {0} already exists")]
    DuplicateAccount(AccountId),

    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    #[error("Source account {0} not found")]
    SourceAccountNotFound(AccountId),

    #[error("Destination account {0} not found")]
    DestinationAccountNotFound(AccountId),

    #[error("Insufficient funds in account {0}")]
    InsufficientFunds(AccountId),

    #[error("Transfer {0} not found")]
    TransferNotFound(TransferId),

    // === Transient Errors ===
    /// The conditional update changed fewer than both rows
    #[error("Account version mismatch ({rows_changed} of 2 rows updated)")]
    VersionConflict { rows_changed: u64 },

    /// Lock timeout, serialization failure or deadlock reported by storage
    #[error("Storage contention: {0}")]
    StorageContention(String),

    // === System Errors ===
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            LedgerError::SelfTransfer(_) => "SELF_TRANSFER",
            LedgerError::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::SourceAccountNotFound(_) => "SOURCE_ACCOUNT_NOT_FOUND",
            LedgerError::DestinationAccountNotFound(_) => "DESTINATION_ACCOUNT_NOT_FOUND",
            LedgerError::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            LedgerError::TransferNotFound(_) => "TRANSFER_NOT_FOUND",
            LedgerError::VersionConflict { .. } => "VERSION_CONFLICT",
            LedgerError::StorageContention(_) => "STORAGE_CONTENTION",
            LedgerError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            LedgerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::InvalidAmount(_)
            | LedgerError::InvalidIdentifier(_)
            | LedgerError::SelfTransfer(_)
            | LedgerError::DuplicateAccount(_) => 400,
            LedgerError::AccountNotFound(_)
            | LedgerError::SourceAccountNotFound(_)
            | LedgerError::DestinationAccountNotFound(_)
            | LedgerError::TransferNotFound(_) => 404,
            LedgerError::InsufficientFunds(_) => 422,
            LedgerError::VersionConflict { .. } => 409,
            LedgerError::StorageContention(_) | LedgerError::StorageUnavailable(_) => 503,
            LedgerError::Internal(_) => 500,
        }
    }

    /// Transient errors are retried inside the engine and may succeed if the
    /// caller tries again once the budget is exhausted.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LedgerError::VersionConflict { .. } | LedgerError::StorageContention(_)
        )
    }
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Contention { code, message } => {
                LedgerError::StorageContention(format!("SQLSTATE {}: {}", code, message))
            }
            StoreError::Unavailable(msg) => LedgerError::StorageUnavailable(msg),
            StoreError::Duplicate(msg)
            | StoreError::Database(msg)
            | StoreError::Corrupt(msg) => LedgerError::Internal(msg),
            StoreError::TransactionClosed => {
                LedgerError::Internal("transaction already finished".to_string())
            }
        }
    }
}
