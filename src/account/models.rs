//! Data models for ledger accounts

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::core_types::{AccountId, Version};

/// Version assigned to a freshly created account
pub const INITIAL_VERSION: Version = 1;

/// Ledger account as last committed
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    /// Never negative in any committed state
    pub balance: BigDecimal,
    /// Optimistic concurrency token, see [`Version`]
    pub version: Version,
    pub created_at: DateTime<Utc>,
    /// LastModified timestamp, advanced together with `version`
    pub updated_at: DateTime<Utc>,
}

/// Validated account-creation input.
///
/// Fields are private to force construction through the validation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    id: AccountId,
    initial_balance: BigDecimal,
}

impl NewAccount {
    pub(crate) fn new(id: AccountId, initial_balance: BigDecimal) -> Self {
        Self {
            id,
            initial_balance,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn initial_balance(&self) -> &BigDecimal {
        &self.initial_balance
    }
}
