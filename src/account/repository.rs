//! Account repository
//!
//! Keyed create and read on top of the ledger store. Plain reads see the
//! last committed state of an account, never a half-applied transfer.

use std::sync::Arc;

use super::models::{Account, NewAccount};
use crate::core_types::AccountId;
use crate::error::LedgerError;
use crate::store::{LedgerStore, StoreError};

#[derive(Clone)]
pub struct AccountRepository {
    store: Arc<dyn LedgerStore>,
}

impl AccountRepository {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Create an account with its opening balance
    pub async fn create(&self, account: &NewAccount) -> Result<Account, LedgerError> {
        match self.store.insert_account(account).await {
            Ok(created) => {
                tracing::info!(
                    account_id = created.id,
                    balance = %created.balance,
                    "Account created"
                );
                Ok(created)
            }
            Err(StoreError::Duplicate(_)) => Err(LedgerError::DuplicateAccount(account.id())),
            Err(e) => {
                tracing::error!(account_id = account.id(), error = %e, "Account insert failed");
                Err(e.into())
            }
        }
    }

    /// Get an account by ID
    pub async fn get(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store
            .get_account(id)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLedgerStore;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn repo() -> AccountRepository {
        AccountRepository::new(Arc::new(MemoryLedgerStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = repo();
        let created = repo
            .create(&NewAccount::new(123, BigDecimal::from_str("100.23344").unwrap()))
            .await
            .unwrap();
        assert_eq!(created.version, 1);

        let fetched = repo.get(123).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_account() {
        let repo = repo();
        let account = NewAccount::new(7, BigDecimal::from(10));
        repo.create(&account).await.unwrap();

        let err = repo
            .create(&NewAccount::new(7, BigDecimal::from(99)))
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateAccount(7));
        assert_eq!(repo.get(7).await.unwrap().balance, BigDecimal::from(10));
    }

    #[tokio::test]
    async fn test_get_missing_account() {
        let err = repo().get(404).await.unwrap_err();
        assert_eq!(err, LedgerError::AccountNotFound(404));
    }
}
