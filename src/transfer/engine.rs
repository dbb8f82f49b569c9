//! Transfer Engine
//!
//! Moves funds between two accounts with optimistic concurrency control.
//!
//! One attempt is one storage transaction:
//! 1. read source and destination together with their versions
//! 2. reject if the source cannot cover the amount
//! 3. conditionally update both rows in one statement, each guarded by the
//!    version read in step 1
//! 4. anything other than exactly two changed rows is a version conflict:
//!    roll back and let the retry policy start a fresh attempt
//! 5. append the transfer record and commit
//!
//! The engine holds no locks of its own. Transfers on disjoint accounts never
//! wait on each other; transfers sharing an account are serialized by the
//! row versions alone.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::types::{NewTransfer, Transfer, TransferIntent};
use crate::core_types::TransferId;
use crate::error::LedgerError;
use crate::retry::RetryPolicy;
use crate::store::{BalanceUpdate, LedgerStore, LedgerTx};

/// Both legs must change or the attempt is void
const EXPECTED_ROWS: u64 = 2;

#[derive(Clone)]
pub struct TransferEngine {
    store: Arc<dyn LedgerStore>,
    retry: RetryPolicy,
}

impl TransferEngine {
    pub fn new(store: Arc<dyn LedgerStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Execute a validated transfer, retrying transient failures.
    ///
    /// Terminal outcomes (missing account, insufficient funds) are returned
    /// on the first attempt that observes them. A conflict that persists past
    /// the attempt budget is returned as the last `VersionConflict`.
    pub async fn process_transfer(&self, intent: &TransferIntent) -> Result<Transfer, LedgerError> {
        let result = self
            .retry
            .run(
                |attempt| self.attempt(intent, attempt),
                LedgerError::is_retryable,
            )
            .await;

        match &result {
            Ok(record) => info!(
                transfer_id = record.id,
                source = intent.source(),
                destination = intent.destination(),
                amount = %intent.amount(),
                "Transfer committed"
            ),
            Err(e) if e.is_retryable() => warn!(
                source = intent.source(),
                destination = intent.destination(),
                error = %e,
                "Transfer gave up after retry budget"
            ),
            Err(e) => debug!(
                source = intent.source(),
                destination = intent.destination(),
                code = e.code(),
                "Transfer rejected"
            ),
        }

        result
    }

    /// Look up a committed transfer record
    pub async fn get_transfer(&self, id: TransferId) -> Result<Transfer, LedgerError> {
        self.store
            .get_transfer(id)
            .await?
            .ok_or(LedgerError::TransferNotFound(id))
    }

    async fn attempt(&self, intent: &TransferIntent, attempt: u32) -> Result<Transfer, LedgerError> {
        debug!(
            attempt,
            source = intent.source(),
            destination = intent.destination(),
            "Transfer attempt"
        );

        let mut tx = self.store.begin().await?;
        let outcome = Self::apply(tx.as_mut(), intent).await;
        match outcome {
            Ok(record) => {
                tx.commit().await.map_err(|e| {
                    error!(attempt, error = %e, "Transfer commit failed");
                    LedgerError::from(e)
                })?;
                Ok(record)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(attempt, error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn apply(tx: &mut dyn LedgerTx, intent: &TransferIntent) -> Result<Transfer, LedgerError> {
        let source = tx
            .get_account(intent.source())
            .await?
            .ok_or(LedgerError::SourceAccountNotFound(intent.source()))?;
        let destination = tx
            .get_account(intent.destination())
            .await?
            .ok_or(LedgerError::DestinationAccountNotFound(intent.destination()))?;

        // Exact balance is allowed to leave the account at zero
        if source.balance < *intent.amount() {
            return Err(LedgerError::InsufficientFunds(source.id));
        }

        let updates = [
            BalanceUpdate {
                account_id: source.id,
                expected_version: source.version,
                new_balance: &source.balance - intent.amount(),
            },
            BalanceUpdate {
                account_id: destination.id,
                expected_version: destination.version,
                new_balance: &destination.balance + intent.amount(),
            },
        ];

        let rows_changed = tx.apply_balance_updates(&updates).await?;
        if rows_changed != EXPECTED_ROWS {
            return Err(LedgerError::VersionConflict { rows_changed });
        }

        Ok(tx.insert_transfer(&NewTransfer::from(intent)).await?)
    }
}
