//! Transfer Core Types

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::core_types::{AccountId, TransferId};

/// Validated transfer intent handed to the engine.
///
/// The engine trusts these preconditions and never re-checks them:
/// - `amount > 0`, exact decimal with at most 18 fractional digits
/// - `source != destination`
///
/// Fields are private to force construction through
/// [`crate::validation::validate_transfer`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransferIntent {
    source: AccountId,
    destination: AccountId,
    amount: BigDecimal,
}

impl TransferIntent {
    pub(crate) fn new(source: AccountId, destination: AccountId, amount: BigDecimal) -> Self {
        Self {
            source,
            destination,
            amount,
        }
    }

    pub fn source(&self) -> AccountId {
        self.source
    }

    pub fn destination(&self) -> AccountId {
        self.destination
    }

    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }
}

/// Transfer row to append inside the committing transaction
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: BigDecimal,
}

impl From<&TransferIntent> for NewTransfer {
    fn from(intent: &TransferIntent) -> Self {
        Self {
            source_account_id: intent.source,
            destination_account_id: intent.destination,
            amount: intent.amount.clone(),
        }
    }
}

/// Committed transfer record (append-only)
///
/// Exists if and only if the matching balance mutation was committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub id: TransferId,
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_transfer_from_intent() {
        let intent = TransferIntent::new(3, 4, BigDecimal::from_str("0.5").unwrap());
        let row = NewTransfer::from(&intent);
        assert_eq!(row.source_account_id, 3);
        assert_eq!(row.destination_account_id, 4);
        assert_eq!(row.amount, BigDecimal::from_str("0.5").unwrap());
    }
}
