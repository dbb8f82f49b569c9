//! Input validation
//!
//! Turns raw requests into the preconditions the transfer engine trusts.
//! Nothing here touches storage.

use crate::account::NewAccount;
use crate::core_types::{AccountId, MAX_STORABLE_ID};
use crate::error::LedgerError;
use crate::gateway::types::{CreateAccountRequest, TransferRequest};
use crate::money::{self, MoneyError};
use crate::transfer::types::TransferIntent;

/// Account ids are positive and must fit the BIGINT key column
pub fn check_account_id(id: AccountId) -> Result<AccountId, LedgerError> {
    if id == 0 {
        return Err(LedgerError::InvalidIdentifier(
            "account id must be greater than 0".to_string(),
        ));
    }
    if id > MAX_STORABLE_ID {
        return Err(LedgerError::InvalidIdentifier(format!(
            "account id must not exceed {}",
            MAX_STORABLE_ID
        )));
    }
    Ok(id)
}

/// Parse an account id taken from a URL path segment
pub fn parse_account_id(raw: &str) -> Result<AccountId, LedgerError> {
    let id = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| LedgerError::InvalidIdentifier(format!("invalid account id: {:?}", raw)))?;
    check_account_id(id)
}

pub fn validate_create_account(req: &CreateAccountRequest) -> Result<NewAccount, LedgerError> {
    let id = check_account_id(req.account_id)?;
    let balance = money::parse_balance(&req.initial_balance).map_err(|e| match e {
        MoneyError::Negative => {
            LedgerError::InvalidAmount("initial balance must be non-negative".to_string())
        }
        other => LedgerError::InvalidAmount(format!("invalid initial balance: {}", other)),
    })?;
    Ok(NewAccount::new(id, balance))
}

pub fn validate_transfer(req: &TransferRequest) -> Result<TransferIntent, LedgerError> {
    let amount = money::parse_amount(&req.amount).map_err(|e| match e {
        MoneyError::NotPositive | MoneyError::Negative => {
            LedgerError::InvalidAmount("amount must be greater than zero".to_string())
        }
        other => LedgerError::InvalidAmount(format!("invalid amount format: {}", other)),
    })?;

    if req.source_account_id == req.destination_account_id {
        return Err(LedgerError::SelfTransfer(req.source_account_id));
    }

    let source = check_account_id(req.source_account_id)?;
    let destination = check_account_id(req.destination_account_id)?;
    Ok(TransferIntent::new(source, destination, amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn create(id: u64, balance: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            account_id: id,
            initial_balance: balance.to_string(),
        }
    }

    fn transfer(source: u64, destination: u64, amount: &str) -> TransferRequest {
        TransferRequest {
            source_account_id: source,
            destination_account_id: destination,
            amount: amount.to_string(),
        }
    }

    #[test]
    fn test_create_account_valid() {
        let account = validate_create_account(&create(1, "100.50")).unwrap();
        assert_eq!(account.id(), 1);
        assert_eq!(
            account.initial_balance(),
            &BigDecimal::from_str("100.50").unwrap()
        );
    }

    #[test]
    fn test_create_account_zero_balance_allowed() {
        assert!(validate_create_account(&create(1, "0")).is_ok());
    }

    #[test]
    fn test_create_account_rejects_zero_id() {
        let err = validate_create_account(&create(0, "100")).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_create_account_rejects_unstorable_id() {
        let err = validate_create_account(&create(u64::MAX, "100")).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidIdentifier(_)));
        assert!(validate_create_account(&create(MAX_STORABLE_ID, "1")).is_ok());
    }

    #[test]
    fn test_create_account_rejects_bad_balance() {
        let err = validate_create_account(&create(1, "abc")).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let err = validate_create_account(&create(1, "-10")).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidAmount("initial balance must be non-negative".to_string())
        );
    }

    #[test]
    fn test_transfer_valid() {
        let intent = validate_transfer(&transfer(1, 2, "100.23344")).unwrap();
        assert_eq!(intent.source(), 1);
        assert_eq!(intent.destination(), 2);
        assert_eq!(intent.amount(), &BigDecimal::from_str("100.23344").unwrap());
    }

    #[test]
    fn test_transfer_rejects_non_positive_amount() {
        for amount in ["0", "0.000", "-10"] {
            let err = validate_transfer(&transfer(1, 2, amount)).unwrap_err();
            assert_eq!(
                err,
                LedgerError::InvalidAmount("amount must be greater than zero".to_string()),
                "amount {:?}",
                amount
            );
        }
    }

    #[test]
    fn test_transfer_rejects_malformed_amount() {
        for amount in ["", "abc", ".5", "5.", "1e3", "0.0000000000000000001"] {
            let err = validate_transfer(&transfer(1, 2, amount)).unwrap_err();
            assert!(
                matches!(err, LedgerError::InvalidAmount(_)),
                "amount {:?}",
                amount
            );
        }
    }

    #[test]
    fn test_transfer_rejects_self_transfer() {
        let err = validate_transfer(&transfer(1, 1, "100")).unwrap_err();
        assert_eq!(err, LedgerError::SelfTransfer(1));
    }

    #[test]
    fn test_amount_checked_before_self_transfer() {
        let err = validate_transfer(&transfer(1, 1, "-1")).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }

    #[test]
    fn test_parse_account_id() {
        assert_eq!(parse_account_id("42"), Ok(42));
        assert!(matches!(
            parse_account_id("0"),
            Err(LedgerError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            parse_account_id("-1"),
            Err(LedgerError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            parse_account_id("abc"),
            Err(LedgerError::InvalidIdentifier(_))
        ));
    }
}
