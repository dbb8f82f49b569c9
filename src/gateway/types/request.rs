//! Request bodies
//!
//! Amounts travel as JSON strings so no precision is lost to binary floats.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// POST /accounts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    #[schema(example = 123)]
    pub account_id: u64,
    /// Opening balance, decimal string, zero allowed
    #[schema(example = "100.23344")]
    pub initial_balance: String,
}

/// POST /transactions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransferRequest {
    #[schema(example = 123)]
    pub source_account_id: u64,
    #[schema(example = 456)]
    pub destination_account_id: u64,
    /// Strictly positive decimal string, at most 18 fractional digits
    #[schema(example = "100.12345")]
    pub amount: String,
}
