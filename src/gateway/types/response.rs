//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiError` / `ApiResult`: handler error path
//! - `error_codes`: Standard error code constants
//! - Response DTOs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::account::Account;
use crate::error::LedgerError;
use crate::money::format_decimal;
use crate::transfer::Transfer;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 with data
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 with data
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = match &e {
            LedgerError::InvalidAmount(_) | LedgerError::InvalidIdentifier(_) => {
                error_codes::INVALID_PARAMETER
            }
            LedgerError::InsufficientFunds(_) => error_codes::INSUFFICIENT_BALANCE,
            LedgerError::SelfTransfer(_) => error_codes::SELF_TRANSFER,
            LedgerError::DuplicateAccount(_) => error_codes::DUPLICATE_ACCOUNT,
            LedgerError::AccountNotFound(_) => error_codes::ACCOUNT_NOT_FOUND,
            LedgerError::SourceAccountNotFound(_) => error_codes::SOURCE_ACCOUNT_NOT_FOUND,
            LedgerError::DestinationAccountNotFound(_) => {
                error_codes::DESTINATION_ACCOUNT_NOT_FOUND
            }
            LedgerError::TransferNotFound(_) => error_codes::TRANSFER_NOT_FOUND,
            LedgerError::VersionConflict { .. } => error_codes::CONFLICT,
            LedgerError::StorageContention(_) | LedgerError::StorageUnavailable(_) => {
                error_codes::SERVICE_UNAVAILABLE
            }
            LedgerError::Internal(_) => error_codes::INTERNAL_ERROR,
        };

        // Storage details stay in the logs
        let msg = match &e {
            LedgerError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                "internal error".to_string()
            }
            LedgerError::StorageContention(_) | LedgerError::StorageUnavailable(_) => {
                tracing::warn!(error = %e, "Storage unavailable");
                "service temporarily unavailable, retry later".to_string()
            }
            other => other.to_string(),
        };

        Self::new(status, code, msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.code, self.msg))).into_response()
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Account balance as a decimal string
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AccountResponse {
    #[schema(example = 123)]
    pub account_id: u64,
    #[schema(example = "100.23344")]
    pub balance: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            balance: format_decimal(&account.balance),
        }
    }
}

/// Committed transfer record
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TransferResponse {
    #[schema(example = 1)]
    pub transaction_id: u64,
    #[schema(example = 123)]
    pub source_account_id: u64,
    #[schema(example = 456)]
    pub destination_account_id: u64,
    #[schema(example = "100.12345")]
    pub amount: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Transfer> for TransferResponse {
    fn from(transfer: &Transfer) -> Self {
        Self {
            transaction_id: transfer.id,
            source_account_id: transfer.source_account_id,
            destination_account_id: transfer.destination_account_id,
            amount: format_decimal(&transfer.amount),
            created_at: transfer.created_at,
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const SELF_TRANSFER: i32 = 1003;
    pub const DUPLICATE_ACCOUNT: i32 = 1004;

    // Resource errors (4xxx)
    pub const ACCOUNT_NOT_FOUND: i32 = 4001;
    pub const TRANSFER_NOT_FOUND: i32 = 4002;
    pub const SOURCE_ACCOUNT_NOT_FOUND: i32 = 4003;
    pub const DESTINATION_ACCOUNT_NOT_FOUND: i32 = 4004;
    pub const CONFLICT: i32 = 4090;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}
