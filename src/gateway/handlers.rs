//! HTTP handlers
//!
//! Each handler validates, calls one ledger operation and wraps the result
//! in [`ApiResponse`](super::types::ApiResponse).

pub mod account;
pub mod health;
pub mod transfer;

pub use account::{create_account, get_account};
pub use health::{HealthResponse, health_check};
pub use transfer::{create_transfer, get_transfer};

use axum::extract::rejection::JsonRejection;

use super::types::ApiError;

/// Malformed bodies get the same envelope as every other error
fn reject_body(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}
