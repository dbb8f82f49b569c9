//! Gateway types module
//!
//! ## Input Types
//! - [`CreateAccountRequest`], [`TransferRequest`]: raw JSON bodies, checked
//!   by [`crate::validation`] before anything reaches storage
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: Error half of every handler result
//!
//! ## Submodules
//! - [`request`]: Request bodies
//! - [`response`]: Response envelope, DTOs and error codes

pub mod request;
pub mod response;

// Re-export commonly used types at module root
pub use request::{CreateAccountRequest, TransferRequest};
pub use response::{
    AccountResponse, ApiError, ApiResponse, ApiResult, TransferResponse, created, error_codes, ok,
};
