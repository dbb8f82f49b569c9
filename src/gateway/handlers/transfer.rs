//! Transfer handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, TransferRequest, TransferResponse, created, ok};
use super::reject_body;
use crate::error::LedgerError;
use crate::validation::validate_transfer;

/// Move funds between two accounts
///
/// POST /transactions
#[utoipa::path(
    post,
    path = "/transactions",
    request_body = TransferRequest,
    responses(
        (status = 201, description = "Transfer committed", body = TransferResponse, content_type = "application/json"),
        (status = 400, description = "Invalid amount or self-transfer"),
        (status = 404, description = "Source or destination account not found"),
        (status = 409, description = "Concurrent updates kept conflicting; safe to retry"),
        (status = 422, description = "Insufficient funds"),
        (status = 503, description = "Storage unavailable; safe to retry")
    ),
    tag = "Transfer"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<TransferResponse> {
    let Json(req) = body.map_err(reject_body)?;
    let intent = validate_transfer(&req)?;
    let transfer = state.engine.process_transfer(&intent).await?;
    created(TransferResponse::from(&transfer))
}

/// Fetch a committed transfer record
///
/// GET /transactions/{transaction_id}
#[utoipa::path(
    get,
    path = "/transactions/{transaction_id}",
    params(
        ("transaction_id" = u64, Path, description = "Transfer ID")
    ),
    responses(
        (status = 200, description = "Transfer record", body = TransferResponse, content_type = "application/json"),
        (status = 400, description = "Malformed transfer id"),
        (status = 404, description = "Transfer not found")
    ),
    tag = "Transfer"
)]
pub async fn get_transfer(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> ApiResult<TransferResponse> {
    let id: u64 = transaction_id.parse().map_err(|_| {
        ApiError::bad_request(format!("invalid transaction id: {:?}", transaction_id))
    })?;
    if id == 0 || id > crate::core_types::MAX_STORABLE_ID {
        return Err(LedgerError::TransferNotFound(id).into());
    }
    let transfer = state.engine.get_transfer(id).await?;
    ok(TransferResponse::from(&transfer))
}
