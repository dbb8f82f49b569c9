//! Account handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::super::state::AppState;
use super::super::types::{AccountResponse, ApiResult, CreateAccountRequest, created, ok};
use super::reject_body;
use crate::validation::{parse_account_id, validate_create_account};

/// Create an account with an opening balance
///
/// POST /accounts
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse, content_type = "application/json"),
        (status = 400, description = "Invalid id or balance, or account already exists"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "Account"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<AccountResponse> {
    let Json(req) = body.map_err(reject_body)?;
    let new_account = validate_create_account(&req)?;
    let account = state.accounts.create(&new_account).await?;
    created(AccountResponse::from(&account))
}

/// Get the current balance of an account
///
/// GET /accounts/{account_id}
#[utoipa::path(
    get,
    path = "/accounts/{account_id}",
    params(
        ("account_id" = u64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account balance", body = AccountResponse, content_type = "application/json"),
        (status = 400, description = "Malformed account id"),
        (status = 404, description = "Account not found")
    ),
    tag = "Account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> ApiResult<AccountResponse> {
    let id = parse_account_id(&account_id)?;
    let account = state.accounts.get(id).await?;
    ok(AccountResponse::from(&account))
}
