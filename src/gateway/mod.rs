//! HTTP Gateway
//!
//! Thin axum shell around the ledger: parse, validate, call, wrap.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use state::AppState;

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/accounts", post(handlers::create_account))
        .route("/accounts/{account_id}", get(handlers::get_account))
        .route("/transactions", post(handlers::create_transfer))
        .route("/transactions/{transaction_id}", get(handlers::get_transfer))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Serve until Ctrl-C. In-flight transfers finish or roll back with their
/// storage transaction; none is left half-applied.
pub async fn run_server(address: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(address).await?;
    tracing::info!(address, "Gateway listening");
    tracing::info!("API docs at http://{}/docs", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::handlers::{create_account, create_transfer, get_account, get_transfer, health_check};
    use super::state::AppState;
    use super::types::{CreateAccountRequest, TransferRequest, error_codes};
    use crate::retry::RetryPolicy;
    use crate::store::MemoryLedgerStore;
    use axum::Json;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use std::sync::Arc;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Arc::new(MemoryLedgerStore::new()),
            RetryPolicy::no_delay(5),
        ))
    }

    async fn open(state: &Arc<AppState>, id: u64, balance: &str) {
        let (status, _) = create_account(
            State(state.clone()),
            Ok(Json(CreateAccountRequest {
                account_id: id,
                initial_balance: balance.to_string(),
            })),
        )
        .await
        .expect("account created");
        assert_eq!(status, StatusCode::CREATED);
    }

    fn transfer(source: u64, destination: u64, amount: &str) -> TransferRequest {
        TransferRequest {
            source_account_id: source,
            destination_account_id: destination,
            amount: amount.to_string(),
        }
    }

    #[test]
    fn test_router_builds() {
        let _ = super::build_router(state());
    }

    #[tokio::test]
    async fn test_create_and_get_account() {
        let state = state();
        open(&state, 123, "100.23344").await;

        let (status, Json(body)) = get_account(State(state), Path("123".to_string()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.code, error_codes::SUCCESS);
        let data = body.data.unwrap();
        assert_eq!(data.account_id, 123);
        assert_eq!(data.balance, "100.23344");
    }

    #[tokio::test]
    async fn test_duplicate_account_is_bad_request() {
        let state = state();
        open(&state, 1, "10").await;

        let err = create_account(
            State(state),
            Ok(Json(CreateAccountRequest {
                account_id: 1,
                initial_balance: "20".to_string(),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, error_codes::DUPLICATE_ACCOUNT);
    }

    #[tokio::test]
    async fn test_get_account_errors() {
        let state = state();
        let err = get_account(State(state.clone()), Path("999".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = get_account(State(state), Path("abc".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_transfer_roundtrip() {
        let state = state();
        open(&state, 1, "1000").await;
        open(&state, 2, "1000").await;

        let (status, Json(body)) =
            create_transfer(State(state.clone()), Ok(Json(transfer(1, 2, "100.12345"))))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let record = body.data.unwrap();
        assert_eq!(record.amount, "100.12345");

        let (_, Json(body)) = get_transfer(
            State(state.clone()),
            Path(record.transaction_id.to_string()),
        )
        .await
        .unwrap();
        assert_eq!(body.data.unwrap(), record);

        let (_, Json(body)) = get_account(State(state), Path("1".to_string()))
            .await
            .unwrap();
        assert_eq!(body.data.unwrap().balance, "899.87655");
    }

    #[tokio::test]
    async fn test_transfer_error_statuses() {
        let state = state();
        open(&state, 1, "10").await;
        open(&state, 2, "0").await;

        let cases = [
            (transfer(1, 1, "1"), StatusCode::BAD_REQUEST, error_codes::SELF_TRANSFER),
            (transfer(1, 2, "0"), StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER),
            (transfer(1, 2, "1e2"), StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER),
            (
                transfer(9, 2, "1"),
                StatusCode::NOT_FOUND,
                error_codes::SOURCE_ACCOUNT_NOT_FOUND,
            ),
            (
                transfer(1, 9, "1"),
                StatusCode::NOT_FOUND,
                error_codes::DESTINATION_ACCOUNT_NOT_FOUND,
            ),
            (
                transfer(1, 2, "10.01"),
                StatusCode::UNPROCESSABLE_ENTITY,
                error_codes::INSUFFICIENT_BALANCE,
            ),
        ];

        for (req, status, code) in cases {
            let err = create_transfer(State(state.clone()), Ok(Json(req.clone())))
                .await
                .unwrap_err();
            assert_eq!((err.status, err.code), (status, code), "{:?}", req);
        }
    }

    #[tokio::test]
    async fn test_get_transfer_not_found() {
        let err = get_transfer(State(state()), Path("42".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_ok() {
        let (status, Json(body)) = health_check(State(state())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.data.unwrap().timestamp_ms > 0);
    }
}
