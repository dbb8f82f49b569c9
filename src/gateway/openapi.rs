//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    AccountResponse, CreateAccountRequest, TransferRequest, TransferResponse,
};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ledger Transfers API",
        version = "1.0.0",
        description = "Account balances and atomic transfers with optimistic concurrency control.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::account::create_account,
        crate::gateway::handlers::account::get_account,
        crate::gateway::handlers::transfer::create_transfer,
        crate::gateway::handlers::transfer::get_transfer,
    ),
    components(
        schemas(
            HealthResponse,
            CreateAccountRequest,
            AccountResponse,
            TransferRequest,
            TransferResponse,
        )
    ),
    tags(
        (name = "Account", description = "Account creation and balance queries"),
        (name = "Transfer", description = "Transfers between accounts"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
