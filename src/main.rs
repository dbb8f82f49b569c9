//! Ledger Transfers - HTTP service entry point
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌──────────┐    ┌────────────┐
//! │ Gateway  │───▶│ Validation │───▶│  Engine  │───▶│ PostgreSQL │
//! │  (axum)  │    │            │    │  (OCC)   │    │  (sqlx)    │
//! └──────────┘    └────────────┘    └──────────┘    └────────────┘
//! ```
//!
//! Usage: `ledger_transfers [--env dev] [--port 8080]`

use std::sync::Arc;

use anyhow::Context;

use ledger_transfers::config::AppConfig;
use ledger_transfers::db::Database;
use ledger_transfers::gateway::{self, AppState};
use ledger_transfers::logging::init_logging;
use ledger_transfers::retry::RetryPolicy;
use ledger_transfers::store::{ContentionPolicy, PgLedgerStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut config = AppConfig::load(&env).with_context(|| format!("loading {} config", env))?;
    if let Some(port) = get_port_override() {
        config.server.port = port;
    }

    let _log_guard = init_logging(&config);
    tracing::info!(
        env = %env,
        git_hash = env!("GIT_HASH"),
        "Starting ledger transfers service"
    );

    let db = Database::connect(&config.postgres)
        .await
        .context("connecting to PostgreSQL")?;
    db.migrate().await.context("applying ledger schema")?;

    let policy = ContentionPolicy::new(config.retry.transient_sqlstates.iter().cloned());
    let store = PgLedgerStore::new(db.pool().clone(), policy)
        .with_lock_timeout(config.postgres.lock_timeout_ms);
    let retry = RetryPolicy::from(&config.retry);
    tracing::info!(
        max_attempts = retry.max_attempts,
        base_delay_ms = config.retry.base_delay_ms,
        max_delay_ms = config.retry.max_delay_ms,
        "Transfer retry policy"
    );

    let state = Arc::new(AppState::new(Arc::new(store), retry));
    gateway::run_server(&config.server.address(), state)
        .await
        .context("gateway server")?;

    tracing::info!("Shutdown complete");
    Ok(())
}
