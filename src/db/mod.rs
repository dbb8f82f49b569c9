//! Database connection management

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::PostgresConfig;

/// Ledger schema, applied idempotently at startup.
///
/// `NUMERIC(78,18)` holds 60 integer and 18 fractional digits exactly.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id          BIGINT PRIMARY KEY,
        balance     NUMERIC(78, 18) NOT NULL CHECK (balance >= 0),
        version     BIGINT NOT NULL DEFAULT 1,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transfers (
        id                      BIGSERIAL PRIMARY KEY,
        source_account_id       BIGINT NOT NULL REFERENCES accounts (id),
        destination_account_id  BIGINT NOT NULL REFERENCES accounts (id),
        amount                  NUMERIC(78, 18) NOT NULL CHECK (amount > 0),
        created_at              TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CHECK (source_account_id <> destination_account_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_transfers_source ON transfers (source_account_id)",
    "CREATE INDEX IF NOT EXISTS idx_transfers_destination ON transfers (destination_account_id)",
];

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create the connection pool, retrying while the server comes up
    pub async fn connect(config: &PostgresConfig) -> Result<Self, sqlx::Error> {
        let attempts = config.connect_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .acquire_timeout(config.acquire_timeout())
                .connect(&config.url)
                .await;

            match result {
                Ok(pool) => {
                    tracing::info!(
                        attempt,
                        max_connections = config.max_connections,
                        "PostgreSQL connection pool established"
                    );
                    return Ok(Self { pool });
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        attempts,
                        error = %e,
                        "PostgreSQL not reachable, retrying"
                    );
                    tokio::time::sleep(config.connect_retry_delay()).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(attempts, error = %e, "Giving up connecting to PostgreSQL");
                    return Err(e);
                }
            }
        }
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create ledger tables and indexes if missing
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Ledger schema is up to date");
        Ok(())
    }
}
