//! Storage error classification

use std::collections::HashSet;
use thiserror::Error;

/// SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// Transient contention the caller may retry (lock timeout, deadlock, ...)
    #[error("Transient contention (SQLSTATE {code}): {message}")]
    Contention { code: String, message: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    /// A stored row could not be mapped back into the domain
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Transaction already finished")]
    TransactionClosed,
}

/// Decides which SQLSTATE codes count as transient contention.
///
/// Codes outside the set, constraint violations included, are never retried.
#[derive(Debug, Clone)]
pub struct ContentionPolicy {
    transient_codes: HashSet<String>,
}

impl ContentionPolicy {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            transient_codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_transient(&self, code: &str) -> bool {
        self.transient_codes.contains(code)
    }

    /// Map a driver error into the storage taxonomy
    pub fn classify(&self, e: sqlx::Error) -> StoreError {
        match e {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
                let message = db_err.message().to_string();
                if code == UNIQUE_VIOLATION {
                    StoreError::Duplicate(message)
                } else if self.is_transient(&code) {
                    StoreError::Contention { code, message }
                } else {
                    StoreError::Database(format!("SQLSTATE {}: {}", code, message))
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(e.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Corrupt(e.to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

impl Default for ContentionPolicy {
    fn default() -> Self {
        Self::new(crate::config::RetryConfig::default().transient_sqlstates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_codes() {
        let policy = ContentionPolicy::default();
        assert!(policy.is_transient("55P03"));
        assert!(policy.is_transient("40001"));
        assert!(policy.is_transient("40P01"));
        assert!(!policy.is_transient("23505"));
        assert!(!policy.is_transient("23514"));
    }

    #[test]
    fn test_custom_policy_codes() {
        let policy = ContentionPolicy::new(["40001"]);
        assert!(policy.is_transient("40001"));
        assert!(!policy.is_transient("55P03"));
    }

    #[test]
    fn test_classify_pool_errors() {
        let policy = ContentionPolicy::default();
        assert!(matches!(
            policy.classify(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            policy.classify(sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
    }
}
