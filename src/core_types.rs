//! Core types used throughout the system
//!
//! These are fundamental type aliases used by all modules.
//! They provide semantic meaning and enable future type evolution.

/// Account ID - caller-supplied, globally unique, immutable after creation.
///
/// # Constraints:
/// - **Non-zero**: `0` is rejected at validation
/// - **Storage range**: persisted as PostgreSQL `BIGINT`, so values above
///   `i64::MAX` are rejected at validation
pub type AccountId = u64;

/// Transfer ID - system-assigned, monotonically increasing
pub type TransferId = u64;

/// Optimistic concurrency version token.
///
/// Starts at 1 when the account is created and advances by exactly one
/// on every committed balance mutation.
pub type Version = u64;

/// Largest identifier that fits the `BIGINT` key columns
pub const MAX_STORABLE_ID: u64 = i64::MAX as u64;
