//! Transfers
//!
//! Atomic two-account balance moves under optimistic concurrency control,
//! plus the append-only transfer log.
//!
//! # Safety Invariants
//!
//! 1. **Conservation**: the sum of all balances never changes
//! 2. **Non-negativity**: no committed balance is below zero
//! 3. **Atomicity**: a transfer record exists iff both balance changes committed
//! 4. **No lost update**: a version mismatch on either row voids the attempt

pub mod engine;
pub mod types;


pub use engine::TransferEngine;
pub use types::{NewTransfer, Transfer, TransferIntent};
