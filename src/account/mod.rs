//! Account management module
//!
//! Account records and the repository that creates and fetches them.
//! Balances change only through the transfer engine.

pub mod models;
pub mod repository;

// Re-export commonly used types
pub use models::{Account, NewAccount};
pub use repository::AccountRepository;
