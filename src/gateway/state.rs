use std::sync::Arc;

use crate::account::AccountRepository;
use crate::retry::RetryPolicy;
use crate::store::LedgerStore;
use crate::transfer::TransferEngine;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountRepository,
    pub engine: TransferEngine,
    /// Raw store handle, only used for health pings
    pub store: Arc<dyn LedgerStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>, retry: RetryPolicy) -> Self {
        Self {
            accounts: AccountRepository::new(Arc::clone(&store)),
            engine: TransferEngine::new(Arc::clone(&store), retry),
            store,
        }
    }
}
