//! Shared handler state.
//!
//! The store is built in `main` and injected here; handlers reach it through
//! `with_store`, which hops to the blocking pool since rusqlite is
//! synchronous.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::store::{Store, StoreError, StoreResult};

#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Run a store operation on the blocking pool.
    pub async fn with_store<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&Store) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(&store.lock()))
            .await
            .map_err(|e| StoreError::storage(e.to_string()))?
    }
}
