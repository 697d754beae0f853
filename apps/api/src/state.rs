use std::sync::Arc;

use crate::matching::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Snapshot source. Default: PgProfileStore; tests use InMemoryProfileStore.
    pub profiles: Arc<dyn ProfileStore>,
}
