//! Application state for the review server.

use std::sync::Arc;

use tokio::sync::Mutex;

use collatio::ReviewSession;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The session being reviewed. Store calls never run while this is held
    /// on an async task; they go through `spawn_blocking`.
    pub session: Arc<Mutex<ReviewSession>>,
    /// Name of the collation source (for display).
    pub source_name: String,
    /// Held across a whole catalog change, store write included, so changes
    /// are prepared against the committed list one at a time.
    pub catalog_writes: Arc<Mutex<()>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(session: ReviewSession, source_name: impl Into<String>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            source_name: source_name.into(),
            catalog_writes: Arc::new(Mutex::new(())),
        }
    }
}
