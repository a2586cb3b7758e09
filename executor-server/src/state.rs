//! Shared application state for the HTTP server.

use std::sync::Arc;

use executor::dispatch::ActionDispatch;

/// Shared state accessible from all request handlers.
///
/// Read-only after startup; cloning only bumps the `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<dyn ActionDispatch>,
}

impl AppState {
    pub fn new(dispatcher: impl ActionDispatch + 'static) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Working directory, as reported to clients.
    pub fn project_path(&self) -> String {
        self.dispatcher.project_path().display().to_string()
    }
}
