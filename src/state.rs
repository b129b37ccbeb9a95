use crate::{config::SessionConfig, database::UserStore, services::CompletionProvider};
use std::sync::Arc;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub provider: Arc<dyn CompletionProvider>,
    pub session: SessionConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UserStore>,
        provider: Arc<dyn CompletionProvider>,
        session: SessionConfig,
    ) -> Self {
        Self { store, provider, session }
    }
}
