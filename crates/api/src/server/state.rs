//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::nutrition::FatSecretClient;

/// Application state shared across all request handlers.
///
/// The vault is stateless, so the only shared resource is the provider
/// client, whose connection pool is reused across requests.
#[derive(Clone)]
pub struct AppState {
    /// Client for the FatSecret image-recognition API.
    pub nutrition: Arc<FatSecretClient>,
}

impl AppState {
    /// Create a new [`AppState`] around the given provider client.
    pub fn new(nutrition: FatSecretClient) -> Self {
        Self {
            nutrition: Arc::new(nutrition),
        }
    }
}
