//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::WebConfig;
use crate::services::session::{SessionProvider, SessionStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the session provider — the single
/// designated owner of session state — so handlers receive the session by
/// injection instead of reaching for a global.
///
/// Constructing the state restores the session from durable storage; the
/// router is only built afterwards, so no handler can run before restoration
/// completes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    session: SessionProvider,
    catalog: CatalogClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Restores the session synchronously as part of construction.
    #[must_use]
    pub fn new(config: WebConfig) -> Self {
        let store = SessionStore::new(&config.data_dir);
        let session = SessionProvider::new(store);
        let catalog = CatalogClient::new(&config.catalog);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                catalog,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the session provider.
    #[must_use]
    pub fn session(&self) -> &SessionProvider {
        &self.inner.session
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }
}
