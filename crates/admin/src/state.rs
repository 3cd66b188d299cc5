//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{AdminConfig, DataSource};
use crate::marketplace::{ApiClient, ApiError, Backend, MockData, MockDataError};

/// Errors building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Remote data source selected but MARKETPLACE_API_URL is not configured")]
    MissingApiConfig,
    #[error("Failed to build marketplace client: {0}")]
    Client(#[from] ApiError),
    #[error("Failed to load mock data: {0}")]
    MockData(#[from] MockDataError),
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: Backend,
}

impl AppState {
    /// Build state for the configured data source.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote client cannot be built or the bundled
    /// mock data fails to parse.
    pub fn new(config: AdminConfig) -> Result<Self, StateError> {
        let backend = match config.data_source {
            DataSource::Remote => {
                let api = config.api.as_ref().ok_or(StateError::MissingApiConfig)?;
                Backend::Remote(ApiClient::new(api)?)
            }
            DataSource::Mock => Backend::mock(MockData::bundled()?, config.mock_latency),
        };
        Ok(Self::with_backend(config, backend))
    }

    /// Build state around an existing backend.
    #[must_use]
    pub fn with_backend(config: AdminConfig, backend: Backend) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn backend(&self) -> &Backend {
        &self.inner.backend
    }
}
