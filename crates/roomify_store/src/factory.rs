//! Factory for building the configured data store

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::rest::RestStore;
use roomify_common::services::DataStore;
use roomify_config::{StoreConfig, StoreKind};
use std::sync::Arc;
use tracing::{debug, info};

/// Builds a [`DataStore`] from the `[store]` config section.
#[derive(Debug, Clone, Default)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create the store selected by `config.kind`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConfigError`] when the REST store has no URL, or
    /// [`StoreError::ClientError`] when its HTTP client cannot be built.
    pub fn create(&self, config: &StoreConfig) -> Result<Arc<dyn DataStore>, StoreError> {
        match config.kind {
            StoreKind::Memory => {
                info!("Using in-memory data store");
                Ok(Arc::new(MemoryStore::new()))
            }
            StoreKind::Rest => {
                let url = config
                    .url
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .ok_or_else(|| {
                        StoreError::ConfigError("store.url is required for the rest store".to_string())
                    })?;
                if config.api_key.is_none() {
                    debug!("No API key configured for the rest store");
                }
                info!("Using REST data store at {}", url);
                let store = RestStore::new(url, config.api_key.as_deref(), config.timeout_secs)?;
                Ok(Arc::new(store))
            }
        }
    }
}
