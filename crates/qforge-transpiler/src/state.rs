//! Application state shared by the handlers.

use std::sync::Arc;

use crate::config::TranspilerConfig;
use crate::executor::ExecutorClient;
use crate::registry::{IbmTargetRegistry, TargetRegistry};

/// Shared application state. Immutable after startup.
pub struct AppState {
    /// Service configuration.
    pub config: Arc<TranspilerConfig>,
    /// Backend target source.
    pub registry: Arc<dyn TargetRegistry>,
    /// Downstream executor client.
    pub executor: ExecutorClient,
}

impl AppState {
    /// Build the production state: IBM registry and an executor client
    /// honouring the configured timeout.
    pub fn new(config: TranspilerConfig) -> Result<Self, reqwest::Error> {
        let registry = Arc::new(IbmTargetRegistry::new(config.registry_options()));
        Self::with_registry(config, registry)
    }

    /// Build a state around a custom registry.
    pub fn with_registry(
        config: TranspilerConfig,
        registry: Arc<dyn TargetRegistry>,
    ) -> Result<Self, reqwest::Error> {
        let executor = ExecutorClient::new(config.execute_url(), config.executor_timeout)?;
        Ok(Self {
            config: Arc::new(config),
            registry,
            executor,
        })
    }
}
