//! Backend target resolution.

use async_trait::async_trait;

use qforge_adapter_ibm::{IbmResult, RuntimeService, RuntimeServiceOptions};
use qforge_compile::Target;

/// Resolves a backend name into a compilation target.
#[async_trait]
pub trait TargetRegistry: Send + Sync {
    /// Fetch the current target of `backend`.
    async fn resolve(&self, backend: &str) -> IbmResult<Target>;
}

/// Registry backed by the IBM Quantum Platform.
///
/// Every call opens a fresh session; nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct IbmTargetRegistry {
    options: RuntimeServiceOptions,
}

impl IbmTargetRegistry {
    pub fn new(options: RuntimeServiceOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl TargetRegistry for IbmTargetRegistry {
    async fn resolve(&self, backend: &str) -> IbmResult<Target> {
        let service = RuntimeService::connect(&self.options).await?;
        service.target(backend).await
    }
}
