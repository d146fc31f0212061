//! Per-medium adapter exposing the typed sub-services.

use crate::error::{EseError, EseResult};
use crate::manager::EseClientManager;
use crate::transport::{
    ClientServices, ExtrasInterface, JcopInterface, LoaderInterface, Medium,
};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Builds and caches one [`ServicesAdapter`] per medium.
///
/// The first successful build for a medium is reused by every later
/// caller; [`invalidate`](AdapterBuilder::invalidate) drops both the
/// adapter and the manager's cached extension handle so the next build
/// re-resolves from the registry.
pub struct AdapterBuilder {
    manager: EseClientManager,
    adapters: DashMap<Medium, ServicesAdapter>,
}

impl AdapterBuilder {
    pub fn new(manager: EseClientManager) -> Self {
        Self {
            manager,
            adapters: DashMap::new(),
        }
    }

    pub fn manager(&self) -> &EseClientManager {
        &self.manager
    }

    pub fn build(&self, medium: Medium) -> EseResult<ServicesAdapter> {
        if let Some(adapter) = self.adapters.get(&medium) {
            return Ok(adapter.value().clone());
        }
        let adapter = ServicesAdapter::initialize(&self.manager, medium)?;
        self.adapters.insert(medium, adapter.clone());
        Ok(adapter)
    }

    pub fn invalidate(&self, medium: Medium) {
        self.adapters.remove(&medium);
        self.manager.invalidate(medium);
    }
}

/// Adapter over one medium's vendor-extension interface.
///
/// Holds the resolved extension handle for its medium and hands out the
/// typed sub-services. A sub-service the extension does not expose is
/// surfaced as [`EseError::Unavailable`], never as a panic, and is not
/// retried here.
#[derive(Clone)]
pub struct ServicesAdapter {
    medium: Medium,
    services: Arc<dyn ClientServices>,
}

impl ServicesAdapter {
    /// Fetches the medium's vendor-extension interface from the manager
    /// and records it. Safe to call again for the same medium; it simply
    /// re-fetches.
    pub fn initialize(manager: &EseClientManager, medium: Medium) -> EseResult<Self> {
        let services = manager.client_services(medium)?;
        debug!(%medium, "services adapter initialized");
        Ok(Self { medium, services })
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    pub fn loader_service(&self) -> EseResult<Arc<dyn LoaderInterface>> {
        self.services.loader().ok_or_else(|| {
            EseError::unavailable(format!("loader service not exposed on {}", self.medium))
        })
    }

    pub fn jcop_service(&self) -> EseResult<Arc<dyn JcopInterface>> {
        self.services.jcop().ok_or_else(|| {
            EseError::unavailable(format!("jcop service not exposed on {}", self.medium))
        })
    }

    pub fn extras_service(&self) -> EseResult<Arc<dyn ExtrasInterface>> {
        self.services.extras().ok_or_else(|| {
            EseError::unavailable(format!("extras service not exposed on {}", self.medium))
        })
    }
}
