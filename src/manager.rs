//! Service locator for secure-element transports.

use crate::config::TransportConfig;
use crate::error::{EseError, EseResult};
use crate::transport::{ClientServices, Medium, ServiceKind, ServiceRegistry, Transport};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, error};

/// Resolves transports and their vendor-extension interfaces.
///
/// Resolution is a two-step indirection: look up the base transport by
/// its fixed service name, then ask it for the extension interface.
/// Resolved extension handles are cached per medium; [`invalidate`]
/// drops a cached handle so the next call re-resolves through the
/// registry (the handle may have gone stale with its remote process).
///
/// [`invalidate`]: EseClientManager::invalidate
#[derive(Clone)]
pub struct EseClientManager {
    inner: Arc<Inner>,
}

struct Inner {
    registry: ServiceRegistry,
    names: TransportConfig,
    services: DashMap<Medium, Arc<dyn ClientServices>>,
}

impl EseClientManager {
    pub fn new(registry: ServiceRegistry, names: TransportConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                names,
                services: DashMap::new(),
            }),
        }
    }

    /// Manager over the default service names.
    pub fn with_defaults(registry: ServiceRegistry) -> Self {
        Self::new(registry, TransportConfig::default())
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.inner.registry
    }

    pub fn service_name(&self, medium: Medium) -> &str {
        match medium {
            Medium::Nfc => &self.inner.names.nfc_service,
            Medium::Spi => &self.inner.names.spi_service,
        }
    }

    /// Base transport for the medium. `None` when the named service is
    /// absent; absence never raises an error.
    pub fn resolve_transport(&self, medium: Medium) -> Option<Arc<dyn Transport>> {
        self.inner.registry.transport(self.service_name(medium))
    }

    /// Vendor-extension interface for the medium, resolving and caching
    /// it on first use.
    pub fn client_services(&self, medium: Medium) -> EseResult<Arc<dyn ClientServices>> {
        if let Some(cached) = self.inner.services.get(&medium) {
            return Ok(cached.value().clone());
        }
        let transport = self.resolve_transport(medium).ok_or_else(|| {
            error!(%medium, "could not retrieve transport service");
            EseError::unavailable(format!("no {medium} transport registered"))
        })?;
        let services = transport.client_services().ok_or_else(|| {
            error!(%medium, "transport exposes no client services interface");
            EseError::unavailable(format!("{medium} transport exposes no client services"))
        })?;
        self.inner.services.insert(medium, services.clone());
        debug!(%medium, "resolved client services interface");
        Ok(services)
    }

    /// Drops the cached extension handle for the medium.
    pub fn invalidate(&self, medium: Medium) {
        self.inner.services.remove(&medium);
    }

    /// Which medium should serve the given capability.
    ///
    /// Asks the NFC transport first and falls back to SPI, matching the
    /// vendor stack's selection order. With no transport registered at
    /// all the capability is unavailable.
    pub async fn preferred_medium(&self, kind: ServiceKind) -> EseResult<Medium> {
        for medium in [Medium::Nfc, Medium::Spi] {
            if let Some(transport) = self.resolve_transport(medium) {
                let selected = transport.preferred_medium(kind).await?;
                debug!(?kind, %selected, "selected secure-element interface");
                return Ok(selected);
            }
        }
        Err(EseError::unavailable(
            "no secure-element transport registered",
        ))
    }
}
