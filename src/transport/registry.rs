use super::{SpiInterface, Transport};
use dashmap::DashMap;
use std::sync::Arc;

/// Startup-time registry mapping fixed service names to backends.
///
/// Looking up a name that was never registered returns `None` and is not
/// an error; the device may simply lack that transport. Registration
/// normally happens once during process bring-up, but re-registering a
/// name is allowed and replaces the handle, which is what dead-service
/// recovery relies on.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    transports: DashMap<String, Arc<dyn Transport>>,
    spi_adapters: DashMap<String, Arc<dyn SpiInterface>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_transport(&self, name: impl Into<String>, transport: Arc<dyn Transport>) {
        self.inner.transports.insert(name.into(), transport);
    }

    pub fn register_spi(&self, name: impl Into<String>, service: Arc<dyn SpiInterface>) {
        self.inner.spi_adapters.insert(name.into(), service);
    }

    pub fn transport(&self, name: &str) -> Option<Arc<dyn Transport>> {
        self.inner
            .transports
            .get(name)
            .map(|entry| entry.value().clone())
    }

    pub fn spi(&self, name: &str) -> Option<Arc<dyn SpiInterface>> {
        self.inner
            .spi_adapters
            .get(name)
            .map(|entry| entry.value().clone())
    }
}
