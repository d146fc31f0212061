//! Ports (interfaces) for the secure-element backends.
//! These define the contracts the out-of-process vendor services are
//! reached through; the rest of the crate only ever sees trait objects.

use super::{Medium, RawStatus, ServiceKind, SessionToken, TransportResult};
use crate::bundle::Bundle;
use crate::spi::SpiState;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Base transport service for a medium.
///
/// This is the first step of the two-step indirection: the registry
/// resolves a `Transport` by its fixed service name, and the transport
/// in turn hands out its vendor-extension interface.
#[async_trait]
pub trait Transport: Send + Sync {
    /// The vendor-extension interface, when the backend exposes one.
    fn client_services(&self) -> Option<Arc<dyn ClientServices>>;

    /// Which medium the backend prefers for the given capability.
    async fn preferred_medium(&self, kind: ServiceKind) -> TransportResult<Medium>;
}

/// Vendor-extension interface exposing the typed sub-services.
///
/// Availability is per sub-service: a backend may expose a loader but no
/// LTSM extras, and a `None` here is the normal way of saying so.
pub trait ClientServices: Send + Sync {
    fn loader(&self) -> Option<Arc<dyn LoaderInterface>>;
    fn jcop(&self) -> Option<Arc<dyn JcopInterface>>;
    fn extras(&self) -> Option<Arc<dyn ExtrasInterface>>;
}

/// Applet loader sub-service.
#[async_trait]
pub trait LoaderInterface: Send + Sync {
    /// Loads an applet from a secure script. The package name is used by
    /// the remote side for caller verification.
    async fn applet_load_applet(&self, pkg: &str, script_path: &str)
    -> TransportResult<RawStatus>;

    /// Names of the applets loaded through the loader.
    async fn list_applets(&self, pkg: &str) -> TransportResult<Vec<String>>;

    /// Certificate key of the loader applet.
    async fn key_certificate(&self) -> TransportResult<Vec<u8>>;

    /// Executes a loader-service script, writing command responses to
    /// `rsp_path`, and returns the last status word.
    async fn ls_execute_script(&self, src_path: &str, rsp_path: &str) -> TransportResult<Vec<u8>>;

    /// Loader client and applet versions as major/minor byte pairs.
    async fn ls_get_version(&self) -> TransportResult<Vec<u8>>;
}

/// JCOP operating-system update sub-service.
#[async_trait]
pub trait JcopInterface: Send + Sync {
    async fn jcop_os_download(&self, pkg: &str) -> TransportResult<RawStatus>;
}

/// LTSM extras sub-service. Results come back as key/value bundles
/// carrying an embedded error code under [`bundle::ERROR_KEY`](crate::bundle::ERROR_KEY).
#[async_trait]
pub trait ExtrasInterface: Send + Sync {
    async fn open(&self, pkg: &str, token: &SessionToken) -> TransportResult<Bundle>;
    async fn close(&self, pkg: &str, token: &SessionToken) -> TransportResult<Bundle>;
    async fn transceive(&self, pkg: &str, data: &[u8]) -> TransportResult<Bundle>;
}

/// Direct SPI transport service, bypassing the client/adapter layering.
///
/// `enable`, `disable`, `reset` and `ese_chip_reset` are asynchronous
/// triggers: the returned flag says only whether the request was
/// accepted. Completion is observed through the state subscription.
#[async_trait]
pub trait SpiInterface: Send + Sync {
    async fn enable(&self, timeout: Duration, token: &SessionToken) -> TransportResult<bool>;
    async fn disable(&self, force: bool) -> TransportResult<bool>;
    async fn reset(&self) -> TransportResult<bool>;
    async fn ese_chip_reset(&self) -> TransportResult<bool>;

    /// Exchanges a full APDU frame with the secure element. Blocks until
    /// the response is back; not for latency-sensitive callers.
    async fn transceive(&self, pkg: &str, data: &[u8]) -> TransportResult<Vec<u8>>;

    async fn state(&self) -> TransportResult<SpiState>;

    /// State-changed notifications, one event per transition.
    fn subscribe_state(&self) -> broadcast::Receiver<SpiState>;
}
