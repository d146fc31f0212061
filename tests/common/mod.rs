#![allow(dead_code)]

use async_trait::async_trait;
use ese_client::bundle::Bundle;
use ese_client::config::Config;
use ese_client::spi::SpiState;
use ese_client::transport::{
    ClientServices, ExtrasInterface, JcopInterface, LoaderInterface, Medium, RawStatus,
    ServiceKind, SessionToken, SpiInterface, Transport, TransportError, TransportResult,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

pub fn test_config() -> Config {
    // Empty override map keeps the test isolated from the host environment
    Config::load_with_sources(Some(HashMap::new())).expect("Failed to load config")
}

/// Transport backend whose behavior is fixed at construction.
pub struct MockTransport {
    preferred: Medium,
    services: Option<Arc<MockClientServices>>,
}

impl MockTransport {
    /// A transport that prefers the given medium but exposes no
    /// vendor-extension interface.
    pub fn bare(preferred: Medium) -> Self {
        Self {
            preferred,
            services: None,
        }
    }

    pub fn with_services(preferred: Medium, services: MockClientServices) -> Self {
        Self {
            preferred,
            services: Some(Arc::new(services)),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn client_services(&self) -> Option<Arc<dyn ClientServices>> {
        self.services
            .clone()
            .map(|services| services as Arc<dyn ClientServices>)
    }

    async fn preferred_medium(&self, _kind: ServiceKind) -> TransportResult<Medium> {
        Ok(self.preferred)
    }
}

/// Vendor-extension interface exposing a configurable set of
/// sub-services.
#[derive(Default)]
pub struct MockClientServices {
    loader: Option<Arc<MockLoader>>,
    jcop: Option<Arc<MockJcop>>,
    extras: Option<Arc<MockExtras>>,
}

impl MockClientServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loader(mut self, loader: MockLoader) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn jcop(mut self, jcop: MockJcop) -> Self {
        self.jcop = Some(Arc::new(jcop));
        self
    }

    pub fn extras(mut self, extras: MockExtras) -> Self {
        self.extras = Some(Arc::new(extras));
        self
    }
}

impl ClientServices for MockClientServices {
    fn loader(&self) -> Option<Arc<dyn LoaderInterface>> {
        self.loader
            .clone()
            .map(|loader| loader as Arc<dyn LoaderInterface>)
    }

    fn jcop(&self) -> Option<Arc<dyn JcopInterface>> {
        self.jcop.clone().map(|jcop| jcop as Arc<dyn JcopInterface>)
    }

    fn extras(&self) -> Option<Arc<dyn ExtrasInterface>> {
        self.extras
            .clone()
            .map(|extras| extras as Arc<dyn ExtrasInterface>)
    }
}

/// Loader sub-service with canned responses.
pub struct MockLoader {
    pub load_status: i32,
    pub applets: Vec<String>,
    pub certificate: Vec<u8>,
    pub script_response: Vec<u8>,
    pub version: Vec<u8>,
}

impl Default for MockLoader {
    fn default() -> Self {
        Self {
            load_status: 0x00,
            applets: vec!["com.example.wallet".to_string()],
            certificate: vec![0x30, 0x82, 0x01, 0x0A],
            script_response: vec![0x90, 0x00],
            version: vec![0x02, 0x01, 0x01, 0x00],
        }
    }
}

impl MockLoader {
    pub fn with_load_status(status: i32) -> Self {
        Self {
            load_status: status,
            ..Self::default()
        }
    }
}

#[async_trait]
impl LoaderInterface for MockLoader {
    async fn applet_load_applet(
        &self,
        _pkg: &str,
        _script_path: &str,
    ) -> TransportResult<RawStatus> {
        Ok(RawStatus(self.load_status))
    }

    async fn list_applets(&self, _pkg: &str) -> TransportResult<Vec<String>> {
        Ok(self.applets.clone())
    }

    async fn key_certificate(&self) -> TransportResult<Vec<u8>> {
        Ok(self.certificate.clone())
    }

    async fn ls_execute_script(
        &self,
        _src_path: &str,
        _rsp_path: &str,
    ) -> TransportResult<Vec<u8>> {
        Ok(self.script_response.clone())
    }

    async fn ls_get_version(&self) -> TransportResult<Vec<u8>> {
        Ok(self.version.clone())
    }
}

/// JCOP sub-service with a canned status.
pub struct MockJcop {
    pub status: i32,
}

impl MockJcop {
    pub fn with_status(status: i32) -> Self {
        Self { status }
    }
}

#[async_trait]
impl JcopInterface for MockJcop {
    async fn jcop_os_download(&self, _pkg: &str) -> TransportResult<RawStatus> {
        Ok(RawStatus(self.status))
    }
}

/// Extras sub-service that records the order of its remote calls so
/// tests can assert on interleaving.
pub struct MockExtras {
    error_code: i64,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockExtras {
    pub fn with_error(error_code: i64) -> Self {
        Self {
            error_code,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Holds each remote call open for `delay` so overlapping callers
    /// would be observable in the call log.
    pub fn with_delay(error_code: i64, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::with_error(error_code)
        }
    }

    pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }

    async fn run(&self, name: &str, bundle: Bundle) -> TransportResult<Bundle> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(format!("{name}:start"));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(format!("{name}:end"));
        Ok(bundle)
    }
}

#[async_trait]
impl ExtrasInterface for MockExtras {
    async fn open(&self, _pkg: &str, _token: &SessionToken) -> TransportResult<Bundle> {
        self.run("open", Bundle::with_error(self.error_code)).await
    }

    async fn close(&self, _pkg: &str, _token: &SessionToken) -> TransportResult<Bundle> {
        self.run("close", Bundle::with_error(self.error_code)).await
    }

    async fn transceive(&self, _pkg: &str, data: &[u8]) -> TransportResult<Bundle> {
        let mut bundle = Bundle::with_error(self.error_code);
        let mut response = data.to_vec();
        response.extend_from_slice(&[0x90, 0x00]);
        bundle.put_bytes("rsp", response);
        self.run("transceive", bundle).await
    }
}

/// SPI service with a settable state, a failure switch and broadcast
/// state transitions.
pub struct MockSpi {
    state: AtomicI32,
    failing: AtomicBool,
    tx: broadcast::Sender<SpiState>,
}

impl Default for MockSpi {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            state: AtomicI32::new(SpiState::Off.as_raw()),
            failing: AtomicBool::new(false),
            tx,
        }
    }
}

impl MockSpi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let spi = Self::new();
        spi.set_failing(true);
        spi
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_state(&self, state: SpiState) {
        self.state.store(state.as_raw(), Ordering::SeqCst);
    }

    fn transition(&self, state: SpiState) {
        self.set_state(state);
        let _ = self.tx.send(state);
    }

    fn check(&self) -> TransportResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::msg("binder transport died"));
        }
        Ok(())
    }
}

#[async_trait]
impl SpiInterface for MockSpi {
    async fn enable(&self, _timeout: Duration, _token: &SessionToken) -> TransportResult<bool> {
        self.check()?;
        self.transition(SpiState::TurningOn);
        self.transition(SpiState::On);
        Ok(true)
    }

    async fn disable(&self, _force: bool) -> TransportResult<bool> {
        self.check()?;
        self.transition(SpiState::TurningOff);
        self.transition(SpiState::Off);
        Ok(true)
    }

    async fn reset(&self) -> TransportResult<bool> {
        self.check()?;
        self.transition(SpiState::TurningOff);
        self.transition(SpiState::Off);
        self.transition(SpiState::TurningOn);
        self.transition(SpiState::On);
        Ok(true)
    }

    async fn ese_chip_reset(&self) -> TransportResult<bool> {
        self.check()?;
        Ok(true)
    }

    async fn transceive(&self, _pkg: &str, data: &[u8]) -> TransportResult<Vec<u8>> {
        self.check()?;
        let mut response = data.to_vec();
        response.extend_from_slice(&[0x90, 0x00]);
        Ok(response)
    }

    async fn state(&self) -> TransportResult<SpiState> {
        self.check()?;
        let raw = self.state.load(Ordering::SeqCst);
        SpiState::from_raw(raw)
            .ok_or_else(|| TransportError::msg(format!("invalid adapter state {raw}")))
    }

    fn subscribe_state(&self) -> broadcast::Receiver<SpiState> {
        self.tx.subscribe()
    }
}
