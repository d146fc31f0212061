use super::check_bundle;
use crate::adapter::AdapterBuilder;
use crate::bundle::Bundle;
use crate::error::EseResult;
use crate::transport::{ExtrasInterface, Medium, ServiceKind, SessionToken};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// LTSM secure-element session.
///
/// The session owns a lock that serializes `open`, `close` and
/// `transceive` across every clone of the handle: at most one LTSM
/// remote call is in flight per session at a time, so secure-element
/// session state never interleaves between callers.
#[derive(Clone)]
pub struct LtsmSession {
    extras: Arc<dyn ExtrasInterface>,
    token: SessionToken,
    medium: Medium,
    lock: Arc<Mutex<()>>,
}

impl LtsmSession {
    /// Connects to the LTSM extras sub-service on the preferred medium
    /// and mints a fresh session token.
    pub async fn connect(builder: &AdapterBuilder) -> EseResult<Self> {
        let medium = builder.manager().preferred_medium(ServiceKind::Ltsm).await?;
        let adapter = builder.build(medium)?;
        let extras = adapter.extras_service()?;
        let token = SessionToken::new();
        debug!(%medium, %token, "ltsm session established");
        Ok(Self {
            extras,
            token,
            medium,
            lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    /// Opens the secure-element connection.
    pub async fn open(&self, pkg: &str) -> EseResult<Bundle> {
        let _guard = self.lock.lock().await;
        let bundle = self.extras.open(pkg, &self.token).await?;
        check_bundle(bundle, "ltsm open")
    }

    /// Closes the secure-element connection.
    pub async fn close(&self, pkg: &str) -> EseResult<Bundle> {
        let _guard = self.lock.lock().await;
        let bundle = self.extras.close(pkg, &self.token).await?;
        check_bundle(bundle, "ltsm close")
    }

    /// Exchanges an APDU with the secure element.
    pub async fn transceive(&self, pkg: &str, data: &[u8]) -> EseResult<Bundle> {
        let _guard = self.lock.lock().await;
        debug!(pkg, apdu = %hex::encode(data), "ltsm transceive");
        let bundle = self.extras.transceive(pkg, data).await?;
        check_bundle(bundle, "ltsm transceive")
    }
}
