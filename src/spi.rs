//! Direct adapter over the SPI transport service.
//!
//! A simpler, independent path to the secure element for basic lifecycle
//! control, bypassing the manager/adapter/client layering entirely.

use crate::config::Config;
use crate::error::{EseError, EseResult};
use crate::transport::{ServiceRegistry, SessionToken, SpiInterface, TransportError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error};

/// Power state of the SPI adapter.
///
/// Transitions follow `Off -> TurningOn -> On -> TurningOff -> Off`;
/// each transition is announced on the state subscription with the new
/// state. The raw values are the wire encoding of those announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum SpiState {
    Off = 1,
    TurningOn = 2,
    On = 3,
    TurningOff = 4,
}

impl SpiState {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(Self::Off),
            2 => Some(Self::TurningOn),
            3 => Some(Self::On),
            4 => Some(Self::TurningOff),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for SpiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::TurningOn => "turning-on",
            Self::On => "on",
            Self::TurningOff => "turning-off",
        };
        f.write_str(name)
    }
}

/// Direct handle on the SPI transport service.
///
/// `enable`, `disable`, `reset` and `ese_chip_reset` are asynchronous
/// triggers: the returned flag only says the request was accepted, and
/// callers observe completion through [`subscribe`](SpiAdapter::subscribe).
/// After a failed remote call the adapter re-resolves its service handle
/// from the registry, best-effort, before reporting the outcome.
pub struct SpiAdapter {
    registry: ServiceRegistry,
    service_name: String,
    enable_timeout: Duration,
    service: RwLock<Arc<dyn SpiInterface>>,
}

impl SpiAdapter {
    pub fn new(registry: &ServiceRegistry, config: &Config) -> EseResult<Self> {
        let service_name = config.transport.spi_service.clone();
        let service = registry.spi(&service_name).ok_or_else(|| {
            error!(service = %service_name, "could not retrieve SPI service");
            EseError::unavailable(format!("no {service_name} service registered"))
        })?;
        Ok(Self {
            registry: registry.clone(),
            service_name,
            enable_timeout: config.spi.enable_timeout(),
            service: RwLock::new(service),
        })
    }

    async fn service(&self) -> Arc<dyn SpiInterface> {
        self.service.read().await.clone()
    }

    /// Best-effort re-resolution after a failed remote call. The stale
    /// handle stays in place when the registry has nothing fresher, and
    /// the next call lands here again.
    async fn recover(&self, cause: &TransportError) {
        error!(error = %cause, "SPI service unreachable, attempting recovery");
        match self.registry.spi(&self.service_name) {
            Some(fresh) => *self.service.write().await = fresh,
            None => error!("could not re-resolve SPI service during recovery"),
        }
    }

    /// Requests SPI power-on with the configured timeout. Returns
    /// whether the request was accepted, not whether the adapter is on.
    pub async fn enable(&self, token: &SessionToken) -> bool {
        self.enable_with_timeout(self.enable_timeout, token).await
    }

    pub async fn enable_with_timeout(&self, timeout: Duration, token: &SessionToken) -> bool {
        match self.service().await.enable(timeout, token).await {
            Ok(accepted) => accepted,
            Err(e) => {
                self.recover(&e).await;
                false
            }
        }
    }

    /// Requests SPI power-off.
    pub async fn disable(&self, force: bool) -> bool {
        match self.service().await.disable(force).await {
            Ok(accepted) => accepted,
            Err(e) => {
                self.recover(&e).await;
                false
            }
        }
    }

    /// Requests an SPI adapter reset.
    pub async fn reset(&self) -> bool {
        match self.service().await.reset().await {
            Ok(accepted) => accepted,
            Err(e) => {
                self.recover(&e).await;
                false
            }
        }
    }

    /// Resets the secure-element chip itself. Synchronous on the remote
    /// side, unlike the other triggers.
    pub async fn ese_chip_reset(&self) -> bool {
        match self.service().await.ese_chip_reset().await {
            Ok(done) => done,
            Err(e) => {
                self.recover(&e).await;
                false
            }
        }
    }

    /// Exchanges a full APDU frame with the secure element and returns
    /// the raw response. Blocks until the response is back; not for
    /// latency-sensitive callers.
    pub async fn exchange_data(&self, pkg: &str, data: &[u8]) -> EseResult<Vec<u8>> {
        let service = self.service().await;
        debug!(pkg, apdu = %hex::encode(data), "exchanging APDU over SPI");
        match service.transceive(pkg, data).await {
            Ok(response) => Ok(response),
            Err(e) => {
                self.recover(&e).await;
                Err(EseError::Transport(e))
            }
        }
    }

    pub async fn state(&self) -> EseResult<SpiState> {
        match self.service().await.state().await {
            Ok(state) => Ok(state),
            Err(e) => {
                self.recover(&e).await;
                Err(EseError::Transport(e))
            }
        }
    }

    /// True exactly when the adapter is fully on. Every other state, and
    /// any remote-call failure, reads as disabled.
    pub async fn is_enabled(&self) -> bool {
        matches!(self.state().await, Ok(SpiState::On))
    }

    /// State-changed notifications, one event per transition.
    pub async fn subscribe(&self) -> broadcast::Receiver<SpiState> {
        self.service().await.subscribe_state()
    }
}
