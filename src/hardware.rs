//! Bridge to optional vendor hardware features.
//!
//! Backends advertise a feature bitmask at startup; queries for a
//! feature the backend never advertised are rejected up front instead of
//! being forwarded to a HAL that would misbehave on them.

use crate::error::{EseError, EseResult};
use crate::transport::TransportResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// A toggleable vendor hardware feature. Values are bitmask positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum HardwareFeature {
    AdaptiveBacklight = 0x1,
    ColorEnhancement = 0x2,
    HighTouchSensitivity = 0x4,
    KeyDisabler = 0x8,
    SunlightEnhancement = 0x10,
    TapToWake = 0x20,
    TouchscreenHovering = 0x40,
}

impl HardwareFeature {
    pub fn mask(self) -> u32 {
        self as u32
    }
}

/// Vendor-side implementation of the feature bridge.
#[async_trait]
pub trait HardwareBackend: Send + Sync {
    /// Bitmask of the features this backend supports.
    fn supported_features(&self) -> u32;

    async fn get(&self, feature: HardwareFeature) -> TransportResult<bool>;

    async fn set(&self, feature: HardwareFeature, enable: bool) -> TransportResult<bool>;
}

/// Caller-facing front over a [`HardwareBackend`].
pub struct HardwareService {
    backend: Arc<dyn HardwareBackend>,
}

impl HardwareService {
    pub fn new(backend: Arc<dyn HardwareBackend>) -> Self {
        Self { backend }
    }

    pub fn supported_features(&self) -> u32 {
        self.backend.supported_features()
    }

    pub fn is_supported(&self, feature: HardwareFeature) -> bool {
        self.backend.supported_features() & feature.mask() != 0
    }

    /// Current state of the feature; unsupported features are rejected
    /// without touching the backend.
    pub async fn get(&self, feature: HardwareFeature) -> EseResult<bool> {
        if !self.is_supported(feature) {
            return Err(EseError::unavailable(format!(
                "feature {feature:?} is not supported"
            )));
        }
        Ok(self.backend.get(feature).await?)
    }

    /// Toggles the feature; returns whether the backend applied it.
    pub async fn set(&self, feature: HardwareFeature, enable: bool) -> EseResult<bool> {
        if !self.is_supported(feature) {
            return Err(EseError::unavailable(format!(
                "feature {feature:?} is not supported"
            )));
        }
        debug!(?feature, enable, "toggling hardware feature");
        Ok(self.backend.set(feature, enable).await?)
    }
}
