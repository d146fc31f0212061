use std::{collections::HashMap, time::Duration};

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;

use crate::transport::Medium;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub transport: TransportConfig,
    pub spi: SpiConfig,
}

/// Names the transport services are registered under. The defaults are
/// the platform's fixed keys; deployments with renamed vendor services
/// can override them.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    pub nfc_service: String,
    pub spi_service: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            nfc_service: Medium::Nfc.service_name().to_string(),
            spi_service: Medium::Spi.service_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpiConfig {
    pub enable_timeout_secs: u64,
}

impl SpiConfig {
    /// Timeout handed to the remote side on power-on requests.
    pub fn enable_timeout(&self) -> Duration {
        Duration::from_secs(self.enable_timeout_secs)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("transport.nfc_service", "nfc")?
            .set_default("transport.spi_service", "spi")?
            .set_default("spi.enable_timeout_secs", 10)?
            .add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Use system environment variables
            // Should be in the format APP_TRANSPORT__NFC_SERVICE
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder.build()?.try_deserialize()
    }
}
