//! Contracts for reaching the secure element.
//!
//! The vendor backends live out of process; this module defines the typed
//! interfaces they are reached through and the registry they are resolved
//! from. Capability negotiation is explicit: a backend that does not expose
//! an interface is simply absent from the registry or returns `None` from
//! the corresponding getter.

mod ports;
mod registry;

pub use ports::{
    ClientServices, ExtrasInterface, JcopInterface, LoaderInterface, SpiInterface, Transport,
};
pub use registry::ServiceRegistry;

use color_eyre::Report;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use uuid::Uuid;

/// Transport medium used to reach the secure element.
///
/// Exactly one medium is selected per logical session; the selection is
/// resolved once and then fixed for the adapter instance built on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Nfc,
    Spi,
}

impl Medium {
    /// Fixed name the medium's transport service is registered under.
    pub fn service_name(self) -> &'static str {
        match self {
            Medium::Nfc => "nfc",
            Medium::Spi => "spi",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.service_name())
    }
}

/// Typed capability requested from a services adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Loader,
    Jcop,
    Ltsm,
}

/// Raw status word returned by remote sub-service calls.
///
/// `0x00` is success and `0x0F` the vendor's not-supported sentinel;
/// everything else is a generic failure. Typed clients translate these
/// into [`EseError`](crate::error::EseError) so call sites never branch
/// on the numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStatus(pub i32);

impl RawStatus {
    pub const SUCCESS: RawStatus = RawStatus(0x00);
    pub const NOT_SUPPORTED: RawStatus = RawStatus(0x0F);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn is_not_supported(self) -> bool {
        self == Self::NOT_SUPPORTED
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Opaque caller identity handed to session-scoped remote calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Error type for remote transport calls.
///
/// Carries its cause so the failing binder leg shows up in logs, while
/// the layers above only see one opaque "the call failed" kind.
#[derive(Debug)]
pub struct TransportError {
    error: Report,
}

impl TransportError {
    pub fn new<T>(error: T) -> Self
    where
        T: StdError + Send + Sync + 'static,
    {
        Self {
            error: Report::new(error),
        }
    }

    pub fn msg<T>(message: T) -> Self
    where
        T: fmt::Debug + fmt::Display + Send + Sync + 'static,
    {
        Self {
            error: Report::msg(message),
        }
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.error.source()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}
