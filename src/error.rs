use crate::transport::TransportError;

pub type EseResult<T> = std::result::Result<T, EseError>;

/// Failure taxonomy for secure-element client operations.
///
/// Every operation in this crate fails in exactly one of three ways, so
/// call sites can distinguish "the device lacks this capability" from
/// "the call itself went wrong". Nothing is retried automatically; a
/// failure is terminal for that call.
#[derive(Debug, thiserror::Error)]
pub enum EseError {
    /// The named service, its extension interface, or one of its
    /// sub-interfaces could not be resolved. Non-fatal: the device may
    /// simply lack the transport.
    #[error("interface not available: {0}")]
    Unavailable(String),

    /// The remote side answered with the not-supported sentinel or an
    /// empty payload. Distinct from a transport failure so callers can
    /// choose not to retry.
    #[error("operation not supported by the secure element")]
    Unsupported,

    /// The remote call failed outright or returned an invalid payload.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

impl EseError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
