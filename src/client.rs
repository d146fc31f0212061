//! Typed clients over the secure-element sub-services.
//!
//! Each client follows the same construction protocol: resolve the
//! preferred medium for its capability, build the adapter for that
//! medium, fetch the capability's sub-interface, and wrap it. A break
//! anywhere in that chain surfaces as "interface not available".

mod jcop;
mod loader;
mod ltsm;

pub use jcop::JcopClient;
pub use loader::LoaderClient;
pub use ltsm::LtsmSession;

use crate::bundle::Bundle;
use crate::error::{EseError, EseResult};
use crate::transport::{RawStatus, TransportError};
use tracing::error;

/// Translates a remote status word into the client-facing outcome.
fn check_status(status: RawStatus, what: &str) -> EseResult<()> {
    if status.is_success() {
        Ok(())
    } else if status.is_not_supported() {
        error!(%status, "{what} is not supported");
        Err(EseError::Unsupported)
    } else {
        error!(%status, "{what} failed");
        Err(EseError::Transport(TransportError::msg(format!(
            "{what} failed with status {status}"
        ))))
    }
}

/// An empty payload is the remote side's way of saying the call is not
/// implemented; a non-empty one is the result.
fn check_payload(data: Vec<u8>, what: &str) -> EseResult<Vec<u8>> {
    if data.is_empty() {
        error!("{what} returned an empty payload");
        return Err(EseError::Unsupported);
    }
    Ok(data)
}

/// A bundle succeeds exactly when its embedded error code is zero.
fn check_bundle(bundle: Bundle, what: &str) -> EseResult<Bundle> {
    match bundle.error_code() {
        Some(0) => Ok(bundle),
        Some(code) => {
            error!(code, %bundle, "{what} failed");
            Err(EseError::Transport(TransportError::msg(format!(
                "{what} failed with error code {code}"
            ))))
        }
        None => {
            error!(%bundle, "{what} returned no error code");
            Err(EseError::Transport(TransportError::msg(format!(
                "{what} returned a bundle without an error code"
            ))))
        }
    }
}
