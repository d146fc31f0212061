use super::check_status;
use crate::adapter::AdapterBuilder;
use crate::error::EseResult;
use crate::transport::{JcopInterface, Medium, ServiceKind};
use std::sync::Arc;
use tracing::debug;

/// Client for secure JCOP operating-system updates.
pub struct JcopClient {
    jcop: Arc<dyn JcopInterface>,
    medium: Medium,
}

impl JcopClient {
    /// Connects to the JCOP sub-service on the preferred medium.
    pub async fn connect(builder: &AdapterBuilder) -> EseResult<Self> {
        let medium = builder.manager().preferred_medium(ServiceKind::Jcop).await?;
        let adapter = builder.build(medium)?;
        let jcop = adapter.jcop_service()?;
        debug!(%medium, "jcop service retrieved");
        Ok(Self { jcop, medium })
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    /// Downloads and installs the JCOP operating-system image. The
    /// caller's package must be registered with the backend for
    /// signature verification or the download is refused.
    pub async fn jcop_os_download(&self, pkg: &str) -> EseResult<()> {
        let status = self.jcop.jcop_os_download(pkg).await?;
        check_status(status, "jcop os download")
    }
}
