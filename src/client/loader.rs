use super::{check_payload, check_status};
use crate::adapter::AdapterBuilder;
use crate::error::{EseError, EseResult};
use crate::transport::{LoaderInterface, Medium, ServiceKind};
use std::sync::Arc;
use tracing::debug;

/// Client for applet loading and loader-service script execution.
pub struct LoaderClient {
    loader: Arc<dyn LoaderInterface>,
    medium: Medium,
}

impl LoaderClient {
    /// Connects to the loader sub-service on the preferred medium.
    pub async fn connect(builder: &AdapterBuilder) -> EseResult<Self> {
        let medium = builder.manager().preferred_medium(ServiceKind::Loader).await?;
        let adapter = builder.build(medium)?;
        let loader = adapter.loader_service()?;
        debug!(%medium, "loader service retrieved");
        Ok(Self { loader, medium })
    }

    /// Medium the loader was resolved on.
    pub fn medium(&self) -> Medium {
        self.medium
    }

    /// Loads an applet from the secure script at `script_path`. The
    /// caller's package name is verified remotely against the script's
    /// signature.
    pub async fn applet_load_applet(&self, pkg: &str, script_path: &str) -> EseResult<()> {
        let status = self.loader.applet_load_applet(pkg, script_path).await?;
        check_status(status, "applet load")
    }

    /// Names of all applets loaded through the loader.
    pub async fn list_applets(&self, pkg: &str) -> EseResult<Vec<String>> {
        let applets = self.loader.list_applets(pkg).await?;
        if applets.is_empty() {
            return Err(EseError::Unsupported);
        }
        Ok(applets)
    }

    /// Certificate key of the loader applet.
    pub async fn key_certificate(&self) -> EseResult<Vec<u8>> {
        let data = self.loader.key_certificate().await?;
        let data = check_payload(data, "key certificate")?;
        debug!(certificate = %hex::encode(&data), "key certificate retrieved");
        Ok(data)
    }

    /// Executes the secure script at `src_path`, storing command
    /// responses at `rsp_path`, and returns the last status word.
    pub async fn ls_execute_script(&self, src_path: &str, rsp_path: &str) -> EseResult<Vec<u8>> {
        let status = self.loader.ls_execute_script(src_path, rsp_path).await?;
        check_payload(status, "loader script execution")
    }

    /// Loader client and applet versions: indices 0,1 carry the client's
    /// major/minor and 2,3 the applet's.
    pub async fn ls_get_version(&self) -> EseResult<Vec<u8>> {
        let version = self.loader.ls_get_version().await?;
        check_payload(version, "loader version query")
    }
}
