// ── Gateway connection configuration ──
//
// Describes *where* the hosted backend lives and how to reach it. The
// CLI builds a `GatewayConfig` from sitedesk-config and hands it in;
// nothing here touches disk or the environment.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use sitedesk_api::{Gateway, RestGateway, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// TLS verification for the backend connection.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    #[default]
    SystemDefaults,
    CustomCa(std::path::PathBuf),
}

/// Everything needed to talk to one backend project.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: Url,
    pub public_key: SecretString,
    pub timeout: Duration,
    pub tls: TlsVerification,
}

impl GatewayConfig {
    pub fn new(url: Url, public_key: SecretString) -> Self {
        Self {
            url,
            public_key,
            timeout: Duration::from_secs(30),
            tls: TlsVerification::SystemDefaults,
        }
    }

    fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// Build the HTTP gateway for this project.
    pub fn connect(&self) -> Result<Arc<dyn Gateway>, CoreError> {
        let gateway = RestGateway::new(self.url.as_str(), &self.public_key, &self.transport())?;
        Ok(Arc::new(gateway))
    }
}
