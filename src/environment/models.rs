use serde::Deserialize;
use std::fmt;
use url::Url;

use super::EnvironmentError;

/// The subset of `~/.dnanexus_config/environment.json` this tool reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "DX_SECURITY_CONTEXT", default)]
    pub(crate) security_context: Option<String>,
    #[serde(rename = "DX_APISERVER_HOST", default)]
    pub(crate) api_server_host: Option<String>,
    #[serde(rename = "DX_APISERVER_PORT", default)]
    pub(crate) api_server_port: Option<String>,
    #[serde(rename = "DX_APISERVER_PROTOCOL", default)]
    pub(crate) api_server_protocol: Option<String>,
}

/// `DX_SECURITY_CONTEXT` is itself a JSON document stored as a string; only
/// the token is read.
#[derive(Debug, Deserialize)]
pub(crate) struct SecurityContext {
    pub(crate) auth_token: String,
}

/// Where the token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    ConfigFile,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Environment => "environment",
            TokenSource::ConfigFile => "~/.dnanexus_config/environment.json",
        }
    }
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiServer {
    protocol: String,
    host: String,
    port: u16,
}

impl ApiServer {
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port,
        }
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL with a trailing slash so routes can be joined onto it.
    pub fn base_url(&self) -> Result<Url, EnvironmentError> {
        let raw = format!("{}://{}:{}/", self.protocol, self.host, self.port);
        Url::parse(&raw).map_err(|_| EnvironmentError::InvalidServer(raw))
    }
}

impl Default for ApiServer {
    fn default() -> Self {
        Self::new("https", "api.dnanexus.com", 443)
    }
}

/// Everything needed to talk to the API: where, and as whom.
#[derive(Clone)]
pub struct DxEnvironment {
    pub(crate) api_server: ApiServer,
    pub(crate) token: String,
    pub(crate) token_source: TokenSource,
}

impl DxEnvironment {
    pub fn api_server(&self) -> &ApiServer {
        &self.api_server
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn token_source(&self) -> TokenSource {
        self.token_source
    }
}

// Keep the token out of debug output and logs.
impl fmt::Debug for DxEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DxEnvironment")
            .field("api_server", &self.api_server)
            .field("token", &"<redacted>")
            .field("token_source", &self.token_source)
            .finish()
    }
}
