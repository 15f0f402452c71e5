mod models;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub use models::{ApiServer, ConfigFile, DxEnvironment, TokenSource}; // Re-export the model types to callers.
use models::SecurityContext;

pub const TOKEN_VAR: &str = "DX_API_TOKEN";
pub const HOST_VAR: &str = "DX_APISERVER_HOST";
pub const PORT_VAR: &str = "DX_APISERVER_PORT";
pub const PROTOCOL_VAR: &str = "DX_APISERVER_PROTOCOL";

/// Location of the dx-toolkit config file under `home`.
pub fn config_file_path(home: impl AsRef<Path>) -> PathBuf {
    home.as_ref()
        .join(".dnanexus_config")
        .join("environment.json")
}

/// Parse a config file from a JSON string.
pub fn from_json_str(json: &str) -> Result<ConfigFile, EnvironmentError> {
    serde_json::from_str(json).map_err(EnvironmentError::Json)
}

/// Parse a config file from disk.
pub fn from_file(path: impl AsRef<Path>) -> Result<ConfigFile, EnvironmentError> {
    let data = fs::read_to_string(path).map_err(EnvironmentError::Io)?;
    from_json_str(&data)
}

/// Resolve the environment from the process variables and the user's
/// config file, if one exists.
pub fn load() -> Result<DxEnvironment, EnvironmentError> {
    let config = match env::var_os("HOME").map(config_file_path) {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "reading dx config file");
            Some(from_file(&path)?)
        }
        _ => None,
    };

    resolve(config.as_ref(), |name| env::var(name).ok())
}

/// Combine a config file with variable lookups. Variables win over the file;
/// empty values count as unset.
pub fn resolve<F>(config: Option<&ConfigFile>, var: F) -> Result<DxEnvironment, EnvironmentError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| var(name).filter(|v| !v.is_empty());
    let file = config.cloned().unwrap_or_default();
    let file_value = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

    let (token, token_source) = match lookup(TOKEN_VAR) {
        Some(token) => (token, TokenSource::Environment),
        None => {
            let context =
                file_value(&file.security_context).ok_or(EnvironmentError::MissingToken)?;
            let context: SecurityContext =
                serde_json::from_str(&context).map_err(EnvironmentError::SecurityContext)?;
            if context.auth_token.is_empty() {
                return Err(EnvironmentError::MissingToken);
            }
            (context.auth_token, TokenSource::ConfigFile)
        }
    };

    let defaults = ApiServer::default();
    let protocol = lookup(PROTOCOL_VAR)
        .or_else(|| file_value(&file.api_server_protocol))
        .unwrap_or_else(|| defaults.protocol().to_string());
    let host = lookup(HOST_VAR)
        .or_else(|| file_value(&file.api_server_host))
        .unwrap_or_else(|| defaults.host().to_string());
    let port = match lookup(PORT_VAR).or_else(|| file_value(&file.api_server_port)) {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|_| EnvironmentError::InvalidServer(format!("port '{raw}'")))?,
        None => defaults.port(),
    };

    let api_server = ApiServer::new(protocol, host, port);
    // Fail here rather than at the first request.
    api_server.base_url()?;

    Ok(DxEnvironment {
        api_server,
        token,
        token_source,
    })
}

/// ---- Errors ----
#[derive(thiserror::Error, Debug)]
pub enum EnvironmentError {
    #[error("no API token found: set DX_API_TOKEN or log in with the dx toolkit")]
    MissingToken,
    #[error("invalid API server: {0}")]
    InvalidServer(String),
    #[error("malformed DX_SECURITY_CONTEXT: {0}")]
    SecurityContext(#[source] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
