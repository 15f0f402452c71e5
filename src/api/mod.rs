pub mod models;
pub use models::{DescribeFields, DescribeRequest, FileDescription, PartDescription};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use url::Url;

use crate::environment::{DxEnvironment, EnvironmentError};
use models::ErrorBody;

const USER_AGENT: &str = concat!("dx-manifest/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Anything that can describe a file by id. The manifest builder only needs
/// this, which keeps it testable without a server.
#[async_trait]
pub trait DescribeFile {
    async fn describe_file(&self, file_id: &str, project: &str) -> Result<FileDescription, ApiError>;
}

/// Thin client over the platform's JSON-over-POST API.
#[derive(Clone)]
pub struct DxClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl DxClient {
    /// `base_url` should end with `/`; routes are joined onto it.
    pub fn new(base_url: Url, token: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self::with_client(http, base_url, token))
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots, timeouts).
    pub fn with_client(http: Client, base_url: Url, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url,
            token: token.into(),
        }
    }

    pub fn from_environment(env: &DxEnvironment) -> Result<Self, ApiError> {
        let base_url = env.api_server().base_url()?;
        Self::new(base_url, env.token())
    }

    /// URL for `segments` under the base URL. Each segment is
    /// percent-encoded on its own, so ids never change host, path depth,
    /// query or fragment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url {
                base: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// POST `payload` to the route made of `segments` and decode the JSON answer.
    async fn call<P, R>(&self, segments: &[&str], payload: &P) -> Result<R, ApiError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let route = segments.join("/");
        let url = self.endpoint(segments)?;

        tracing::debug!(%url, "POST");

        let res = self
            .http
            .post(url.clone())
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = res.status();
        let body = res.bytes().await.map_err(ApiError::Transport)?;

        if !status.is_success() {
            return Err(ApiError::from_response(&route, status, &body));
        }

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { route, source })
    }
}

#[async_trait]
impl DescribeFile for DxClient {
    async fn describe_file(&self, file_id: &str, project: &str) -> Result<FileDescription, ApiError> {
        let request = DescribeRequest {
            project,
            fields: DescribeFields::manifest(),
        };
        self.call(&[file_id, "describe"], &request).await
    }
}

/// ---- Errors ----
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{route}: {status} {kind}: {message}")]
    Status {
        route: String,
        status: StatusCode,
        kind: String,
        message: String,
    },
    #[error("cannot append routes to base URL '{base}'")]
    Url { base: String },
    #[error("cannot decode response from '{route}': {source}")]
    Decode {
        route: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

impl ApiError {
    /// Build a status error, using the service's error envelope when the
    /// body carries one.
    fn from_response(route: &str, status: StatusCode, body: &[u8]) -> Self {
        let (kind, message) = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(envelope) => (envelope.error.kind, envelope.error.message),
            Err(_) => (
                String::from("HTTPError"),
                String::from_utf8_lossy(body).trim().to_string(),
            ),
        };

        ApiError::Status {
            route: route.to_string(),
            status,
            kind,
            message,
        }
    }

    /// HTTP status for errors the service answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
