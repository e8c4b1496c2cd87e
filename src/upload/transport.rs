//! HTTP transport for uploads.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::UploadError;

use super::payload::UploadBody;

/// Default request timeout for uploads.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Form field carrying a remote image URL.
pub const URL_FIELD: &str = "url";

/// Multipart part carrying the image file.
pub const FILE_FIELD: &str = "file";

/// Sends an upload request and returns the raw response body.
///
/// Implementations return the body for any HTTP status; only failures to
/// obtain a body are errors.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn send(&self, url: &str, body: UploadBody) -> Result<String, UploadError>;
}

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Whole-request timeout
    pub timeout: Duration,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_UPLOAD_TIMEOUT,
            user_agent: format!("vault8/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl UploadConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// [`UploadTransport`] backed by `reqwest`.
///
/// Remote URLs are posted as `application/x-www-form-urlencoded` with a
/// `url` field; files as `multipart/form-data` with a `file` part.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { http })
    }

    /// Wrap an existing `reqwest` client.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn send(&self, url: &str, body: UploadBody) -> Result<String, UploadError> {
        let request = match body {
            UploadBody::RemoteUrl(remote) => {
                self.http.post(url).form(&[(URL_FIELD, remote.as_str())])
            }
            UploadBody::File {
                file_name,
                content_type,
                data,
            } => {
                let part = Part::bytes(data.to_vec())
                    .file_name(file_name)
                    .mime_str(content_type)?;
                self.http
                    .post(url)
                    .multipart(Form::new().part(FILE_FIELD, part))
            }
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(
            status = status.as_u16(),
            bytes = text.len(),
            "Upload response received"
        );
        Ok(text)
    }
}
