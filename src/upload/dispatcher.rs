//! Upload dispatcher.

use tracing::{info, warn};

use crate::client::{Client, DEFAULT_UPLOAD_PATH};
use crate::error::UploadError;

use super::payload::UploadPayload;
use super::result::UploadResult;
use super::transport::{HttpTransport, UploadConfig, UploadTransport};

/// Signs upload URLs and sends payloads through a transport.
///
/// [`upload`](Self::upload) never fails: every problem is logged and turned
/// into an error [`UploadResult`].
///
/// # Example
///
/// ```ignore
/// use vault8::{Client, UploadDispatcher, UploadPayload};
/// use vault8::upload::UploadConfig;
///
/// let client = Client::create("public", "private", "https://vault8.example.com")?;
/// let uploader = UploadDispatcher::new(client, &UploadConfig::default())?;
///
/// let result = uploader
///     .upload(UploadPayload::local_file("cat.png"), now, now + 3600)
///     .await;
/// if let Some(uid) = result.image_uid() {
///     println!("uploaded as {}", uid);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct UploadDispatcher<T: UploadTransport = HttpTransport> {
    client: Client,
    transport: T,
    upload_path: String,
}

impl UploadDispatcher<HttpTransport> {
    /// Create a dispatcher using the `reqwest` transport.
    pub fn new(client: Client, config: &UploadConfig) -> Result<Self, UploadError> {
        Ok(Self::with_transport(client, HttpTransport::new(config)?))
    }
}

impl<T: UploadTransport> UploadDispatcher<T> {
    /// Create a dispatcher with a custom transport.
    pub fn with_transport(client: Client, transport: T) -> Self {
        Self {
            client,
            transport,
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
        }
    }

    /// Post to another path than `/upload`. The path must start with `/`.
    pub fn with_upload_path(mut self, path: impl Into<String>) -> Self {
        self.upload_path = path.into();
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Upload a payload with an upload URL valid between the given times.
    pub async fn upload(
        &self,
        payload: UploadPayload,
        current_time: i64,
        until_time: i64,
    ) -> UploadResult {
        let kind = payload.kind();

        match self.try_upload(payload, current_time, until_time).await {
            Ok(result) => {
                if result.is_success() {
                    info!(
                        payload = kind,
                        image_uid = result.image_uid().unwrap_or_default(),
                        "Upload succeeded"
                    );
                } else {
                    warn!(payload = kind, "Upload rejected by service");
                }
                result
            }
            Err(err) => {
                warn!(payload = kind, error = %err, "Upload failed");
                UploadResult::from_error(&err)
            }
        }
    }

    async fn try_upload(
        &self,
        payload: UploadPayload,
        current_time: i64,
        until_time: i64,
    ) -> Result<UploadResult, UploadError> {
        let url = self
            .client
            .upload_url(&self.upload_path, current_time, until_time)
            .map_err(|e| UploadError::InvalidUrl(e.to_string()))?;

        let body = payload.into_body().await?;
        let response = self.transport.send(&url, body).await?;

        UploadResult::from_body(&response)
    }
}
