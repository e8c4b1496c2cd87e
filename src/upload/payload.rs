//! Upload payloads.

use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::UploadError;
use crate::signing::DEFAULT_FILE_NAME;

/// Content type used when the extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// What to upload.
pub enum UploadPayload {
    /// Image the service fetches itself from a public URL
    RemoteUrl(String),

    /// Image read from the local filesystem
    LocalFile(PathBuf),

    /// Image read from an arbitrary async reader
    Stream {
        /// File name sent with the multipart part
        file_name: String,
        /// Source of the image bytes
        reader: Box<dyn AsyncRead + Send + Unpin>,
    },
}

impl UploadPayload {
    pub fn remote_url(url: impl Into<String>) -> Self {
        UploadPayload::RemoteUrl(url.into())
    }

    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        UploadPayload::LocalFile(path.into())
    }

    pub fn stream(
        file_name: impl Into<String>,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        UploadPayload::Stream {
            file_name: file_name.into(),
            reader: Box::new(reader),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UploadPayload::RemoteUrl(_) => "remote_url",
            UploadPayload::LocalFile(_) => "local_file",
            UploadPayload::Stream { .. } => "stream",
        }
    }

    /// Read the payload into a request body.
    pub async fn into_body(self) -> Result<UploadBody, UploadError> {
        match self {
            UploadPayload::RemoteUrl(url) => Ok(UploadBody::RemoteUrl(url)),
            UploadPayload::LocalFile(path) => {
                let data = tokio::fs::read(&path).await.map_err(|e| {
                    UploadError::Io(format!("failed to read {}: {}", path.display(), e))
                })?;
                let file_name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or(DEFAULT_FILE_NAME)
                    .to_string();
                Ok(UploadBody::file(file_name, Bytes::from(data)))
            }
            UploadPayload::Stream {
                file_name,
                mut reader,
            } => {
                let mut data = Vec::new();
                reader.read_to_end(&mut data).await?;
                Ok(UploadBody::file(file_name, Bytes::from(data)))
            }
        }
    }
}

impl fmt::Debug for UploadPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadPayload::RemoteUrl(url) => f.debug_tuple("RemoteUrl").field(url).finish(),
            UploadPayload::LocalFile(path) => f.debug_tuple("LocalFile").field(path).finish(),
            UploadPayload::Stream { file_name, .. } => f
                .debug_struct("Stream")
                .field("file_name", file_name)
                .finish_non_exhaustive(),
        }
    }
}

/// Request body handed to an [`UploadTransport`](super::UploadTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadBody {
    /// Form field `url`
    RemoteUrl(String),

    /// Multipart part `file`
    File {
        file_name: String,
        content_type: &'static str,
        data: Bytes,
    },
}

impl UploadBody {
    /// File body with the content type derived from the file name.
    pub fn file(file_name: String, data: Bytes) -> Self {
        let content_type = content_type_for(&file_name);
        UploadBody::File {
            file_name,
            content_type,
            data,
        }
    }
}

/// Content type for an image file name, by extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("svg") => "image/svg+xml",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
