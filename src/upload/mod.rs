//! Image uploads.
//!
//! Uploads sit outside the signing engine: the dispatcher asks the
//! [`Client`](crate::Client) for a signed upload URL and hands it, together
//! with the payload, to an [`UploadTransport`].
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  UploadPayload                               │
//! │  RemoteUrl | LocalFile | Stream              │
//! └──────────────────────┬───────────────────────┘
//!                        │ into_body()
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │  UploadDispatcher                            │
//! │  Client::upload_url + UploadTransport::send  │
//! └──────────────────────┬───────────────────────┘
//!                        │ response body
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │  UploadResult { status, fields }             │
//! └──────────────────────────────────────────────┘
//! ```

mod dispatcher;
mod payload;
mod result;
mod transport;

pub use dispatcher::UploadDispatcher;
pub use payload::{content_type_for, UploadBody, UploadPayload, DEFAULT_CONTENT_TYPE};
pub use result::{UploadResult, UploadStatus, IMAGE_UID_FIELD, MESSAGE_FIELD, RESPONSE_FIELD};
pub use transport::{
    HttpTransport, UploadConfig, UploadTransport, DEFAULT_UPLOAD_TIMEOUT, FILE_FIELD, URL_FIELD,
};
