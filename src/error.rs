use thiserror::Error;

/// Errors raised while constructing a [`Client`](crate::Client).
///
/// These are fatal: a client is never created from incomplete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Public key is missing or empty
    #[error("Public key is required")]
    MissingPublicKey,

    /// Secret key is missing or empty
    #[error("Secret key is required")]
    MissingSecretKey,

    /// Service URL is missing or empty
    #[error("Service URL is required")]
    MissingServiceUrl,

    /// Service URL is not an absolute URL usable as a base
    #[error("Invalid service URL '{url}': {reason}")]
    InvalidServiceUrl { url: String, reason: String },
}

/// Errors caused by malformed caller input to the signing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Resource id is empty
    #[error("Resource id must not be empty")]
    EmptyResourceId,

    /// Filter list could not be parsed
    #[error("Invalid filters: {0}")]
    InvalidFilters(String),

    /// Path cannot be resolved against the service URL
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Errors returned when a token or a signed URL does not verify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token is not a hex string
    #[error("Invalid token format")]
    InvalidFormat,

    /// Token does not match the expected value
    #[error("Token mismatch")]
    Mismatch,

    /// URL carries no `s` parameter
    #[error("Missing token parameter")]
    MissingToken,

    /// URL was signed for another public key
    #[error("URL was signed for a different public key")]
    ForeignKey,

    /// `time` or `until` is not an integer
    #[error("Invalid time parameter: {0}")]
    InvalidTime(String),

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failures inside the upload pipeline.
///
/// These never reach callers of [`UploadDispatcher::upload`](crate::upload::UploadDispatcher::upload);
/// they are logged and folded into an error [`UploadResult`](crate::upload::UploadResult).
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// Reading the local payload failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Upload URL could not be built
    #[error("Invalid upload URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed before a response body was read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body is not a JSON object
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Transport(err.to_string())
    }
}
