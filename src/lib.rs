//! # Vault8
//!
//! Client library for the Vault8 image hosting and transformation service.
//!
//! Vault8 serves images under paths that encode the resource id, an ordered
//! list of transformations and a file name. Access is granted through
//! time-limited URLs carrying a token derived from the key pair, the path and
//! the validity window. This crate builds those URLs and uploads images.
//!
//! ## Features
//!
//! - **Deterministic signing**: identical inputs always give identical URLs
//! - **Ordered filters**: transformations are serialized in caller order
//! - **Explicit time**: validity windows come from the caller, never the clock
//! - **Configurable scheme**: SHA-1 or SHA-256 tokens, optional percent-encoding
//! - **Uploads**: by remote URL, local file or stream, with uniform results
//!
//! ## Architecture
//!
//! - [`signing`] - Filter serialization, paths, tokens and URL assembly
//! - [`client`] - The [`Client`] tying credentials and service URL together
//! - [`upload`] - Upload dispatcher and HTTP transport
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust
//! use vault8::{Client, FilterGroup, ValidityWindow};
//!
//! let client = Client::create("public", "private", "http://lvh.me:3000").unwrap();
//!
//! let filters = vec![
//!     FilterGroup::single("resize_fill", [150, 140]),
//!     FilterGroup::single("grayscale", ""),
//!     FilterGroup::single("watermark", ["logo20", "center", "l"]),
//! ];
//!
//! let url = client
//!     .image_url(
//!         "731f70564f9145d79282f8267c4495ee",
//!         &filters,
//!         "john.jpg",
//!         ValidityWindow::between(1_799_955_192, 1_799_958_792),
//!     )
//!     .unwrap();
//!
//! assert!(url.starts_with(
//!     "http://lvh.me:3000/731f70564f9145d79282f8267c4495ee/resize_fill-150-140,grayscale,watermark-logo20-center-l/john.jpg?p=public&s="
//! ));
//! assert!(url.ends_with("&time=1799955192&until=1799958792"));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod signing;
pub mod upload;

// Re-export commonly used types
pub use client::{Client, DEFAULT_UPLOAD_PATH};
pub use config::{Cli, Command, OutputFormat};
pub use error::{ConfigError, InputError, TokenError, UploadError};
pub use signing::{
    Credentials, FilterArg, FilterGroup, HashAlgorithm, QueryEncoding, SegmentEncoding,
    SigningPolicy, TokenSigner, ValidityWindow, DEFAULT_FILE_NAME,
};
pub use upload::{
    HttpTransport, UploadConfig, UploadDispatcher, UploadPayload, UploadResult, UploadStatus,
    UploadTransport,
};
