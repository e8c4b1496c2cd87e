//! Command-line configuration for the `vault8` binary.
//!
//! Options can be passed as flags or through environment variables with the
//! `VAULT8_` prefix:
//!
//! - `VAULT8_PUBLIC_KEY` - Public key issued by the service (required)
//! - `VAULT8_SECRET_KEY` - Secret key issued by the service (required)
//! - `VAULT8_SERVICE_URL` - Base URL of the service (required)
//! - `VAULT8_HASH` - Token hash function, `sha1` or `sha256` (default: sha1)
//! - `VAULT8_SEGMENT_ENCODING` - `verbatim` or `percent` (default: verbatim)
//! - `VAULT8_QUERY_ENCODING` - `raw` or `percent` (default: raw)
//! - `VAULT8_TTL` - Lifetime of generated URLs in seconds (default: 3600)
//! - `VAULT8_TIMEOUT` - Upload request timeout in seconds (default: 30)
//!
//! # Example
//!
//! ```text
//! export VAULT8_PUBLIC_KEY=public VAULT8_SECRET_KEY=private
//! export VAULT8_SERVICE_URL=http://lvh.me:3000
//!
//! vault8 image-url 731f70564f9145d79282f8267c4495ee \
//!     --filters '[{"resize_fill":[150,140]},{"grayscale":""}]' --ttl 600
//! vault8 upload --file ./cat.png
//! ```

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::client::{Client, DEFAULT_UPLOAD_PATH};
use crate::error::{ConfigError, InputError};
use crate::signing::{
    parse_filters_json, FilterGroup, HashAlgorithm, QueryEncoding, SegmentEncoding,
    SigningPolicy, ValidityWindow, DEFAULT_FILE_NAME,
};
use crate::upload::{UploadConfig, UploadPayload};

// =============================================================================
// Default Values
// =============================================================================

/// Default lifetime of signed URLs in seconds (1 hour).
pub const DEFAULT_TTL: u64 = 3600;

/// Default upload timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Vault8 - signed URLs and uploads for the Vault8 image service.
#[derive(Parser, Debug, Clone)]
#[command(name = "vault8")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the URL of an image, signed when a validity window is given
    ImageUrl(ImageUrlConfig),

    /// Print a signed upload URL
    UploadUrl(UploadUrlConfig),

    /// Print the token for a path
    Token(TokenConfig),

    /// Check a previously generated URL
    Verify(VerifyConfig),

    /// Upload an image from a URL, a file or stdin
    Upload(UploadCommandConfig),
}

/// Output format for generated URLs.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Only the URL
    #[default]
    Url,

    /// JSON object with the URL, path and window
    Json,
}

// =============================================================================
// Shared Options
// =============================================================================

/// Credentials, service URL and signing policy.
#[derive(Args, Debug, Clone)]
pub struct ServiceConfig {
    /// Public key issued by the service.
    #[arg(long, env = "VAULT8_PUBLIC_KEY")]
    pub public_key: Option<String>,

    /// Secret key issued by the service. Never sent over the wire.
    #[arg(long, env = "VAULT8_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Base URL of the service, e.g. https://vault8.example.com
    #[arg(long, env = "VAULT8_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Hash function the service verifies tokens with (sha1 or sha256).
    #[arg(long, default_value_t = HashAlgorithm::Sha1, env = "VAULT8_HASH")]
    pub hash: HashAlgorithm,

    /// Encoding of resource ids and file names in paths (verbatim or percent).
    #[arg(long, default_value_t = SegmentEncoding::Verbatim, env = "VAULT8_SEGMENT_ENCODING")]
    pub segment_encoding: SegmentEncoding,

    /// Encoding of query values (raw or percent).
    #[arg(long, default_value_t = QueryEncoding::Raw, env = "VAULT8_QUERY_ENCODING")]
    pub query_encoding: QueryEncoding,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ServiceConfig {
    /// Signing policy selected by the flags.
    pub fn policy(&self) -> SigningPolicy {
        SigningPolicy::default()
            .with_hash(self.hash)
            .with_segment_encoding(self.segment_encoding)
            .with_query_encoding(self.query_encoding)
    }

    /// Build a client, failing on missing or invalid settings.
    pub fn build_client(&self) -> Result<Client, ConfigError> {
        let client = Client::create(
            self.public_key.as_deref().unwrap_or_default(),
            self.secret_key.as_deref().unwrap_or_default(),
            self.service_url.as_deref().unwrap_or_default(),
        )?;
        Ok(client.with_policy(self.policy()))
    }
}

/// Validity window options.
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Start of validity in epoch seconds.
    #[arg(long = "time")]
    pub current_time: Option<i64>,

    /// End of validity in epoch seconds.
    #[arg(long = "until")]
    pub until_time: Option<i64>,

    /// Lifetime in seconds, counted from now. Ignored when --time or --until is set.
    #[arg(long, env = "VAULT8_TTL")]
    pub ttl: Option<u64>,
}

impl WindowArgs {
    /// Resolve the window; `now` is only used for `--ttl`.
    ///
    /// Explicit bounds win over the TTL. Without either, `default_ttl`
    /// decides whether a window is produced at all.
    pub fn resolve(&self, now: SystemTime, default_ttl: Option<u64>) -> ValidityWindow {
        if self.current_time.is_some() || self.until_time.is_some() {
            return ValidityWindow {
                current_time: self.current_time,
                until_time: self.until_time,
            };
        }

        match self.ttl.or(default_ttl) {
            Some(ttl) => ValidityWindow::with_ttl(now, Duration::from_secs(ttl)),
            None => ValidityWindow::unbounded(),
        }
    }

    /// Resolve a window where both bounds are required.
    pub fn resolve_bounded(&self, now: SystemTime) -> Result<(i64, i64), String> {
        let window = self.resolve(now, Some(DEFAULT_TTL));
        match (window.current_time, window.until_time) {
            (Some(current_time), Some(until_time)) => Ok((current_time, until_time)),
            _ => Err("--time and --until must be given together".to_string()),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if let (Some(current_time), Some(until_time)) = (self.current_time, self.until_time) {
            if until_time < current_time {
                return Err("--until must not be earlier than --time".to_string());
            }
        }
        if self.ttl == Some(0) {
            return Err("--ttl must be greater than 0".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Subcommand Configuration
// =============================================================================

/// Options for `vault8 image-url`.
#[derive(Args, Debug, Clone)]
pub struct ImageUrlConfig {
    #[command(flatten)]
    pub service: ServiceConfig,

    /// Resource id returned by the upload.
    pub resource_id: String,

    /// Filters as JSON, e.g. '[{"resize_fill":[150,140]},{"grayscale":""}]'.
    #[arg(long)]
    pub filters: Option<String>,

    /// File name at the end of the path.
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    pub file_name: String,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Url)]
    pub format: OutputFormat,
}

impl ImageUrlConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.resource_id.is_empty() {
            return Err(InputError::EmptyResourceId.to_string());
        }
        self.window.validate()
    }

    /// Parse the `--filters` option.
    pub fn parse_filters(&self) -> Result<Vec<FilterGroup>, InputError> {
        match self.filters.as_deref() {
            Some(json) => parse_filters_json(json),
            None => Ok(Vec::new()),
        }
    }
}

/// Options for `vault8 upload-url`.
#[derive(Args, Debug, Clone)]
pub struct UploadUrlConfig {
    #[command(flatten)]
    pub service: ServiceConfig,

    /// Upload endpoint path.
    #[arg(long, default_value = DEFAULT_UPLOAD_PATH)]
    pub path: String,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Url)]
    pub format: OutputFormat,
}

impl UploadUrlConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.path.is_empty() {
            return Err("--path must not be empty".to_string());
        }
        self.window.validate()
    }
}

/// Options for `vault8 token`.
#[derive(Args, Debug, Clone)]
pub struct TokenConfig {
    #[command(flatten)]
    pub service: ServiceConfig,

    /// Canonical path to sign, e.g. /731f70564f9145d79282f8267c4495ee/john.jpg
    pub path: String,

    /// Start of validity in epoch seconds.
    #[arg(long = "time")]
    pub current_time: Option<i64>,

    /// End of validity in epoch seconds.
    #[arg(long = "until")]
    pub until_time: Option<i64>,
}

impl TokenConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.path.is_empty() {
            return Err("Path must not be empty".to_string());
        }
        Ok(())
    }

    pub fn window(&self) -> ValidityWindow {
        ValidityWindow {
            current_time: self.current_time,
            until_time: self.until_time,
        }
    }
}

/// Options for `vault8 verify`.
#[derive(Args, Debug, Clone)]
pub struct VerifyConfig {
    #[command(flatten)]
    pub service: ServiceConfig,

    /// URL to check.
    pub url: String,
}

/// Options for `vault8 upload`.
#[derive(Args, Debug, Clone)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["url", "file", "stdin"]),
))]
pub struct UploadCommandConfig {
    #[command(flatten)]
    pub service: ServiceConfig,

    /// Public URL the service should fetch the image from.
    #[arg(long)]
    pub url: Option<String>,

    /// Local image file.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Read the image from standard input.
    #[arg(long)]
    pub stdin: bool,

    /// File name sent with --stdin uploads.
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    pub file_name: String,

    /// Upload endpoint path.
    #[arg(long, default_value = DEFAULT_UPLOAD_PATH)]
    pub path: String,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "VAULT8_TIMEOUT")]
    pub timeout: u64,
}

impl UploadCommandConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("--timeout must be greater than 0".to_string());
        }
        if self.stdin && self.file_name.is_empty() {
            return Err("--file-name must not be empty".to_string());
        }
        self.window.validate()
    }

    /// Transport settings.
    pub fn upload_config(&self) -> UploadConfig {
        UploadConfig::default().with_timeout(Duration::from_secs(self.timeout))
    }

    /// Payload selected by `--url`, `--file` or `--stdin`.
    pub fn payload(&self) -> Result<UploadPayload, String> {
        if let Some(ref url) = self.url {
            return Ok(UploadPayload::remote_url(url.clone()));
        }
        if let Some(ref file) = self.file {
            return Ok(UploadPayload::local_file(file.clone()));
        }
        if self.stdin {
            return Ok(UploadPayload::stream(
                self.file_name.clone(),
                tokio::io::stdin(),
            ));
        }
        Err("One of --url, --file or --stdin is required".to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
