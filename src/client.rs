//! Vault8 client.
//!
//! A [`Client`] owns the key pair, the service URL and the signing policy,
//! and exposes the URL-building operations on top of the signing engine.
//! It never reads the clock: every validity window comes from the caller.
//!
//! # Example
//!
//! ```rust
//! use vault8::{Client, FilterGroup, ValidityWindow};
//!
//! let client = Client::create("public", "private", "http://lvh.me:3000").unwrap();
//!
//! // Permanent, unsigned URL for a public asset
//! let url = client
//!     .image_url("731f70564f9145d79282f8267c4495ee", &[], "john.jpg", ValidityWindow::unbounded())
//!     .unwrap();
//! assert_eq!(url, "http://lvh.me:3000/731f70564f9145d79282f8267c4495ee/john.jpg");
//!
//! // Signed upload URL valid for one hour
//! let url = client.upload_url("/upload", 1_799_955_192, 1_799_958_792).unwrap();
//! assert_eq!(
//!     url,
//!     "http://lvh.me:3000/upload?p=public&s=b92268754db8d4b962f83bb31b22e2a435ca1e94&time=1799955192&until=1799958792"
//! );
//!
//! // Filters are applied in the order given
//! let filters = vec![
//!     FilterGroup::single("resize_fill", [150, 140]),
//!     FilterGroup::single("grayscale", ""),
//! ];
//! assert_eq!(
//!     client.merged_filters(&filters).as_deref(),
//!     Some("resize_fill-150-140,grayscale")
//! );
//! ```

use tracing::debug;
use url::Url;

use crate::error::{ConfigError, InputError, TokenError};
use crate::signing::{
    assemble, build_path, serialize, Credentials, FilterGroup, HashAlgorithm, QueryEncoding,
    SegmentEncoding, SigningPolicy, TokenSigner, ValidityWindow,
};

/// Path of the upload endpoint.
pub const DEFAULT_UPLOAD_PATH: &str = "/upload";

/// Client for building signed Vault8 URLs.
///
/// Cheap to clone and safe to share across threads; nothing in it changes
/// after construction.
#[derive(Debug, Clone)]
pub struct Client {
    signer: TokenSigner,
    service_url: Url,
    policy: SigningPolicy,
}

impl Client {
    /// Create a client with the default signing policy.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any argument is empty or the service URL
    /// is not an absolute URL.
    pub fn create(
        public_key: &str,
        secret_key: &str,
        service_url: &str,
    ) -> Result<Self, ConfigError> {
        if public_key.is_empty() {
            return Err(ConfigError::MissingPublicKey);
        }
        if secret_key.is_empty() {
            return Err(ConfigError::MissingSecretKey);
        }
        if service_url.is_empty() {
            return Err(ConfigError::MissingServiceUrl);
        }

        let service_url = parse_service_url(service_url)?;
        let policy = SigningPolicy::default();

        Ok(Self {
            signer: TokenSigner::new(Credentials::new(public_key, secret_key), policy.hash),
            service_url,
            policy,
        })
    }

    /// Replace the whole signing policy.
    pub fn with_policy(mut self, policy: SigningPolicy) -> Self {
        self.signer = TokenSigner::new(self.signer.credentials().clone(), policy.hash);
        self.policy = policy;
        self
    }

    /// Set the hash function used for tokens.
    pub fn with_hash_algorithm(self, hash: HashAlgorithm) -> Self {
        let policy = self.policy.with_hash(hash);
        self.with_policy(policy)
    }

    /// Set how resource ids and file names are written into paths.
    pub fn with_segment_encoding(self, segments: SegmentEncoding) -> Self {
        let policy = self.policy.with_segment_encoding(segments);
        self.with_policy(policy)
    }

    /// Set how query values are written.
    pub fn with_query_encoding(self, query: QueryEncoding) -> Self {
        let policy = self.policy.with_query_encoding(query);
        self.with_policy(policy)
    }

    pub fn public_key(&self) -> &str {
        self.signer.credentials().public_key()
    }

    pub fn service_url(&self) -> &Url {
        &self.service_url
    }

    pub fn policy(&self) -> SigningPolicy {
        self.policy
    }

    // =========================================================================
    // Paths
    // =========================================================================

    /// Serialized filter segment, or `None` without filters.
    pub fn merged_filters(&self, filters: &[FilterGroup]) -> Option<String> {
        serialize(filters)
    }

    /// Canonical path of an image: `/{resource_id}[/{filters}]/{file_name}`.
    pub fn image_path(
        &self,
        resource_id: &str,
        filters: &[FilterGroup],
        file_name: &str,
    ) -> Result<String, InputError> {
        build_path(resource_id, filters, file_name, self.policy.segments)
    }

    // =========================================================================
    // URLs
    // =========================================================================

    /// URL of an image.
    ///
    /// With an unbounded window the URL carries no query string at all, which
    /// suits permanently cacheable public assets. With any bound present the
    /// URL is signed.
    pub fn image_url(
        &self,
        resource_id: &str,
        filters: &[FilterGroup],
        file_name: &str,
        window: ValidityWindow,
    ) -> Result<String, InputError> {
        let path = self.image_path(resource_id, filters, file_name)?;

        if window.is_unbounded() {
            let url = assemble(
                &self.service_url,
                &path,
                None,
                None,
                &window,
                self.policy.query,
            )?;
            debug!(path = %path, "Built unsigned image URL");
            return Ok(url);
        }

        self.signed_url(&path, window)
    }

    /// Signed URL authorizing one upload request.
    ///
    /// `path` must start with `/`; it replaces any path of the service URL.
    pub fn upload_url(
        &self,
        path: &str,
        current_time: i64,
        until_time: i64,
    ) -> Result<String, InputError> {
        self.signed_url(path, ValidityWindow::between(current_time, until_time))
    }

    /// Signed URL for an arbitrary path.
    ///
    /// Unlike [`image_url`](Self::image_url), this signs even when the window
    /// is unbounded, producing only the `p` and `s` parameters.
    pub fn signed_url(&self, path: &str, window: ValidityWindow) -> Result<String, InputError> {
        let token = self.signer.sign(path, &window);
        let url = assemble(
            &self.service_url,
            path,
            Some(self.public_key()),
            Some(&token),
            &window,
            self.policy.query,
        )?;

        debug!(
            path = %path,
            current_time = ?window.current_time,
            until_time = ?window.until_time,
            hash = %self.policy.hash,
            "Built signed URL"
        );
        Ok(url)
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Token for a path and window, as emitted in the `s` parameter.
    pub fn encode_token(&self, path: &str, window: ValidityWindow) -> String {
        self.signer.sign(path, &window)
    }

    /// Check a token for a path and window.
    pub fn verify_token(
        &self,
        path: &str,
        window: ValidityWindow,
        token: &str,
    ) -> Result<(), TokenError> {
        self.signer.verify(path, &window, token)
    }

    /// Check a URL previously produced by a client with the same keys.
    ///
    /// The token is re-derived from the URL's own path and `time`/`until`
    /// parameters, so any edit to them is detected.
    pub fn verify_url(&self, signed_url: &str) -> Result<(), TokenError> {
        let url = Url::parse(signed_url).map_err(|e| TokenError::InvalidUrl(e.to_string()))?;

        let mut public_key: Option<String> = None;
        let mut token: Option<String> = None;
        let mut window = ValidityWindow::unbounded();

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "p" => public_key = Some(value.into_owned()),
                "s" => token = Some(value.into_owned()),
                "time" => window.current_time = Some(parse_time(&value)?),
                "until" => window.until_time = Some(parse_time(&value)?),
                _ => {}
            }
        }

        let token = token.ok_or(TokenError::MissingToken)?;
        if public_key.as_deref() != Some(self.public_key()) {
            return Err(TokenError::ForeignKey);
        }

        self.signer.verify(url.path(), &window, &token)
    }
}

fn parse_service_url(service_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(service_url).map_err(|e| ConfigError::InvalidServiceUrl {
        url: service_url.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidServiceUrl {
            url: service_url.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }

    Ok(url)
}

fn parse_time(value: &str) -> Result<i64, TokenError> {
    value
        .parse::<i64>()
        .map_err(|_| TokenError::InvalidTime(value.to_string()))
}

// =============================================================================
// Tests
// =============================================================================
