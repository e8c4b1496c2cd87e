//! Token computation for signed URLs.
//!
//! # Token Scheme
//!
//! The signing input joins the present fields with `|`:
//!
//! ```text
//! {public_key}|{secret_key}|{path}[|{current_time}][|{until_time}]
//! ```
//!
//! Absent time bounds are dropped from the join, they never appear as empty
//! placeholders. The input is hashed, rendered as lowercase hex, and the hex
//! string is reversed character by character:
//!
//! ```text
//! token = reverse(hex(HASH(input)))
//! ```
//!
//! The hash function is fixed per client and must match the one the service
//! verifies with. Most deployments use SHA-1.
//!
//! # Example
//!
//! ```rust
//! use vault8::signing::{Credentials, HashAlgorithm, TokenSigner, ValidityWindow};
//!
//! let signer = TokenSigner::new(Credentials::new("public", "private"), HashAlgorithm::Sha1);
//! let window = ValidityWindow::between(1_799_955_192, 1_799_958_792);
//!
//! let token = signer.sign("/upload", &window);
//! assert_eq!(token, "b92268754db8d4b962f83bb31b22e2a435ca1e94");
//! assert!(signer.verify("/upload", &window, &token).is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use sha1::{Digest, Sha1};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::TokenError;

use super::window::ValidityWindow;

/// Separator between fields of the signing input.
const FIELD_SEPARATOR: &str = "|";

// =============================================================================
// Types
// =============================================================================

/// Hash function used for tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// SHA-1, 40 hex characters
    #[default]
    Sha1,

    /// SHA-256, 64 hex characters
    Sha256,
}

impl HashAlgorithm {
    /// Length of a token produced with this algorithm.
    pub fn token_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha256 => 64,
        }
    }

    fn hex_digest(&self, input: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha1 => hex::encode(Sha1::digest(input)),
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(input)),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha1 => write!(f, "sha1"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(HashAlgorithm::Sha1),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            other => Err(format!(
                "unknown hash algorithm '{}', expected sha1 or sha256",
                other
            )),
        }
    }
}

/// Public/secret key pair issued by the service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    public_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// The public key, as sent in the `p` query parameter.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}

// The secret key must not end up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Token Signer
// =============================================================================

/// Computes and verifies tokens for one key pair and hash function.
#[derive(Debug, Clone)]
pub struct TokenSigner {
    credentials: Credentials,
    hash: HashAlgorithm,
}

impl TokenSigner {
    pub fn new(credentials: Credentials, hash: HashAlgorithm) -> Self {
        Self { credentials, hash }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    /// Compute the token for a path and validity window.
    pub fn sign(&self, path: &str, window: &ValidityWindow) -> String {
        let input = signing_input(
            &self.credentials.public_key,
            &self.credentials.secret_key,
            path,
            window,
        );

        // Reversal is part of the wire format.
        self.hash.hex_digest(input.as_bytes()).chars().rev().collect()
    }

    /// Check a token against the one expected for `path` and `window`.
    ///
    /// Comparison runs in constant time. Validity bounds are not compared to
    /// the clock here; the service enforces them.
    pub fn verify(
        &self,
        path: &str,
        window: &ValidityWindow,
        token: &str,
    ) -> Result<(), TokenError> {
        let provided = hex::decode(token).map_err(|_| TokenError::InvalidFormat)?;

        let expected_hex = self.sign(path, window);
        let expected = hex::decode(&expected_hex).map_err(|_| TokenError::InvalidFormat)?;

        if provided.ct_eq(&expected).into() {
            Ok(())
        } else {
            Err(TokenError::Mismatch)
        }
    }
}

/// Build the string that gets hashed.
fn signing_input(
    public_key: &str,
    secret_key: &str,
    path: &str,
    window: &ValidityWindow,
) -> String {
    let mut fields: Vec<String> = vec![
        public_key.to_string(),
        secret_key.to_string(),
        path.to_string(),
    ];
    if let Some(current_time) = window.current_time {
        fields.push(current_time.to_string());
    }
    if let Some(until_time) = window.until_time {
        fields.push(until_time.to_string());
    }
    fields.join(FIELD_SEPARATOR)
}

// =============================================================================
// Tests
// =============================================================================
