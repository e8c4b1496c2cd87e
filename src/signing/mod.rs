//! URL signing engine.
//!
//! Everything in this module is a pure function of its inputs: no I/O, no
//! clock, no shared state. The same inputs always produce the same bytes.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  resource id + filter groups + file name                 │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  filters::serialize  →  path::build_path                 │
//! │  "/{id}/resize_fill-150-140,grayscale/{file_name}"       │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  token::TokenSigner::sign(path, window)                  │
//! │  reverse(hex(HASH("p|s|path|time|until")))               │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  assembler::assemble                                     │
//! │  {base}{path}?p=..&s=..&time=..&until=..                 │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod assembler;
pub mod filters;
pub mod path;
pub mod token;
pub mod window;

pub use assembler::{assemble, join_path, query_string, QueryEncoding};
pub use filters::{parse_filters_json, serialize, FilterArg, FilterGroup};
pub use path::{build_path, SegmentEncoding, DEFAULT_FILE_NAME};
pub use token::{Credentials, HashAlgorithm, TokenSigner};
pub use window::{epoch_seconds, ValidityWindow};

/// Signing settings that must match the service deployment.
///
/// Fixed for the lifetime of a client; the defaults reproduce the reference
/// wire format (SHA-1, verbatim segments, raw query values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SigningPolicy {
    /// Hash function for tokens
    pub hash: HashAlgorithm,

    /// Encoding of resource id and file name in the path
    pub segments: SegmentEncoding,

    /// Encoding of query values
    pub query: QueryEncoding,
}

impl SigningPolicy {
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_segment_encoding(mut self, segments: SegmentEncoding) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_query_encoding(mut self, query: QueryEncoding) -> Self {
        self.query = query;
        self
    }
}
