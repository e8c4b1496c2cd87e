//! Canonical resource paths.
//!
//! A resource path has the shape
//!
//! ```text
//! /{resource_id}[/{filters}]/{file_name}
//! ```
//!
//! The leading slash is part of the canonical form: the same string is fed to
//! the token signer and joined onto the service URL, so the two always agree.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

use super::filters::{serialize, FilterGroup};

/// File name used when the caller does not provide one.
pub const DEFAULT_FILE_NAME: &str = "image.jpg";

/// How the resource id and file name are embedded into the path.
///
/// The filter segment is never encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentEncoding {
    /// Copy the segments as given (reference behavior)
    #[default]
    Verbatim,

    /// Percent-encode each segment, including any `/`
    PercentEncode,
}

impl SegmentEncoding {
    fn apply<'a>(&self, segment: &'a str) -> Cow<'a, str> {
        match self {
            SegmentEncoding::Verbatim => Cow::Borrowed(segment),
            SegmentEncoding::PercentEncode => urlencoding::encode(segment),
        }
    }
}

impl fmt::Display for SegmentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentEncoding::Verbatim => write!(f, "verbatim"),
            SegmentEncoding::PercentEncode => write!(f, "percent"),
        }
    }
}

impl FromStr for SegmentEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verbatim" => Ok(SegmentEncoding::Verbatim),
            "percent" => Ok(SegmentEncoding::PercentEncode),
            other => Err(format!(
                "unknown segment encoding '{}', expected verbatim or percent",
                other
            )),
        }
    }
}

/// Build the canonical path for an image.
///
/// # Errors
///
/// Returns [`InputError::EmptyResourceId`] if `resource_id` is empty.
pub fn build_path(
    resource_id: &str,
    filters: &[FilterGroup],
    file_name: &str,
    encoding: SegmentEncoding,
) -> Result<String, InputError> {
    if resource_id.is_empty() {
        return Err(InputError::EmptyResourceId);
    }

    let mut path = String::with_capacity(resource_id.len() + file_name.len() + 2);
    path.push('/');
    path.push_str(&encoding.apply(resource_id));

    if let Some(segment) = serialize(filters) {
        path.push('/');
        path.push_str(&segment);
    }

    path.push('/');
    path.push_str(&encoding.apply(file_name));

    Ok(path)
}
