//! Final URL assembly.
//!
//! The canonical path is resolved against the service URL and followed by
//! the query fields in fixed order:
//!
//! ```text
//! {base}{path}?p={public_key}&s={token}&time={current_time}&until={until_time}
//! ```
//!
//! Fields without a value are skipped, and the `?` is dropped when nothing
//! remains.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::InputError;

use super::window::ValidityWindow;

/// How query values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryEncoding {
    /// Values are written as-is (reference behavior)
    #[default]
    Raw,

    /// Values are percent-encoded
    PercentEncode,
}

impl QueryEncoding {
    fn apply(&self, value: &str) -> String {
        match self {
            QueryEncoding::Raw => value.to_string(),
            QueryEncoding::PercentEncode => urlencoding::encode(value).into_owned(),
        }
    }
}

impl fmt::Display for QueryEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryEncoding::Raw => write!(f, "raw"),
            QueryEncoding::PercentEncode => write!(f, "percent"),
        }
    }
}

impl FromStr for QueryEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(QueryEncoding::Raw),
            "percent" => Ok(QueryEncoding::PercentEncode),
            other => Err(format!(
                "unknown query encoding '{}', expected raw or percent",
                other
            )),
        }
    }
}

/// Resolve `path` against `base`.
///
/// `path` must be path-absolute and must come out of the join unchanged:
/// the token is computed over `path`, so the URL has to carry exactly the
/// same bytes. Scheme, host and port are kept from `base`.
///
/// # Errors
///
/// Returns [`InputError::InvalidPath`] if `path` has no leading slash, would
/// move the URL to another host (such as `//other.host/x`), or would be
/// rewritten by URL parsing: a `?` or `#` splitting it, dot segments being
/// removed, or characters being percent-encoded.
pub fn join_path(base: &Url, path: &str) -> Result<Url, InputError> {
    let invalid = |reason: &str| InputError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if !path.starts_with('/') {
        return Err(invalid("path must start with '/'"));
    }

    let joined = base.join(path).map_err(|e| invalid(&e.to_string()))?;

    let same_origin = joined.scheme() == base.scheme()
        && joined.host_str() == base.host_str()
        && joined.port_or_known_default() == base.port_or_known_default();
    if !same_origin {
        return Err(invalid("path would leave the service host"));
    }

    if joined.query().is_some() || joined.fragment().is_some() {
        return Err(invalid("path contains '?' or '#'"));
    }

    if joined.path() != path {
        return Err(invalid(&format!(
            "path would be sent as '{}'",
            joined.path()
        )));
    }

    Ok(joined)
}

/// Build the ordered query string. Returns an empty string when no field
/// has a value.
pub fn query_string(
    public_key: Option<&str>,
    token: Option<&str>,
    window: &ValidityWindow,
    encoding: QueryEncoding,
) -> String {
    let current_time = window.current_time.map(|t| t.to_string());
    let until_time = window.until_time.map(|t| t.to_string());

    let fields = [
        ("p", public_key),
        ("s", token),
        ("time", current_time.as_deref()),
        ("until", until_time.as_deref()),
    ];

    fields
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, encoding.apply(v))))
        .collect::<Vec<_>>()
        .join("&")
}

/// Assemble the absolute URL for `path` with its query string.
pub fn assemble(
    base: &Url,
    path: &str,
    public_key: Option<&str>,
    token: Option<&str>,
    window: &ValidityWindow,
    encoding: QueryEncoding,
) -> Result<String, InputError> {
    let joined = join_path(base, path)?;

    let mut url = String::from(joined.as_str());
    let query = query_string(public_key, token, window, encoding);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    Ok(url)
}
