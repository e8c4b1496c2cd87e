//! Filter serialization.
//!
//! Filters are opaque `name → argument` pairs that the image service applies
//! in the order they appear in the URL. This module renders an ordered list of
//! filter groups into the single path segment used both in the image path and
//! in the signing input:
//!
//! ```text
//! [{resize_fill: [150, 140]}, {grayscale: ""}, {watermark: [logo20, center, l]}]
//!     → resize_fill-150-140,grayscale,watermark-logo20-center-l
//! ```
//!
//! # Rules
//!
//! - **Caller order**: names are never sorted. The signature depends on the
//!   exact byte sequence, so the same filters in a different order produce a
//!   different URL.
//! - **Flattening**: pairs within a group and groups themselves are both
//!   joined with `,`. `[{a, b}]` and `[{a}, {b}]` render identically.
//! - **Flags**: a filter whose argument is absent or renders to an empty
//!   string is emitted as the bare name.
//! - **No escaping**: names and arguments are emitted verbatim.

use std::fmt;

use serde_json::Value;

use crate::error::InputError;

/// Separator between the filter name and each of its arguments.
const ARG_SEPARATOR: &str = "-";

/// Separator between rendered filters.
const FILTER_SEPARATOR: &str = ",";

// =============================================================================
// Filter Arguments
// =============================================================================

/// Argument of a single filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterArg {
    /// No argument; the filter renders as its bare name
    #[default]
    Flag,

    /// A single value, e.g. `blur-1`
    Scalar(String),

    /// Several values joined by dashes, e.g. `resize_fill-150-140`
    List(Vec<String>),
}

impl FilterArg {
    /// Create a scalar argument from anything with a natural string form.
    pub fn scalar(value: impl fmt::Display) -> Self {
        FilterArg::Scalar(value.to_string())
    }

    /// Create a list argument; values keep their given order.
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        FilterArg::List(values.into_iter().map(|v| v.to_string()).collect())
    }

    /// Render the argument part (without the filter name).
    ///
    /// An empty string means the filter is rendered as a flag.
    pub fn render(&self) -> String {
        match self {
            FilterArg::Flag => String::new(),
            FilterArg::Scalar(value) => value.clone(),
            FilterArg::List(values) => values.join(ARG_SEPARATOR),
        }
    }
}

impl From<&str> for FilterArg {
    fn from(value: &str) -> Self {
        FilterArg::Scalar(value.to_string())
    }
}

impl From<String> for FilterArg {
    fn from(value: String) -> Self {
        FilterArg::Scalar(value)
    }
}

impl From<i64> for FilterArg {
    fn from(value: i64) -> Self {
        FilterArg::scalar(value)
    }
}

impl From<i32> for FilterArg {
    fn from(value: i32) -> Self {
        FilterArg::scalar(value)
    }
}

impl From<u32> for FilterArg {
    fn from(value: u32) -> Self {
        FilterArg::scalar(value)
    }
}

impl From<u64> for FilterArg {
    fn from(value: u64) -> Self {
        FilterArg::scalar(value)
    }
}

impl<T: fmt::Display> From<Vec<T>> for FilterArg {
    fn from(values: Vec<T>) -> Self {
        FilterArg::list(values)
    }
}

impl<T: fmt::Display, const N: usize> From<[T; N]> for FilterArg {
    fn from(values: [T; N]) -> Self {
        FilterArg::list(values)
    }
}

impl<T: Into<FilterArg>> From<Option<T>> for FilterArg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterArg::Flag)
    }
}

// =============================================================================
// Filter Groups
// =============================================================================

/// An insertion-ordered set of filters.
///
/// # Example
///
/// ```
/// use vault8::signing::{FilterArg, FilterGroup, serialize};
///
/// let filters = vec![
///     FilterGroup::single("resize_fill", [150, 140]),
///     FilterGroup::single("grayscale", FilterArg::Flag),
/// ];
/// assert_eq!(serialize(&filters).as_deref(), Some("resize_fill-150-140,grayscale"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterGroup {
    filters: Vec<(String, FilterArg)>,
}

impl FilterGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group holding exactly one filter.
    pub fn single(name: impl Into<String>, arg: impl Into<FilterArg>) -> Self {
        Self::new().with(name, arg)
    }

    /// Append a filter, returning the group.
    pub fn with(mut self, name: impl Into<String>, arg: impl Into<FilterArg>) -> Self {
        self.push(name, arg);
        self
    }

    /// Append a filter after the ones already present.
    pub fn push(&mut self, name: impl Into<String>, arg: impl Into<FilterArg>) {
        self.filters.push((name.into(), arg.into()));
    }

    /// Iterate filters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterArg)> {
        self.filters.iter().map(|(name, arg)| (name.as_str(), arg))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<K: Into<String>, V: Into<FilterArg>> FromIterator<(K, V)> for FilterGroup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut group = FilterGroup::new();
        for (name, arg) in iter {
            group.push(name, arg);
        }
        group
    }
}

// =============================================================================
// Serialization
// =============================================================================

/// Render a single filter.
fn render_filter(name: &str, arg: &FilterArg) -> String {
    let rendered = arg.render();
    if rendered.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", name, ARG_SEPARATOR, rendered)
    }
}

/// Serialize filter groups into the canonical filter segment.
///
/// Returns `None` when there are no filters, in which case callers must omit
/// the segment entirely.
pub fn serialize(groups: &[FilterGroup]) -> Option<String> {
    let rendered: Vec<String> = groups
        .iter()
        .flat_map(|group| group.iter())
        .map(|(name, arg)| render_filter(name, arg))
        .collect();

    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join(FILTER_SEPARATOR))
    }
}

// =============================================================================
// JSON Input
// =============================================================================

/// Parse filters from their JSON form.
///
/// The input is an array of objects; key order inside each object is kept:
///
/// ```text
/// [{"resize_fill": [150, 140], "grayscale": ""}, {"watermark": ["logo20", "center", "l"]}]
/// ```
///
/// `null` and `""` are flags, strings/numbers/booleans are scalars and arrays
/// of those are lists.
pub fn parse_filters_json(input: &str) -> Result<Vec<FilterGroup>, InputError> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| InputError::InvalidFilters(e.to_string()))?;

    let Value::Array(groups) = value else {
        return Err(InputError::InvalidFilters(
            "expected an array of objects".to_string(),
        ));
    };

    groups.iter().map(group_from_json).collect()
}

fn group_from_json(value: &Value) -> Result<FilterGroup, InputError> {
    let Value::Object(map) = value else {
        return Err(InputError::InvalidFilters(format!(
            "expected an object, got {}",
            value
        )));
    };

    let mut group = FilterGroup::new();
    for (name, arg) in map {
        group.push(name.as_str(), arg_from_json(name, arg)?);
    }
    Ok(group)
}

fn arg_from_json(name: &str, value: &Value) -> Result<FilterArg, InputError> {
    match value {
        Value::Null => Ok(FilterArg::Flag),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                scalar_from_json(item).ok_or_else(|| {
                    InputError::InvalidFilters(format!(
                        "filter '{}' has a non-scalar list item: {}",
                        name, item
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FilterArg::List),
        other => scalar_from_json(other).map(FilterArg::Scalar).ok_or_else(|| {
            InputError::InvalidFilters(format!(
                "filter '{}' has an unsupported argument: {}",
                name, other
            ))
        }),
    }
}

fn scalar_from_json(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
