//! Source resolution
//!
//! Classifies a render request's raw source into inline markup or a
//! fetchable location.

use std::collections::HashMap;

use svgkit_common::is_svg_markup;

/// The record form of a source, referencing a remote document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRef {
    /// Address to fetch markup from.
    pub location: String,
}

impl LocationRef {
    /// Create a location record.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

/// Raw source accepted by a view: a string or a location record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Inline markup or an address, told apart by the `<svg` prefix.
    Text(String),
    /// Always an address.
    Location(LocationRef),
}

impl From<&str> for SourceSpec {
    fn from(text: &str) -> Self {
        SourceSpec::Text(text.to_string())
    }
}

impl From<String> for SourceSpec {
    fn from(text: String) -> Self {
        SourceSpec::Text(text)
    }
}

impl From<LocationRef> for SourceSpec {
    fn from(location: LocationRef) -> Self {
        SourceSpec::Location(location)
    }
}

/// A resolved source, immutable once constructed from a render request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgSource {
    /// Markup supplied directly; never fetched and never cached.
    Inline(String),

    /// Address to fetch markup from, with request headers.
    Remote {
        location: String,
        headers: HashMap<String, String>,
    },
}

impl SvgSource {
    /// Classify a raw source.
    ///
    /// A string whose trimmed content starts with `<svg` is inline markup;
    /// everything else, including any location record, resolves as remote.
    /// The check is prefix-only: malformed `<svg`-prefixed text still
    /// counts as inline, and a string that is not a valid address still
    /// resolves as remote — it fails later, when the fetch is issued.
    pub fn resolve(spec: &SourceSpec, headers: &HashMap<String, String>) -> Self {
        match spec {
            SourceSpec::Text(text) if is_svg_markup(text) => SvgSource::Inline(text.clone()),
            SourceSpec::Text(text) => SvgSource::Remote {
                location: text.clone(),
                headers: headers.clone(),
            },
            SourceSpec::Location(record) => SvgSource::Remote {
                location: record.location.clone(),
                headers: headers.clone(),
            },
        }
    }

    /// Check whether this source is inline markup.
    pub fn is_inline(&self) -> bool {
        matches!(self, SvgSource::Inline(_))
    }

    /// The fetchable address, if this source has one.
    pub fn location(&self) -> Option<&str> {
        match self {
            SvgSource::Inline(_) => None,
            SvgSource::Remote { location, .. } => Some(location),
        }
    }
}
