//! Flat key and alias path conventions
//!
//! # Path Syntax
//!
//! - Flat keys join namespace segments with `/`: `color/brand/primary`
//! - Alias values wrap a dot path in braces: `{color.brand.primary}`
//! - A cross-group alias prefixes the group name: `{Primitives.color.red}`
//! - Keys starting with `$` are metadata and never hold tokens
//!
//! # Examples
//!
//! ```
//! use tokensync_model::path::{AliasTarget, join_flat_key};
//!
//! assert_eq!(join_flat_key("color", "red"), "color/red");
//! assert_eq!(join_flat_key("", "red"), "red");
//!
//! let target = AliasTarget::parse(" {Primitives.color.red} ").unwrap();
//! assert_eq!(target.as_str(), "Primitives.color.red");
//! assert_eq!(target.to_flat_key(), "Primitives/color/red");
//! assert_eq!(
//!     target.split_group(),
//!     Some(("Primitives", "color/red".to_string()))
//! );
//! ```

use std::fmt;

/// Prefix marking a metadata key such as `$type` or `$description`
pub const METADATA_MARKER: char = '$';

/// Separator between namespace segments of a flat key
pub const PATH_SEPARATOR: char = '/';

/// Separator between segments of an alias target path
pub const ALIAS_SEPARATOR: char = '.';

/// Opening delimiter of an alias reference
pub const ALIAS_OPEN: char = '{';

/// Closing delimiter of an alias reference
pub const ALIAS_CLOSE: char = '}';

/// Check whether a document key is metadata rather than data
pub fn is_metadata_key(key: &str) -> bool {
    key.starts_with(METADATA_MARKER)
}

/// Join a namespace prefix and a child key into a flat key
pub fn join_flat_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, key)
    }
}

/// Convert a flat key into the dot path used inside alias references
pub fn flat_key_to_alias_path(flat_key: &str) -> String {
    flat_key.replace(PATH_SEPARATOR, &ALIAS_SEPARATOR.to_string())
}

/// The dot-separated path an alias value points at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasTarget {
    path: String,
}

impl AliasTarget {
    /// Parse an alias value.
    ///
    /// Returns `None` unless the trimmed value begins with `{`. Every brace
    /// is stripped from the remainder.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if !trimmed.starts_with(ALIAS_OPEN) {
            return None;
        }

        let path: String = trimmed
            .chars()
            .filter(|c| *c != ALIAS_OPEN && *c != ALIAS_CLOSE)
            .collect();

        Some(Self {
            path: path.trim().to_string(),
        })
    }

    /// Build a target from a dot path without braces
    pub fn from_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The dot path without braces
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Path segments between dots
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split(ALIAS_SEPARATOR).filter(|s| !s.is_empty())
    }

    /// The whole path as a flat key in the referencing group
    pub fn to_flat_key(&self) -> String {
        self.segments()
            .collect::<Vec<_>>()
            .join(&PATH_SEPARATOR.to_string())
    }

    /// Interpret the first segment as a group name.
    ///
    /// Returns the group name and the flat key of the remaining segments, or
    /// `None` if there is nothing after the first segment.
    pub fn split_group(&self) -> Option<(&str, String)> {
        let mut segments = self.segments();
        let group = segments.next()?;
        let rest: Vec<&str> = segments.collect();
        if rest.is_empty() {
            return None;
        }
        Some((group, rest.join(&PATH_SEPARATOR.to_string())))
    }

    /// Render as an alias reference string, braces included
    pub fn to_reference(&self) -> String {
        format!("{}{}{}", ALIAS_OPEN, self.path, ALIAS_CLOSE)
    }
}

impl fmt::Display for AliasTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A flat key qualified by the group it lives in.
///
/// Flat keys may contain `/`, so a group and key are kept as separate
/// fields rather than joined into one string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedKey {
    pub group: String,
    pub key: String,
}

impl QualifiedKey {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for QualifiedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: {}", self.group, self.key)
    }
}
