//! Descriptor, category, and navigation identity types.
//!
//! Every error the engine records carries enough of these identities to
//! locate the offending declaration without re-running the build.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of one raw descriptor in the input pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawKey(pub String);

impl RawKey {
    pub fn new(key: impl Into<String>) -> Self {
        RawKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RawKey {
    fn from(s: &str) -> Self {
        RawKey(s.to_string())
    }
}

impl From<String> for RawKey {
    fn from(s: String) -> Self {
        RawKey(s)
    }
}

/// Name of a registered category definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(pub String);

impl CategoryName {
    pub fn new(name: impl Into<String>) -> Self {
        CategoryName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryName {
    fn from(s: &str) -> Self {
        CategoryName(s.to_string())
    }
}

impl From<String> for CategoryName {
    fn from(s: String) -> Self {
        CategoryName(s)
    }
}

/// Address of one navigation slot: owning entry plus property name.
///
/// Displayed as `entry.property`, e.g. `order-model.partner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavPath {
    pub entry: RawKey,
    pub property: String,
}

impl NavPath {
    pub fn new(entry: impl Into<RawKey>, property: impl Into<String>) -> Self {
        NavPath {
            entry: entry.into(),
            property: property.into(),
        }
    }
}

impl fmt::Display for NavPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entry, self.property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_key_display_and_from() {
        let key: RawKey = "orders::Model".into();
        assert_eq!(key.to_string(), "orders::Model");
        assert_eq!(key, RawKey::new("orders::Model".to_string()));
    }

    #[test]
    fn nav_path_display() {
        let path = NavPath::new("orders::Model", "partner");
        assert_eq!(path.to_string(), "orders::Model.partner");
    }
}
