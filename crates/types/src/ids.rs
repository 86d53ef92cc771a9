//! Newtype wrappers for report identifiers.
//!
//! These keep font identifiers and object names from being mixed up with
//! arbitrary strings (expressions, face names, etc.).

use std::fmt;
use std::sync::Arc;

/// The identifier of a font in a report's font registry.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FontId(Arc<str>);

impl FontId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FontId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for FontId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for FontId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A human-readable object name used in diagnostics (e.g. a band name).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ObjectName(Arc<str>);

impl ObjectName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectName {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<String> for ObjectName {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
