//! Type-safe wrapper for table names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for table names.
///
/// Names are normalized to lowercase: the engine folds unquoted identifiers
/// to lowercase, so `Users` and `users` address the same table. Normalizing
/// here keeps cache keys coherent with what introspection reports back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().to_lowercase())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TableName {
    fn from(s: String) -> Self {
        Self(s.to_lowercase())
    }
}

impl From<&str> for TableName {
    fn from(s: &str) -> Self {
        Self(s.to_lowercase())
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
