//! Column description used for DDL generation and introspection results.

use serde::{Deserialize, Serialize};

/// One column of a table, described structurally.
///
/// `data_type` carries engine-native type syntax verbatim (e.g.
/// `VARCHAR(255)`, `INTEGER`, `BOOLEAN`); the schema manager never parses it
/// beyond the safety checks in the identifier module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_unique: bool,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            is_nullable: true,
            is_unique: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_flags() {
        let col = ColumnSpec::new("id", "INTEGER").primary_key();
        assert!(col.is_primary_key);
        assert!(!col.is_nullable);

        let col = ColumnSpec::new("email", "VARCHAR(255)").not_null().unique();
        assert!(col.is_unique);
        assert!(!col.is_nullable);
        assert!(!col.is_primary_key);
    }

    #[test]
    fn test_deserialize_defaults() {
        let col: ColumnSpec =
            serde_json::from_str(r#"{"name":"age","data_type":"INTEGER"}"#).unwrap();
        assert!(!col.is_primary_key);
        assert!(!col.is_nullable);
        assert!(!col.is_unique);
    }
}
