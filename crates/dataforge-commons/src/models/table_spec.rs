//! Table description: the input language of the schema manager.

use super::{ColumnSpec, ForeignKeySpec};
use crate::errors::{DataForgeError, Result};
use serde::{Deserialize, Serialize};

/// Structural description of one table: an ordered, non-empty column list
/// plus optional foreign-key constraints.
///
/// Also the shape returned by schema introspection, so the cache stores this
/// type directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub table_name: String,
    pub columns: Vec<ColumnSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKeySpec>,
}

impl TableSpec {
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            foreign_keys: Vec::new(),
        }
    }

    pub fn with_foreign_keys(mut self, foreign_keys: Vec<ForeignKeySpec>) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }

    /// Structural validation performed before any SQL is built.
    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(DataForgeError::invalid_input("table name must not be empty"));
        }
        if self.columns.is_empty() {
            return Err(DataForgeError::invalid_input(
                "table must have at least one column",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_columns() {
        let spec = TableSpec::new("orders", vec![]);
        assert!(matches!(
            spec.validate(),
            Err(DataForgeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let spec = TableSpec::new("  ", vec![ColumnSpec::new("id", "INTEGER")]);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_minimal_table() {
        let spec = TableSpec::new("orders", vec![ColumnSpec::new("id", "INTEGER")]);
        assert!(spec.validate().is_ok());
    }
}
