//! Foreign-key constraint description.

use serde::{Deserialize, Serialize};

/// A named foreign-key constraint from a local column to a referenced
/// table/column pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeySpec {
    pub constraint_name: String,
    pub local_column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

impl ForeignKeySpec {
    /// A spec is usable only when all four fields are non-blank; invalid
    /// specs are skipped during DDL generation rather than rejected.
    pub fn is_valid(&self) -> bool {
        !self.constraint_name.trim().is_empty()
            && !self.local_column.trim().is_empty()
            && !self.referenced_table.trim().is_empty()
            && !self.referenced_column.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fk() -> ForeignKeySpec {
        ForeignKeySpec {
            constraint_name: "fk_orders_customer".into(),
            local_column: "customer_id".into(),
            referenced_table: "customers".into(),
            referenced_column: "id".into(),
        }
    }

    #[test]
    fn test_valid_spec() {
        assert!(fk().is_valid());
    }

    #[test]
    fn test_blank_field_invalidates() {
        let mut spec = fk();
        spec.referenced_column = "  ".into();
        assert!(!spec.is_valid());

        let mut spec = fk();
        spec.constraint_name = String::new();
        assert!(!spec.is_valid());
    }
}
