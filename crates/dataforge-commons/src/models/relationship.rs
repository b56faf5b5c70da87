//! Introspected foreign-key relationship.

use serde::{Deserialize, Serialize};

/// One imported foreign key on a table, as reported by catalog introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRelationship {
    pub constraint_name: String,
    pub local_table: String,
    pub local_column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}
