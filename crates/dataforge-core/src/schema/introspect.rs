//! Catalog introspection queries and row mapping.
//!
//! All schema reads go through information_schema so they work against any
//! engine version the sandboxes run. Table-name parameters are bound, never
//! interpolated — only identifiers we generate DDL from need interpolation.

use dataforge_commons::{ColumnSpec, RecordFields, TableRelationship, TableSpec};
use serde_json::Value;
use std::collections::HashSet;

pub(crate) const LIST_TABLES_SQL: &str = "SELECT table_name \
     FROM information_schema.tables \
     WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
     ORDER BY table_name";

pub(crate) const PRIMARY_KEYS_SQL: &str = "SELECT kcu.column_name \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON kcu.constraint_name = tc.constraint_name \
      AND kcu.table_schema = tc.table_schema \
     WHERE tc.constraint_type = 'PRIMARY KEY' \
       AND tc.table_schema = 'public' \
       AND tc.table_name = $1";

pub(crate) const COLUMNS_SQL: &str = "SELECT column_name, data_type, character_maximum_length, is_nullable \
     FROM information_schema.columns \
     WHERE table_schema = 'public' AND table_name = $1 \
     ORDER BY ordinal_position";

pub(crate) const RELATIONSHIPS_SQL: &str = "SELECT tc.constraint_name, tc.table_name, kcu.column_name, \
            ccu.table_name AS referenced_table, ccu.column_name AS referenced_column \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON kcu.constraint_name = tc.constraint_name \
      AND kcu.table_schema = tc.table_schema \
     JOIN information_schema.constraint_column_usage ccu \
       ON ccu.constraint_name = tc.constraint_name \
      AND ccu.table_schema = tc.table_schema \
     WHERE tc.constraint_type = 'FOREIGN KEY' \
       AND tc.table_schema = 'public' \
       AND tc.table_name = $1 \
     ORDER BY tc.constraint_name";

pub(crate) fn get_string(row: &RecordFields, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(other) if !other.is_null() => other.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn get_i64(row: &RecordFields, column: &str) -> Option<i64> {
    row.get(column).and_then(Value::as_i64)
}

/// Reconstruct size-qualified syntax for character types; other types keep
/// the catalog's name verbatim.
pub(crate) fn qualify_character_type(data_type: &str, max_len: Option<i64>) -> String {
    let short = match data_type.to_ascii_lowercase().as_str() {
        "character varying" | "varchar" => "varchar",
        "character" | "char" | "bpchar" => "char",
        _ => return data_type.to_string(),
    };
    match max_len {
        Some(len) => format!("{}({})", short, len),
        None => short.to_string(),
    }
}

/// Assemble a [`TableSpec`] from the column and primary-key result sets.
pub(crate) fn table_spec_from_catalog(
    table: &str,
    pk_columns: &HashSet<String>,
    column_rows: &[RecordFields],
) -> TableSpec {
    let columns = column_rows
        .iter()
        .map(|row| {
            let name = get_string(row, "column_name");
            let data_type = qualify_character_type(
                &get_string(row, "data_type"),
                get_i64(row, "character_maximum_length"),
            );
            let is_nullable = get_string(row, "is_nullable").eq_ignore_ascii_case("YES");
            let is_primary_key = pk_columns.contains(&name);
            ColumnSpec {
                name,
                data_type,
                is_primary_key,
                is_nullable,
                is_unique: false,
            }
        })
        .collect();
    TableSpec::new(table, columns)
}

pub(crate) fn relationship_from_row(row: &RecordFields) -> Option<TableRelationship> {
    let relationship = TableRelationship {
        constraint_name: get_string(row, "constraint_name"),
        local_table: get_string(row, "table_name"),
        local_column: get_string(row, "column_name"),
        referenced_table: get_string(row, "referenced_table"),
        referenced_column: get_string(row, "referenced_column"),
    };
    if relationship.constraint_name.is_empty() {
        None
    } else {
        Some(relationship)
    }
}
