//! DDL statement builders.
//!
//! Pure string construction from validated structural input. All identifier
//! and type-string interpolation goes through the `ident` module.

use crate::ident::{safe_fragment, safe_ident};
use dataforge_commons::{ColumnChange, ColumnSpec, DataForgeError, ForeignKeySpec, Result, TableSpec};

/// `CREATE TABLE name (col clauses, PRIMARY KEY(col), CONSTRAINT ... )`.
///
/// Column clauses appear in declaration order. A single PRIMARY KEY clause is
/// emitted for the first column flagged primary (one primary-key column is
/// supported). Invalid foreign-key specs are skipped.
pub fn build_create_table(spec: &TableSpec) -> Result<String> {
    spec.validate()?;
    let table = safe_ident(&spec.table_name)?;

    let mut definitions: Vec<String> = Vec::with_capacity(spec.columns.len() + 2);
    for column in &spec.columns {
        definitions.push(build_column_clause(column)?);
    }

    if let Some(pk) = spec.columns.iter().find(|c| c.is_primary_key) {
        definitions.push(format!("PRIMARY KEY ({})", safe_ident(&pk.name)?));
    }

    for fk in spec.foreign_keys.iter().filter(|fk| fk.is_valid()) {
        definitions.push(build_foreign_key_clause(fk)?);
    }

    Ok(format!("CREATE TABLE {} ({})", table, definitions.join(", ")))
}

/// `name TYPE [NOT NULL] [UNIQUE]`.
pub fn build_column_clause(column: &ColumnSpec) -> Result<String> {
    let mut clause = format!(
        "{} {}",
        safe_ident(&column.name)?,
        safe_fragment(&column.data_type)?
    );
    if !column.is_nullable {
        clause.push_str(" NOT NULL");
    }
    if column.is_unique {
        clause.push_str(" UNIQUE");
    }
    Ok(clause)
}

/// `CONSTRAINT name FOREIGN KEY (local) REFERENCES table (column)`.
pub fn build_foreign_key_clause(fk: &ForeignKeySpec) -> Result<String> {
    Ok(format!(
        "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        safe_ident(&fk.constraint_name)?,
        safe_ident(&fk.local_column)?,
        safe_ident(&fk.referenced_table)?,
        safe_ident(&fk.referenced_column)?
    ))
}

pub fn build_drop_table(table: &str) -> Result<String> {
    Ok(format!("DROP TABLE IF EXISTS {} CASCADE", safe_ident(table)?))
}

pub fn build_add_column(table: &str, column: &ColumnSpec) -> Result<String> {
    Ok(format!(
        "ALTER TABLE {} ADD COLUMN {}",
        safe_ident(table)?,
        build_column_clause(column)?
    ))
}

/// The ALTER statements for a column modification, in application order:
/// rename first, then retype, then nullability — each later step addressed
/// by the post-rename name.
pub fn build_modify_column(
    table: &str,
    column: &str,
    change: &ColumnChange,
) -> Result<Vec<String>> {
    if change.is_empty() {
        return Err(DataForgeError::invalid_input(
            "column modification requests no changes",
        ));
    }
    let table = safe_ident(table)?;
    let mut current = safe_ident(column)?;
    let mut statements = Vec::new();

    if let Some(new_name) = change.new_name.as_deref().filter(|n| !n.trim().is_empty()) {
        if new_name != current {
            statements.push(format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                table,
                current,
                safe_ident(new_name)?
            ));
            current = new_name;
        }
    }

    if let Some(data_type) = change
        .new_data_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        statements.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
            table,
            current,
            safe_fragment(data_type)?
        ));
    }

    if let Some(nullable) = change.nullable {
        let action = if nullable { "DROP NOT NULL" } else { "SET NOT NULL" };
        statements.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} {}",
            table, current, action
        ));
    }

    Ok(statements)
}

pub fn build_drop_column(table: &str, column: &str) -> Result<String> {
    Ok(format!(
        "ALTER TABLE {} DROP COLUMN {}",
        safe_ident(table)?,
        safe_ident(column)?
    ))
}

pub fn build_drop_constraint(table: &str, constraint: &str) -> Result<String> {
    Ok(format!(
        "ALTER TABLE {} DROP CONSTRAINT {}",
        safe_ident(table)?,
        safe_ident(constraint)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> TableSpec {
        TableSpec::new(
            "orders",
            vec![
                ColumnSpec::new("id", "INTEGER").primary_key(),
                ColumnSpec::new("name", "VARCHAR(50)"),
                ColumnSpec::new("customer_id", "INTEGER").not_null(),
            ],
        )
        .with_foreign_keys(vec![ForeignKeySpec {
            constraint_name: "fk_orders_customer".into(),
            local_column: "customer_id".into(),
            referenced_table: "customers".into(),
            referenced_column: "id".into(),
        }])
    }

    #[test]
    fn test_create_table_full_shape() {
        let sql = build_create_table(&sample_spec()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE orders (id INTEGER NOT NULL, name VARCHAR(50), \
             customer_id INTEGER NOT NULL, PRIMARY KEY (id), \
             CONSTRAINT fk_orders_customer FOREIGN KEY (customer_id) \
             REFERENCES customers (id))"
        );
    }

    #[test]
    fn test_create_table_single_primary_key_clause() {
        let mut spec = sample_spec();
        // Flag a second column primary; only the first may win.
        spec.columns[2].is_primary_key = true;
        let sql = build_create_table(&spec).unwrap();
        assert_eq!(sql.matches("PRIMARY KEY").count(), 1);
        assert!(sql.contains("PRIMARY KEY (id)"));
    }

    #[test]
    fn test_create_table_columns_in_declaration_order() {
        let sql = build_create_table(&sample_spec()).unwrap();
        let id_pos = sql.find("id INTEGER").unwrap();
        let name_pos = sql.find("name VARCHAR").unwrap();
        let customer_pos = sql.find("customer_id INTEGER").unwrap();
        assert!(id_pos < name_pos && name_pos < customer_pos);
    }

    #[test]
    fn test_create_table_skips_invalid_foreign_keys() {
        let mut spec = sample_spec();
        spec.foreign_keys[0].referenced_column = String::new();
        let sql = build_create_table(&spec).unwrap();
        assert!(!sql.contains("FOREIGN KEY"));
    }

    #[test]
    fn test_create_table_rejects_hostile_table_name() {
        let mut spec = sample_spec();
        spec.table_name = "orders; DROP TABLE users".into();
        assert!(build_create_table(&spec).is_err());
    }

    #[test]
    fn test_unique_column_clause() {
        let clause =
            build_column_clause(&ColumnSpec::new("email", "VARCHAR(255)").not_null().unique())
                .unwrap();
        assert_eq!(clause, "email VARCHAR(255) NOT NULL UNIQUE");
    }

    #[test]
    fn test_drop_table_cascades() {
        assert_eq!(
            build_drop_table("orders").unwrap(),
            "DROP TABLE IF EXISTS orders CASCADE"
        );
    }

    #[test]
    fn test_modify_column_order_rename_retype_nullability() {
        let change = ColumnChange {
            new_name: Some("full_name".into()),
            new_data_type: Some("VARCHAR(100)".into()),
            nullable: Some(false),
        };
        let statements = build_modify_column("people", "name", &change).unwrap();
        assert_eq!(
            statements,
            vec![
                "ALTER TABLE people RENAME COLUMN name TO full_name",
                "ALTER TABLE people ALTER COLUMN full_name TYPE VARCHAR(100)",
                "ALTER TABLE people ALTER COLUMN full_name SET NOT NULL",
            ]
        );
    }

    #[test]
    fn test_modify_column_same_name_skips_rename() {
        let change = ColumnChange {
            new_name: Some("name".into()),
            new_data_type: None,
            nullable: Some(true),
        };
        let statements = build_modify_column("people", "name", &change).unwrap();
        assert_eq!(
            statements,
            vec!["ALTER TABLE people ALTER COLUMN name DROP NOT NULL"]
        );
    }

    #[test]
    fn test_modify_column_empty_request_rejected() {
        let err = build_modify_column("people", "name", &ColumnChange::default()).unwrap_err();
        assert!(matches!(err, DataForgeError::InvalidInput(_)));
    }

    #[test]
    fn test_drop_constraint() {
        assert_eq!(
            build_drop_constraint("orders", "fk_orders_customer").unwrap(),
            "ALTER TABLE orders DROP CONSTRAINT fk_orders_customer"
        );
    }
}
