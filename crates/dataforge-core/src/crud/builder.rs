//! Statement builders for the dynamic CRUD layer.
//!
//! Values are always bound positionally (`$1..$n`); table and column names
//! are interpolated as identifiers through the `ident` module, because the
//! wire protocol cannot parameterize identifiers. LIMIT/OFFSET are computed
//! integers, ORDER BY direction is normalized to a keyword — none of those
//! take request text verbatim.

use crate::ident::safe_ident;
use dataforge_commons::{DataForgeError, RecordFields, Result};
use serde_json::Value;

/// Pagination and ordering for a dynamic read. Pages are 1-indexed.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub page: i64,
    pub limit: i64,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 50,
            order_by: None,
            order_direction: None,
        }
    }
}

impl ReadOptions {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(DataForgeError::invalid_input("page is 1-indexed"));
        }
        if self.limit < 1 {
            return Err(DataForgeError::invalid_input("limit must be positive"));
        }
        Ok(())
    }
}

/// `INSERT INTO table (c1, c2, ...) VALUES ($1, $2, ...)`.
/// An empty field map is rejected before any SQL is built.
pub(crate) fn build_insert(table: &str, fields: &RecordFields) -> Result<String> {
    if fields.is_empty() {
        return Err(DataForgeError::invalid_input(
            "record must contain at least one field",
        ));
    }
    let table = safe_ident(table)?;
    let mut columns = Vec::with_capacity(fields.len());
    let mut placeholders = Vec::with_capacity(fields.len());
    for (idx, name) in fields.keys().enumerate() {
        columns.push(safe_ident(name)?.to_string());
        placeholders.push(format!("${}", idx + 1));
    }
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    ))
}

/// `SELECT * FROM table [WHERE ...] [ORDER BY ...] LIMIT n OFFSET m`.
/// Filter values bind as `$1..$n` in the map's iteration order; an
/// unrecognized order direction falls back to ASC.
pub(crate) fn build_select(
    table: &str,
    filters: &RecordFields,
    options: &ReadOptions,
) -> Result<String> {
    options.validate()?;
    let mut sql = format!("SELECT * FROM {}", safe_ident(table)?);

    if !filters.is_empty() {
        let clauses: Vec<String> = filters
            .keys()
            .enumerate()
            .map(|(idx, name)| Ok(format!("{} = ${}", safe_ident(name)?, idx + 1)))
            .collect::<Result<_>>()?;
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    if let Some(order_by) = options.order_by.as_deref().filter(|c| !c.trim().is_empty()) {
        let direction = match options.order_direction.as_deref() {
            Some(d) if d.eq_ignore_ascii_case("desc") => "DESC",
            _ => "ASC",
        };
        sql.push_str(&format!(" ORDER BY {} {}", safe_ident(order_by)?, direction));
    }

    sql.push_str(&format!(" LIMIT {} OFFSET {}", options.limit, options.offset()));
    Ok(sql)
}

/// `UPDATE table SET c1 = $1, ... WHERE id = $n` — the id binds last.
pub(crate) fn build_update(table: &str, patch: &RecordFields) -> Result<String> {
    if patch.is_empty() {
        return Err(DataForgeError::invalid_input(
            "update must contain at least one field",
        ));
    }
    let table = safe_ident(table)?;
    let assignments: Vec<String> = patch
        .keys()
        .enumerate()
        .map(|(idx, name)| Ok(format!("{} = ${}", safe_ident(name)?, idx + 1)))
        .collect::<Result<_>>()?;
    Ok(format!(
        "UPDATE {} SET {} WHERE id = ${}",
        table,
        assignments.join(", "),
        patch.len() + 1
    ))
}

pub(crate) fn build_delete(table: &str) -> Result<String> {
    Ok(format!("DELETE FROM {} WHERE id = $1", safe_ident(table)?))
}

/// Interpret a record id: textual integers become integers (surrogate
/// numeric keys), anything else passes through unchanged (natural string or
/// UUID keys). Numeric input is already in its final form.
pub fn parse_id(raw: &Value) -> Value {
    match raw {
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(n) => Value::Number(n.into()),
            Err(_) => raw.clone(),
        },
        _ => raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> RecordFields {
        let mut map = RecordFields::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        map
    }

    #[test]
    fn test_insert_statement_shape() {
        let sql = build_insert(
            "orders",
            &fields(&[("customer_id", json!(1)), ("total", json!(9.99))]),
        )
        .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO orders (customer_id, total) VALUES ($1, $2)"
        );
    }

    #[test]
    fn test_insert_rejects_empty_fields() {
        let err = build_insert("orders", &RecordFields::new()).unwrap_err();
        assert!(matches!(err, DataForgeError::InvalidInput(_)));
    }

    #[test]
    fn test_select_without_filters() {
        let sql = build_select("orders", &RecordFields::new(), &ReadOptions::default()).unwrap();
        assert_eq!(sql, "SELECT * FROM orders LIMIT 50 OFFSET 0");
    }

    #[test]
    fn test_select_with_filters_and_order() {
        let options = ReadOptions {
            page: 1,
            limit: 10,
            order_by: Some("created_at".into()),
            order_direction: Some("desc".into()),
        };
        let sql = build_select(
            "orders",
            &fields(&[("status", json!("open")), ("customer_id", json!(7))]),
            &options,
        )
        .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM orders WHERE status = $1 AND customer_id = $2 \
             ORDER BY created_at DESC LIMIT 10 OFFSET 0"
        );
    }

    #[test]
    fn test_select_pagination_offsets() {
        let page2 = ReadOptions {
            page: 2,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(page2.offset(), 10);
        let sql = build_select("orders", &RecordFields::new(), &page2).unwrap();
        assert!(sql.ends_with("LIMIT 10 OFFSET 10"));

        let page1 = ReadOptions {
            page: 1,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(page1.offset(), 0);
    }

    #[test]
    fn test_select_rejects_zero_page() {
        let options = ReadOptions {
            page: 0,
            ..Default::default()
        };
        assert!(build_select("orders", &RecordFields::new(), &options).is_err());
    }

    #[test]
    fn test_select_unrecognized_direction_defaults_asc() {
        let options = ReadOptions {
            order_by: Some("name".into()),
            order_direction: Some("sideways".into()),
            ..Default::default()
        };
        let sql = build_select("orders", &RecordFields::new(), &options).unwrap();
        assert!(sql.contains("ORDER BY name ASC"));
    }

    #[test]
    fn test_select_rejects_hostile_order_column() {
        let options = ReadOptions {
            order_by: Some("name; DROP TABLE orders".into()),
            ..Default::default()
        };
        assert!(build_select("orders", &RecordFields::new(), &options).is_err());
    }

    #[test]
    fn test_update_statement_binds_id_last() {
        let sql = build_update(
            "orders",
            &fields(&[("status", json!("closed")), ("total", json!(12))]),
        )
        .unwrap();
        assert_eq!(sql, "UPDATE orders SET status = $1, total = $2 WHERE id = $3");
    }

    #[test]
    fn test_delete_statement() {
        assert_eq!(
            build_delete("orders").unwrap(),
            "DELETE FROM orders WHERE id = $1"
        );
    }

    #[test]
    fn test_parse_id_numeric_text() {
        assert_eq!(parse_id(&json!("42")), json!(42));
    }

    #[test]
    fn test_parse_id_natural_key_passthrough() {
        assert_eq!(parse_id(&json!("abc-uuid")), json!("abc-uuid"));
    }

    #[test]
    fn test_parse_id_number_passthrough() {
        assert_eq!(parse_id(&json!(42)), json!(42));
    }
}
