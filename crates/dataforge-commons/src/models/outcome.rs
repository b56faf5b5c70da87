//! Tagged result of an ad-hoc SQL statement.

use super::RecordFields;
use serde::{Deserialize, Serialize};

/// Result of executing one ad-hoc statement.
///
/// Exactly one variant is populated, decided at construction: a result set
/// (`Rows`), an affected-row count (`Affected`), or a captured execution
/// failure (`Error`). Callers never have to null-sniff fields to find out
/// what kind of result they got.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutcome {
    Rows {
        /// Column names in result-set metadata order.
        columns: Vec<String>,
        /// Each row is an ordered column→value map matching `columns`.
        rows: Vec<RecordFields>,
    },
    Affected { rows_affected: u64 },
    Error { message: String },
}

impl QueryOutcome {
    pub fn rows(columns: Vec<String>, rows: Vec<RecordFields>) -> Self {
        QueryOutcome::Rows { columns, rows }
    }

    pub fn affected(rows_affected: u64) -> Self {
        QueryOutcome::Affected { rows_affected }
    }

    pub fn error(message: impl Into<String>) -> Self {
        QueryOutcome::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryOutcome::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_variant_serialization() {
        let mut row = RecordFields::new();
        row.insert("id".to_string(), json!(1));
        row.insert("name".to_string(), json!("Alice"));
        let outcome = QueryOutcome::rows(vec!["id".into(), "name".into()], vec![row]);

        let encoded = serde_json::to_value(&outcome).unwrap();
        assert_eq!(encoded["kind"], "rows");
        assert_eq!(encoded["columns"], json!(["id", "name"]));
        assert_eq!(encoded["rows"][0]["name"], "Alice");
    }

    #[test]
    fn test_affected_variant_serialization() {
        let encoded = serde_json::to_value(QueryOutcome::affected(3)).unwrap();
        assert_eq!(encoded["kind"], "affected");
        assert_eq!(encoded["rows_affected"], 3);
        assert!(encoded.get("columns").is_none());
    }

    #[test]
    fn test_error_variant() {
        let outcome = QueryOutcome::error("syntax error at or near \"SELCT\"");
        assert!(outcome.is_error());
        let encoded = serde_json::to_value(&outcome).unwrap();
        assert_eq!(encoded["kind"], "error");
    }

    #[test]
    fn test_row_order_preserved() {
        let mut row = RecordFields::new();
        row.insert("z".to_string(), json!(1));
        row.insert("a".to_string(), json!(2));
        let outcome = QueryOutcome::rows(vec!["z".into(), "a".into()], vec![row]);

        let text = serde_json::to_string(&outcome).unwrap();
        let z_pos = text.find("\"z\"").unwrap();
        let a_pos = text.rfind("\"a\"").unwrap();
        assert!(z_pos < a_pos, "insertion order must survive serialization");
    }
}
