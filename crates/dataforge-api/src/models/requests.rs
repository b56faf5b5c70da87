//! Request payloads.

use dataforge_commons::{DataForgeError, RecordFields, Result};
use dataforge_core::crud::ReadOptions;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDatabaseRequest {
    pub db_name: String,
    pub user: String,
    pub password: String,
}

impl CreateDatabaseRequest {
    pub fn validate(&self) -> Result<()> {
        if self.db_name.trim().is_empty() {
            return Err(DataForgeError::invalid_input("database name cannot be empty"));
        }
        if self.user.trim().is_empty() {
            return Err(DataForgeError::invalid_input("user cannot be empty"));
        }
        if self.password.trim().is_empty() {
            return Err(DataForgeError::invalid_input("password cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqlQueryRequest {
    pub sql: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDbUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PermissionsRequest {
    pub table_name: String,
    pub privileges: Vec<String>,
}

/// Query-string parsing for dynamic reads.
///
/// `page`, `limit`, `order_by`, and `order_direction` are reserved keys;
/// every other parameter is a column filter, kept in query-string order.
#[derive(Debug)]
pub struct RecordQuery {
    pub options: ReadOptions,
    pub filters: RecordFields,
}

impl RecordQuery {
    pub fn from_params(mut params: IndexMap<String, String>) -> Result<Self> {
        let mut options = ReadOptions::default();

        if let Some(raw) = params.shift_remove("page") {
            options.page = raw
                .parse()
                .map_err(|_| DataForgeError::invalid_input(format!("invalid page: '{}'", raw)))?;
        }
        if let Some(raw) = params.shift_remove("limit") {
            options.limit = raw
                .parse()
                .map_err(|_| DataForgeError::invalid_input(format!("invalid limit: '{}'", raw)))?;
        }
        options.order_by = params.shift_remove("order_by");
        options.order_direction = params.shift_remove("order_direction");

        let mut filters = RecordFields::new();
        for (column, value) in params {
            filters.insert(column, Value::String(value));
        }

        Ok(Self { options, filters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_record_query_extracts_reserved_keys() {
        let query = RecordQuery::from_params(params(&[
            ("page", "2"),
            ("limit", "25"),
            ("order_by", "created_at"),
            ("order_direction", "desc"),
            ("status", "open"),
        ]))
        .unwrap();

        assert_eq!(query.options.page, 2);
        assert_eq!(query.options.limit, 25);
        assert_eq!(query.options.order_by.as_deref(), Some("created_at"));
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters["status"], "open");
    }

    #[test]
    fn test_record_query_rejects_bad_page() {
        let err = RecordQuery::from_params(params(&[("page", "two")])).unwrap_err();
        assert!(matches!(err, DataForgeError::InvalidInput(_)));
    }

    #[test]
    fn test_record_query_preserves_filter_order() {
        let query = RecordQuery::from_params(params(&[("b", "1"), ("a", "2")])).unwrap();
        let keys: Vec<&String> = query.filters.keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_create_database_request_validation() {
        let request = CreateDatabaseRequest {
            db_name: "shop".into(),
            user: "admin".into(),
            password: " ".into(),
        };
        assert!(request.validate().is_err());
    }
}
