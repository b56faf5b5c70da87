//! Dynamic parameter values.
//!
//! CRUD payloads arrive as JSON scalars for columns whose types are only
//! known to the engine. `SqlValue` carries the scalar and coerces it to the
//! column's wire type at bind time, so a JSON number can feed an `int2`
//! column and a JSON string can feed an `int8` one, the way a dynamic
//! client expects.

use bytes::BytesMut;
use postgres_types::{to_sql_checked, IsNull, ToSql, Type};
use serde_json::Value;
use std::error::Error;

/// A scalar bound positionally into a dynamic statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    /// Convert a JSON scalar. Arrays and objects are bound as their JSON
    /// text — the engine will accept them for json/jsonb columns and reject
    /// them elsewhere.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::Int(i)
                } else {
                    SqlValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => SqlValue::Text(s.clone()),
            other => SqlValue::Text(other.to_string()),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        SqlValue::Text(s.into())
    }
}

type BoxError = Box<dyn Error + Sync + Send>;

fn is_character(ty: &Type) -> bool {
    matches!(ty.name(), "text" | "varchar" | "bpchar" | "name")
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(b) => {
                if is_character(ty) {
                    b.to_string().to_sql(ty, out)
                } else {
                    b.to_sql(ty, out)
                }
            }
            SqlValue::Int(i) => match ty.name() {
                "int2" => i16::try_from(*i).map_err(BoxError::from)?.to_sql(ty, out),
                "int4" => i32::try_from(*i).map_err(BoxError::from)?.to_sql(ty, out),
                "float4" => (*i as f32).to_sql(ty, out),
                "float8" => (*i as f64).to_sql(ty, out),
                "text" | "varchar" | "bpchar" => i.to_string().to_sql(ty, out),
                _ => i.to_sql(ty, out),
            },
            SqlValue::Float(f) => match ty.name() {
                "float4" => (*f as f32).to_sql(ty, out),
                "text" | "varchar" | "bpchar" => f.to_string().to_sql(ty, out),
                _ => f.to_sql(ty, out),
            },
            SqlValue::Text(s) => match ty.name() {
                "int2" => s.trim().parse::<i16>().map_err(BoxError::from)?.to_sql(ty, out),
                "int4" => s.trim().parse::<i32>().map_err(BoxError::from)?.to_sql(ty, out),
                "int8" => s.trim().parse::<i64>().map_err(BoxError::from)?.to_sql(ty, out),
                "float4" => s.trim().parse::<f32>().map_err(BoxError::from)?.to_sql(ty, out),
                "float8" => s.trim().parse::<f64>().map_err(BoxError::from)?.to_sql(ty, out),
                "bool" => s.trim().parse::<bool>().map_err(BoxError::from)?.to_sql(ty, out),
                _ => s.to_sql(ty, out),
            },
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // Coercion is decided per-value in to_sql; mismatches surface as
        // bind errors, which the services report as invalid input.
        true
    }

    to_sql_checked!();
}
