//! Typed row decoding for dynamic result sets.
//!
//! Result-set columns are only known at runtime, so each cell is decoded by
//! inspecting its wire type and mapped into a JSON scalar. Types without a
//! JSON-friendly decoding fall back to their text rendering, and to null
//! when even that fails.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use dataforge_commons::RecordFields;
use log::debug;
use serde_json::{Number, Value};
use tokio_postgres::Row;

/// Decode one row into an ordered column→value map (metadata order).
pub fn row_to_fields(row: &Row) -> RecordFields {
    let mut fields = RecordFields::with_capacity(row.columns().len());
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_cell(row, idx, column.type_().name());
        fields.insert(column.name().to_string(), value);
    }
    fields
}

fn decode_cell(row: &Row, idx: usize, type_name: &str) -> Value {
    match type_name {
        "bool" => opt(row.try_get::<_, Option<bool>>(idx).map(|o| o.map(Value::Bool))),
        "int2" => opt(row
            .try_get::<_, Option<i16>>(idx)
            .map(|o| o.map(|v| Value::Number(v.into())))),
        "int4" => opt(row
            .try_get::<_, Option<i32>>(idx)
            .map(|o| o.map(|v| Value::Number(v.into())))),
        "int8" => opt(row
            .try_get::<_, Option<i64>>(idx)
            .map(|o| o.map(|v| Value::Number(v.into())))),
        "float4" => opt(row
            .try_get::<_, Option<f32>>(idx)
            .map(|o| o.map(|v| float_value(v as f64)))),
        "float8" => opt(row
            .try_get::<_, Option<f64>>(idx)
            .map(|o| o.map(float_value))),
        "json" | "jsonb" => opt(row.try_get::<_, Option<Value>>(idx)),
        "timestamp" => opt(row
            .try_get::<_, Option<NaiveDateTime>>(idx)
            .map(|o| o.map(|v| Value::String(v.to_string())))),
        "timestamptz" => opt(row
            .try_get::<_, Option<DateTime<Utc>>>(idx)
            .map(|o| o.map(|v| Value::String(v.to_rfc3339())))),
        "date" => opt(row
            .try_get::<_, Option<NaiveDate>>(idx)
            .map(|o| o.map(|v| Value::String(v.to_string())))),
        "time" => opt(row
            .try_get::<_, Option<NaiveTime>>(idx)
            .map(|o| o.map(|v| Value::String(v.to_string())))),
        _ => match row.try_get::<_, Option<String>>(idx) {
            Ok(o) => o.map(Value::String).unwrap_or(Value::Null),
            Err(e) => {
                debug!("column {} ({}) has no JSON decoding: {}", idx, type_name, e);
                Value::Null
            }
        },
    }
}

fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn opt(result: Result<Option<Value>, tokio_postgres::Error>) -> Value {
    match result {
        Ok(Some(v)) => v,
        Ok(None) => Value::Null,
        Err(e) => {
            debug!("failed to decode cell: {}", e);
            Value::Null
        }
    }
}
