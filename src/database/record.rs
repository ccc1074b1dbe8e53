//! Row shaping at the data-access edge.
//!
//! The store speaks snake_case columns; everything above the executor works
//! with camelCase records. Conversion happens here and nowhere else.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use uuid::Uuid;

use crate::database::executor::DatabaseError;

/// A single row in canonical camelCase form
pub type Record = Map<String, Value>;

pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            // leading underscores are kept as-is
            if out.is_empty() {
                out.push(c);
            } else {
                upper_next = true;
            }
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn camelize_keys(row: Map<String, Value>) -> Record {
    row.into_iter().map(|(k, v)| (snake_to_camel(&k), v)).collect()
}

/// Convert a Postgres row into a camelCase record by column type.
///
/// NUMERIC columns are expected to be cast to float8 by the stored query.
pub fn pg_row_to_record(row: &PgRow) -> Result<Record, DatabaseError> {
    let mut map = Map::new();

    for (i, column) in row.columns().iter().enumerate() {
        let type_name = column.type_info().name();
        let value = match type_name {
            "UUID" => row.try_get::<Option<Uuid>, _>(i)?.map(|u| Value::String(u.to_string())),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => row.try_get::<Option<String>, _>(i)?.map(Value::String),
            "INT2" => row.try_get::<Option<i16>, _>(i)?.map(Value::from),
            "INT4" => row.try_get::<Option<i32>, _>(i)?.map(Value::from),
            "INT8" => row.try_get::<Option<i64>, _>(i)?.map(Value::from),
            "FLOAT4" => row.try_get::<Option<f32>, _>(i)?.map(|f| float(f as f64)),
            "FLOAT8" => row.try_get::<Option<f64>, _>(i)?.map(float),
            "BOOL" => row.try_get::<Option<bool>, _>(i)?.map(Value::Bool),
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(i)?
                .map(|t| Value::String(t.to_rfc3339())),
            "TIMESTAMP" => row
                .try_get::<Option<NaiveDateTime>, _>(i)?
                .map(|t| Value::String(t.and_utc().to_rfc3339())),
            "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(i)?,
            other => match row.try_get::<Option<String>, _>(i) {
                Ok(v) => v.map(Value::String),
                Err(_) => {
                    return Err(DatabaseError::RowShape(format!(
                        "column '{}' has unsupported type {}",
                        column.name(),
                        other
                    )))
                }
            },
        };

        map.insert(snake_to_camel(column.name()), value.unwrap_or(Value::Null));
    }

    Ok(map)
}

fn float(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}
