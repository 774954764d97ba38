//! Run one statement and materialize every row.
//!
//! The lifecycle is connect, prepare, fetch all, close. Preparing first
//! means column metadata is available even when the result is empty. The
//! statement runs with whatever privileges the configured credentials
//! hold; the read-only check upstream is the only restriction.

use std::time::Duration;

use askdb_configuration::ConnectionUri;
use indexmap::IndexMap;
use serde_json::Value;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Column, Connection, Executor, Row, Statement, TypeInfo};
use tracing::{info_span, Instrument};

use crate::error::ExecutionError;
use crate::rows::{Record, ResultSet};

/// Execute a single statement on a dedicated connection and fetch the
/// entire result. Exactly one attempt is made; any failure propagates.
pub async fn execute_statement(
    connection_uri: &ConnectionUri,
    sql: &str,
    timeout: Duration,
) -> Result<ResultSet, ExecutionError> {
    tracing::debug!(
        sql = %sqlformat::format(
            sql,
            &sqlformat::QueryParams::None,
            sqlformat::FormatOptions::default(),
        ),
        "executing statement"
    );

    tokio::time::timeout(timeout, fetch_all(connection_uri, sql))
        .instrument(info_span!("execute_statement"))
        .await
        .map_err(|_| ExecutionError::Timeout(timeout))?
}

async fn fetch_all(
    connection_uri: &ConnectionUri,
    sql: &str,
) -> Result<ResultSet, ExecutionError> {
    let mut connection = PgConnection::connect(connection_uri.as_str())
        .await
        .map_err(ExecutionError::Connect)?;

    let statement = connection
        .prepare(sql)
        .await
        .map_err(ExecutionError::Database)?;

    let columns: Vec<String> = statement
        .columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect();

    let rows: Vec<PgRow> = statement
        .query()
        .fetch_all(&mut connection)
        .await
        .map_err(ExecutionError::Database)?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut record: Record = IndexMap::with_capacity(row.columns().len());
        for column in row.columns() {
            let value = decode_cell(row, column.ordinal(), column.type_info().name())?;
            record.insert(column.name().to_string(), value);
        }
        records.push(record);
    }

    connection.close().await.map_err(ExecutionError::Connect)?;

    tracing::debug!(row_count = records.len(), "statement executed");

    Ok(ResultSet::new(columns, records))
}

/// Decode one cell into a JSON scalar by Postgres type name. Types outside
/// the ladder are echoed as text where the driver allows it.
fn decode_cell(row: &PgRow, ordinal: usize, type_name: &str) -> Result<Value, ExecutionError> {
    let value = match type_name {
        "BOOL" => row
            .try_get::<Option<bool>, _>(ordinal)
            .map(|cell| cell.map_or(Value::Null, Value::Bool)),
        "INT2" => row
            .try_get::<Option<i16>, _>(ordinal)
            .map(|cell| cell.map_or(Value::Null, |v| Value::from(i64::from(v)))),
        "INT4" => row
            .try_get::<Option<i32>, _>(ordinal)
            .map(|cell| cell.map_or(Value::Null, |v| Value::from(i64::from(v)))),
        "INT8" => row
            .try_get::<Option<i64>, _>(ordinal)
            .map(|cell| cell.map_or(Value::Null, Value::from)),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(ordinal)
            .map(|cell| cell.map_or(Value::Null, |v| float_value(f64::from(v)))),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(ordinal)
            .map(|cell| cell.map_or(Value::Null, float_value)),
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => row
            .try_get::<Option<String>, _>(ordinal)
            .map(|cell| cell.map_or(Value::Null, Value::String)),
        "UUID" => row
            .try_get::<Option<sqlx::types::Uuid>, _>(ordinal)
            .map(|cell| cell.map_or(Value::Null, |v| Value::String(v.to_string()))),
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(ordinal)
            .map(|cell| cell.unwrap_or(Value::Null)),
        _ => {
            // Database-specific types are echoed as-is when the driver can
            // hand them over as text.
            return row
                .try_get::<Option<String>, _>(ordinal)
                .map(|cell| cell.map_or(Value::Null, Value::String))
                .map_err(|_| ExecutionError::UnsupportedColumnType {
                    column: row.columns()[ordinal].name().to_string(),
                    type_name: type_name.to_string(),
                });
        }
    };

    value.map_err(ExecutionError::Database)
}

// JSON has no NaN or infinity; those decode to null.
fn float_value(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(float_value(f64::NAN), Value::Null);
        assert_eq!(float_value(f64::INFINITY), Value::Null);
        assert_eq!(float_value(1.5), serde_json::json!(1.5));
    }
}
