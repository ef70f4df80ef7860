//! In-memory DuckDB over fetched table rows
//!
//! Rows from one or more Vanta tables are loaded into typed DuckDB tables
//! so arbitrary SQL (joins, aggregates) can run over them.

use crate::error::{Error, Result};
use crate::table::{parse_timestamp, ColumnType, Row, TableDefinition};
use crate::types::{JsonObject, JsonValue};
use duckdb::types::{TimeUnit, Value};
use duckdb::{params_from_iter, Connection};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::debug;

static TABLE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bvanta_[a-z_]+\b").unwrap_or_else(|e| unreachable!("invalid regex: {e}"))
});

/// Table names of the form `vanta_*` mentioned in a query, sorted
pub fn referenced_tables(sql: &str) -> Vec<String> {
    let lowered = sql.to_ascii_lowercase();
    TABLE_REFERENCE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// DuckDB column type for a table column
pub fn sql_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::String | ColumnType::Json => "VARCHAR",
        ColumnType::Bool => "BOOLEAN",
        ColumnType::Int => "BIGINT",
        ColumnType::Double => "DOUBLE",
        ColumnType::Timestamp => "TIMESTAMP",
    }
}

/// SQL engine over an in-memory DuckDB database
pub struct SqlEngine {
    conn: Connection,
    tables: Vec<String>,
}

impl SqlEngine {
    /// Open an empty in-memory database
    pub fn new() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;
        Ok(Self {
            conn,
            tables: Vec::new(),
        })
    }

    /// Create (or replace) a table from a definition and load its rows
    pub fn register_table(&mut self, definition: &TableDefinition, rows: &[Row]) -> Result<usize> {
        let name = definition.name;
        let columns: Vec<String> = definition
            .columns
            .iter()
            .map(|c| format!("\"{}\" {}", c.name, sql_type(c.column_type)))
            .collect();

        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS \"{name}\"; CREATE TABLE \"{name}\" ({});",
            columns.join(", ")
        ))?;

        let placeholders: Vec<&str> = definition
            .columns
            .iter()
            .map(|c| match c.column_type {
                ColumnType::Timestamp => "CAST(? AS TIMESTAMP)",
                _ => "?",
            })
            .collect();
        let insert = format!("INSERT INTO \"{name}\" VALUES ({})", placeholders.join(", "));

        self.conn.execute_batch("BEGIN TRANSACTION")?;
        let loaded = self.insert_rows(&insert, definition, rows);
        match loaded {
            Ok(_) => self.conn.execute_batch("COMMIT")?,
            Err(_) => self.conn.execute_batch("ROLLBACK")?,
        }
        let count = loaded?;

        self.tables.push(name.to_string());
        debug!(table = name, rows = count, "registered table");
        Ok(count)
    }

    fn insert_rows(
        &self,
        insert: &str,
        definition: &TableDefinition,
        rows: &[Row],
    ) -> Result<usize> {
        let mut stmt = self.conn.prepare(insert)?;
        for row in rows {
            let values = definition.columns.iter().map(|c| {
                to_sql_value(row.get(c.name).unwrap_or(&JsonValue::Null), c.column_type)
            });
            stmt.execute(params_from_iter(values))?;
        }
        Ok(rows.len())
    }

    /// Tables registered so far
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Run a query, returning one JSON object per result row
    pub fn query(&self, sql: &str) -> Result<Vec<JsonValue>> {
        debug!(sql, "executing query");
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let names: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = JsonObject::new();
            for (idx, name) in names.iter().enumerate() {
                let value: Value = row.get(idx)?;
                record.insert(name.clone(), duckdb_value_to_json(value));
            }
            records.push(JsonValue::Object(record));
        }
        Ok(records)
    }
}

impl std::fmt::Debug for SqlEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlEngine")
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}

/// Convert a row value to a DuckDB parameter
fn to_sql_value(value: &JsonValue, column_type: ColumnType) -> Value {
    match (column_type, value) {
        (_, JsonValue::Null) => Value::Null,
        (ColumnType::Bool, JsonValue::Bool(b)) => Value::Boolean(*b),
        (ColumnType::Int, v) => v.as_i64().map_or(Value::Null, Value::BigInt),
        (ColumnType::Double, v) => v.as_f64().map_or(Value::Null, Value::Double),
        (ColumnType::Timestamp, JsonValue::String(s)) => parse_timestamp(s)
            .map_or(Value::Null, |ts| {
                Value::Text(ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string())
            }),
        (ColumnType::String, JsonValue::String(s)) => Value::Text(s.clone()),
        (ColumnType::String | ColumnType::Json, v) => Value::Text(v.to_string()),
        _ => Value::Null,
    }
}

fn micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

/// Convert a DuckDB value to JSON
fn duckdb_value_to_json(value: Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(b),
        Value::TinyInt(i) => JsonValue::from(i),
        Value::SmallInt(i) => JsonValue::from(i),
        Value::Int(i) => JsonValue::from(i),
        Value::BigInt(i) => JsonValue::from(i),
        Value::HugeInt(i) => {
            i64::try_from(i).map_or_else(|_| JsonValue::String(i.to_string()), JsonValue::from)
        }
        Value::UTinyInt(i) => JsonValue::from(i),
        Value::USmallInt(i) => JsonValue::from(i),
        Value::UInt(i) => JsonValue::from(i),
        Value::UBigInt(i) => JsonValue::from(i),
        Value::Float(f) => JsonValue::from(f64::from(f)),
        Value::Double(f) => JsonValue::from(f),
        Value::Text(s) => JsonValue::String(s),
        Value::Timestamp(unit, t) => chrono::DateTime::from_timestamp_micros(micros(unit, t))
            .map_or(JsonValue::from(t), |ts| {
                JsonValue::String(ts.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
            }),
        Value::Date32(days) => chrono::NaiveDate::from_num_days_from_ce_opt(days + 719_163)
            .map_or(JsonValue::from(days), |d| {
                JsonValue::String(d.format("%Y-%m-%d").to_string())
            }),
        other => JsonValue::String(format!("{other:?}")),
    }
}
