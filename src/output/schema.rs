//! Rows to Arrow and back
//!
//! Table columns map onto Arrow types directly; JSON columns travel as
//! their text form and are tagged in the field metadata so they can be
//! parsed back.

use crate::error::{Error, Result};
use crate::table::{parse_timestamp, Column, ColumnType, Row, TableDefinition};
use crate::types::{JsonObject, JsonValue};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray,
    TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use std::collections::HashMap;
use std::sync::Arc;

/// Field metadata key holding the column type
pub const COLUMN_TYPE_KEY: &str = "vanta.column_type";

/// Arrow type of a column
pub fn arrow_type(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::String | ColumnType::Json => DataType::Utf8,
        ColumnType::Bool => DataType::Boolean,
        ColumnType::Int => DataType::Int64,
        ColumnType::Double => DataType::Float64,
        ColumnType::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
    }
}

fn field(column: &Column) -> Field {
    Field::new(column.name, arrow_type(column.column_type), true).with_metadata(HashMap::from([(
        COLUMN_TYPE_KEY.to_string(),
        column.column_type.as_str().to_string(),
    )]))
}

/// Columns of a table, optionally restricted to a projection (in its order)
pub fn selected_columns<'a>(
    definition: &'a TableDefinition,
    projection: Option<&[String]>,
) -> Result<Vec<&'a Column>> {
    match projection {
        None => Ok(definition.columns.iter().collect()),
        Some(names) => names
            .iter()
            .map(|name| {
                definition
                    .column(name)
                    .ok_or_else(|| Error::column_not_found(definition.name, name.as_str()))
            })
            .collect(),
    }
}

/// Arrow schema of a table scan
pub fn table_schema(definition: &TableDefinition, projection: Option<&[String]>) -> Result<Schema> {
    let fields: Vec<Field> = selected_columns(definition, projection)?
        .into_iter()
        .map(field)
        .collect();
    Ok(Schema::new(fields))
}

/// Build a record batch from rows of one table
pub fn rows_to_batch(
    definition: &TableDefinition,
    rows: &[Row],
    projection: Option<&[String]>,
) -> Result<RecordBatch> {
    let columns = selected_columns(definition, projection)?;
    let schema = Arc::new(Schema::new(
        columns.iter().map(|c| field(c)).collect::<Vec<_>>(),
    ));

    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|column| {
            let values: Vec<Option<&JsonValue>> = rows
                .iter()
                .map(|row| row.get(column.name).filter(|v| !v.is_null()))
                .collect();
            build_array(&values, column.column_type)
        })
        .collect();

    RecordBatch::try_new(schema, arrays).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}

fn build_array(values: &[Option<&JsonValue>], column_type: ColumnType) -> ArrayRef {
    match column_type {
        ColumnType::Bool => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(JsonValue::as_bool))
                .collect::<BooleanArray>(),
        ),
        ColumnType::Int => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(JsonValue::as_i64))
                .collect::<Int64Array>(),
        ),
        ColumnType::Double => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(JsonValue::as_f64))
                .collect::<Float64Array>(),
        ),
        ColumnType::Timestamp => Arc::new(
            values
                .iter()
                .map(|v| {
                    v.and_then(JsonValue::as_str)
                        .and_then(parse_timestamp)
                        .map(|ts| ts.timestamp_micros())
                })
                .collect::<TimestampMicrosecondArray>()
                .with_timezone("UTC"),
        ),
        ColumnType::String => Arc::new(
            values
                .iter()
                .map(|v| {
                    v.map(|v| match v {
                        JsonValue::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                })
                .collect::<StringArray>(),
        ),
        ColumnType::Json => Arc::new(
            values
                .iter()
                .map(|v| v.map(ToString::to_string))
                .collect::<StringArray>(),
        ),
    }
}

/// Convert a record batch to JSON objects, one per row
pub fn batch_to_json(batch: &RecordBatch) -> Result<Vec<JsonValue>> {
    let schema = batch.schema();
    let mut records = Vec::with_capacity(batch.num_rows());

    for row in 0..batch.num_rows() {
        let mut record = JsonObject::new();
        for (idx, field) in schema.fields().iter().enumerate() {
            let is_json = field
                .metadata()
                .get(COLUMN_TYPE_KEY)
                .is_some_and(|t| t == ColumnType::Json.as_str());
            let value = cell_to_json(batch.column(idx).as_ref(), row, is_json)?;
            record.insert(field.name().clone(), value);
        }
        records.push(JsonValue::Object(record));
    }

    Ok(records)
}

fn downcast<'a, T: 'static>(array: &'a dyn Array, name: &str) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| Error::Output {
        message: format!("Failed to downcast to {name}"),
    })
}

fn cell_to_json(array: &dyn Array, row: usize, is_json: bool) -> Result<JsonValue> {
    if array.is_null(row) {
        return Ok(JsonValue::Null);
    }

    match array.data_type() {
        DataType::Boolean => Ok(JsonValue::Bool(
            downcast::<BooleanArray>(array, "BooleanArray")?.value(row),
        )),
        DataType::Int64 => Ok(JsonValue::from(
            downcast::<Int64Array>(array, "Int64Array")?.value(row),
        )),
        DataType::Float64 => Ok(JsonValue::from(
            downcast::<Float64Array>(array, "Float64Array")?.value(row),
        )),
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            let micros = downcast::<TimestampMicrosecondArray>(array, "TimestampMicrosecondArray")?
                .value(row);
            Ok(chrono::DateTime::from_timestamp_micros(micros).map_or(JsonValue::Null, |ts| {
                JsonValue::String(ts.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
            }))
        }
        DataType::Utf8 => {
            let text = downcast::<StringArray>(array, "StringArray")?.value(row);
            if is_json {
                Ok(serde_json::from_str(text)?)
            } else {
                Ok(JsonValue::String(text.to_string()))
            }
        }
        other => Err(Error::output(format!("unsupported Arrow type {other}"))),
    }
}
