//! Tests for output module

use super::*;
use crate::table::{Column, ColumnType, Row, TableDefinition};
use arrow::array::{Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, TimeUnit};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs::File;
use tempfile::tempdir;

fn definition() -> TableDefinition {
    TableDefinition::new("vanta_thing", "Things").columns(vec![
        Column::string("id", "Identifier"),
        Column::bool("enabled", "Enabled"),
        Column::int("count", "Count"),
        Column::double("amount", "Amount"),
        Column::timestamp("created", "Created"),
        Column::json("tags", "Tags"),
    ])
}

fn rows() -> Vec<Row> {
    vec![
        Row::from(
            json!({
                "id": "a",
                "enabled": true,
                "count": 3,
                "amount": 1.5,
                "created": "2024-05-01T12:30:00Z",
                "tags": ["x", {"k": "v"}]
            })
            .as_object()
            .cloned()
            .unwrap(),
        ),
        Row::from(
            json!({"id": "b", "enabled": null, "count": null, "amount": null, "created": null, "tags": null})
                .as_object()
                .cloned()
                .unwrap(),
        ),
    ]
}

// ============================================================================
// Schema Tests
// ============================================================================

#[test]
fn test_table_schema_types() {
    let schema = table_schema(&definition(), None).unwrap();
    let types: Vec<_> = schema.fields().iter().map(|f| f.data_type().clone()).collect();
    assert_eq!(
        types,
        vec![
            DataType::Utf8,
            DataType::Boolean,
            DataType::Int64,
            DataType::Float64,
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            DataType::Utf8,
        ]
    );
    assert!(schema.fields().iter().all(|f| f.is_nullable()));
    assert_eq!(
        schema.field_with_name("tags").unwrap().metadata().get(COLUMN_TYPE_KEY),
        Some(&"json".to_string())
    );
}

#[test]
fn test_table_schema_projection() {
    let projection = vec!["tags".to_string(), "id".to_string()];
    let schema = table_schema(&definition(), Some(&projection)).unwrap();
    let names: Vec<_> = schema.fields().iter().map(|f| f.name().clone()).collect();
    assert_eq!(names, vec!["tags", "id"]);

    let bad = vec!["nope".to_string()];
    let err = table_schema(&definition(), Some(&bad)).unwrap_err();
    assert_eq!(err.to_string(), "Column 'nope' not found in table 'vanta_thing'");
}

#[test]
fn test_arrow_type() {
    assert_eq!(arrow_type(ColumnType::Json), DataType::Utf8);
    assert_eq!(arrow_type(ColumnType::Int), DataType::Int64);
}

// ============================================================================
// Conversion Tests
// ============================================================================

#[test]
fn test_rows_to_batch() {
    let batch = rows_to_batch(&definition(), &rows(), None).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 6);

    let created = batch
        .column(4)
        .as_any()
        .downcast_ref::<TimestampMicrosecondArray>()
        .unwrap();
    assert_eq!(created.value(0), 1_714_566_600_000_000);
    assert!(created.is_null(1));
}

#[test]
fn test_batch_to_json_restores_rows() {
    let batch = rows_to_batch(&definition(), &rows(), None).unwrap();
    let json = batch_to_json(&batch).unwrap();

    assert_eq!(
        json,
        rows()
            .into_iter()
            .map(|r| Value::Object(r.into_inner()))
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_rows_to_batch_empty() {
    let batch = rows_to_batch(&definition(), &[], None).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 6);
    assert!(batch_to_json(&batch).unwrap().is_empty());
}

#[test]
fn test_rows_to_batch_projected() {
    let projection = vec!["count".to_string()];
    let batch = rows_to_batch(&definition(), &rows(), Some(&projection)).unwrap();
    assert_eq!(batch_to_json(&batch).unwrap(), vec![json!({"count": 3}), json!({"count": null})]);
}

// ============================================================================
// Parquet Writer Tests
// ============================================================================

#[test]
fn test_write_batch_to_parquet_reads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("things.parquet");

    let batch = rows_to_batch(&definition(), &rows(), None).unwrap();
    let written = write_batch_to_parquet(&path, &batch, None).unwrap();
    assert_eq!(written, 2);

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total, 2);
    assert_eq!(batches[0].schema().field(4).data_type(), batch.schema().field(4).data_type());
}

#[test]
fn test_write_batch_to_parquet_with_zstd() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("zstd.parquet");
    let batch = rows_to_batch(&definition(), &rows(), None).unwrap();

    let written = write_batch_to_parquet(
        &path,
        &batch,
        Some(Compression::ZSTD(parquet::basic::ZstdLevel::default())),
    )
    .unwrap();
    assert_eq!(written, 2);

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap()).unwrap();
    let column = builder.metadata().row_group(0).column(0);
    assert!(matches!(column.compression(), Compression::ZSTD(_)));
}

#[test]
fn test_write_batch_to_parquet_bad_path() {
    let batch = rows_to_batch(&definition(), &rows(), None).unwrap();
    let err = write_batch_to_parquet("/nonexistent/dir/out.parquet", &batch, None).unwrap_err();
    assert!(matches!(err, crate::Error::Output { .. }));
}
