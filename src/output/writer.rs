//! Parquet output for scanned tables

use crate::error::{Error, Result};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;

/// Rows per row group; Vanta tables are small, so one group is typical
const ROW_GROUP_SIZE: usize = 64 * 1024;

/// Write a scanned table to a new Parquet file and return its row count.
///
/// Snappy is used unless another codec is given.
pub fn write_batch_to_parquet(
    path: impl AsRef<Path>,
    batch: &RecordBatch,
    compression: Option<Compression>,
) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| Error::output(format!("Failed to create {}: {e}", path.display())))?;

    let properties = WriterProperties::builder()
        .set_compression(compression.unwrap_or(Compression::SNAPPY))
        .set_max_row_group_size(ROW_GROUP_SIZE)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(properties))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(batch.num_rows())
}
