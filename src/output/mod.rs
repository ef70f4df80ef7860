//! Output module
//!
//! Converts table rows to Arrow record batches and writes Parquet files.

mod schema;
mod writer;

pub use schema::{
    arrow_type, batch_to_json, rows_to_batch, selected_columns, table_schema, COLUMN_TYPE_KEY,
};
pub use writer::write_batch_to_parquet;

#[cfg(test)]
mod tests;
