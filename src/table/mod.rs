//! Table host abstraction
//!
//! A table is a [`TableDefinition`] (columns, transforms, key columns) plus
//! a [`TableProvider`] that lists or looks up items through the API.
//!
//! ```text
//! provider.list ──▶ TableItem ──▶ RowSink ──▶ transforms ──▶ quals ──▶ callback(Row)
//! ```

mod context;
mod provider;
mod sink;
mod types;

pub use context::{parse_qual_value, QueryContext};
pub use provider::{list_all, list_all_keyed, TableProvider};
pub use sink::{build_row, coerce, lookup_path, parse_timestamp, Row, RowSink, TableItem};
pub use types::{
    snake_to_camel, Column, ColumnType, DeriveFn, KeyColumn, Require, TableDefinition, Transform,
    DEPRECATED_PREFIX,
};
