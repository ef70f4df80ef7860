//! SQL over Vanta tables via DuckDB
//!
//! Fetched rows are loaded into an in-memory DuckDB database so that
//! queries can join and aggregate across tables.

mod engine;

pub use engine::{referenced_tables, sql_type, SqlEngine};
