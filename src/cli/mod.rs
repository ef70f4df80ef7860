//! CLI module
//!
//! Command-line interface over the Vanta tables.
//!
//! # Commands
//!
//! - `tables` - List available tables
//! - `inspect` - Show a table's columns and key columns
//! - `select` - Scan one table (JSON lines or Parquet)
//! - `query` - Run SQL across tables
//! - `check` - Test credentials and connectivity
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{parse_filter, parse_table_filter, Cli, Commands, OutputFormat};
pub use runner::{query_contexts, render, select_context, Runner};
pub use server::{router, serve, ServerConfig};
