// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Vanta Connector
//!
//! Exposes the Vanta compliance REST API as queryable tables: users,
//! groups, policies, integrations, computers, vendors, monitors and evidence.
//!
//! ## Features
//!
//! - **OAuth2 Client Credentials**: Token fetched once per connection and refreshed on expiry
//! - **Cursor Pagination**: One shared `hasNextPage` / `endCursor` loop for every resource
//! - **Column Transforms**: Renames, nested-field flattening, derived and deprecated columns
//! - **Qual Pushdown**: Equality filters passed to the API where it supports them
//! - **Arrow Output**: Scans as Arrow RecordBatches or Parquet files
//! - **SQL**: Joins and aggregates across tables via in-memory DuckDB
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vanta_connector::{ConnectionConfig, QueryContext, QueryEngine, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let engine = QueryEngine::new(ConnectionConfig::load(None)?);
//!
//!     let ctx = QueryContext::new().with_qual("is_active", true).with_limit(10);
//!     engine
//!         .execute("vanta_user", &ctx, |row| {
//!             println!("{}", serde_json::to_string(&row)?);
//!             Ok(())
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 CLI (select / query)  ·  HTTP server            │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  QueryEngine: plan → get × N | list → RowSink → callback        │
//! │  SqlEngine (DuckDB)  ·  Arrow / Parquet output                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │   Model   │   Tables    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ OAuth2   │ Retry     │ Cursor        │ People    │ vanta_user  │
//! │ Bearer   │ Rate Limit│ hasNextPage   │ Monitors  │ vanta_...   │
//! │ Refresh  │ Backoff   │ Page size     │ Evidence  │ Transforms  │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connection configuration
pub mod config;

/// Authentication (OAuth2 client credentials, static token)
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Vanta API resource models
pub mod model;

/// Typed Vanta REST client
pub mod api;

/// Shared per-connection API client
pub mod connection;

/// Table definitions, transforms and row sink
pub mod table;

/// The Vanta tables
pub mod tables;

/// Table registry
pub mod plugin;

/// Query planning and execution
pub mod engine;

/// Arrow/Parquet output
pub mod output;

/// SQL over tables via DuckDB
pub mod database;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ConnectionConfig;
pub use engine::{QueryEngine, ScanStats};
pub use plugin::Plugin;
pub use table::{QueryContext, Row};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
