//! CLI commands and argument parsing

use crate::error::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Query the Vanta compliance API as tables
#[derive(Parser, Debug)]
#[command(name = "vanta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection config file (YAML or JSON); VANTA_* environment variables fill gaps
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available tables
    Tables,

    /// Show the columns and key columns of a table
    Inspect {
        /// Table name, e.g. vanta_user
        table: String,
    },

    /// Scan one table
    Select {
        /// Table name, e.g. vanta_user
        table: String,

        /// Equality filter; repeat a column for IN semantics
        #[arg(short = 'w', long = "where", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,

        /// Maximum rows to return
        #[arg(short, long)]
        limit: Option<u64>,

        /// Columns to return (comma-separated)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Write a Parquet file instead of printing rows
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run SQL over one or more tables
    Query {
        /// SQL text referencing vanta_* tables
        sql: String,

        /// Filter applied when loading a table
        #[arg(short = 'w', long = "where", value_name = "TABLE.COLUMN=VALUE")]
        filters: Vec<String>,
    },

    /// Test credentials and connectivity
    Check,

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one row per line)
    Json,
    /// Human-readable output
    Pretty,
    /// Parquet file (requires --output)
    Parquet,
}

/// Split `column=value`
pub fn parse_filter(filter: &str) -> Result<(&str, &str)> {
    match filter.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => Ok((column.trim(), value)),
        _ => Err(Error::invalid_argument(format!(
            "filter '{filter}' must look like column=value"
        ))),
    }
}

/// Split `table.column=value`
pub fn parse_table_filter(filter: &str) -> Result<(&str, &str, &str)> {
    let (target, value) = parse_filter(filter)?;
    match target.split_once('.') {
        Some((table, column)) if !table.is_empty() && !column.is_empty() => {
            Ok((table, column, value))
        }
        _ => Err(Error::invalid_argument(format!(
            "filter '{filter}' must look like table.column=value"
        ))),
    }
}
