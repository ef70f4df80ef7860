//! CLI runner - executes commands

use crate::cli::commands::{parse_filter, parse_table_filter, Cli, Commands, OutputFormat};
use crate::cli::server::{serve, ServerConfig};
use crate::config::ConnectionConfig;
use crate::engine::QueryEngine;
use crate::error::{Error, Result};
use crate::output::write_batch_to_parquet;
use crate::plugin::{Plugin, PLUGIN_NAME};
use crate::table::QueryContext;
use crate::types::JsonValue;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Tables => self.tables(),
            Commands::Inspect { table } => self.inspect(table),
            Commands::Select {
                table,
                filters,
                limit,
                columns,
                output,
            } => {
                self.select(table, filters, *limit, columns.clone(), output.as_deref())
                    .await
            }
            Commands::Query { sql, filters } => self.query(sql, filters).await,
            Commands::Check => self.check().await,
            Commands::Serve { port } => {
                let config = ServerConfig {
                    connection: self.load_config()?,
                    port: *port,
                };
                serve(config).await
            }
        }
    }

    /// Load and validate the connection config
    fn load_config(&self) -> Result<ConnectionConfig> {
        let config = ConnectionConfig::load(self.cli.config.as_deref())?;
        config.validate()?;
        Ok(config)
    }

    fn engine(&self) -> Result<QueryEngine> {
        Ok(QueryEngine::new(self.load_config()?))
    }

    /// List tables
    fn tables(&self) -> Result<()> {
        for definition in Plugin::new().definitions() {
            self.output_message(&json!({
                "name": definition.name,
                "description": definition.description,
                "columns": definition.columns.len(),
                "get_by_id": definition.get_keys.is_some(),
            }));
        }
        Ok(())
    }

    /// Describe one table
    fn inspect(&self, table: &str) -> Result<()> {
        let plugin = Plugin::new();
        self.output_message(&plugin.table(table)?.definition().describe());
        Ok(())
    }

    /// Scan one table to stdout or a Parquet file
    async fn select(
        &self,
        table: &str,
        filters: &[String],
        limit: Option<u64>,
        columns: Option<Vec<String>>,
        output: Option<&Path>,
    ) -> Result<()> {
        let engine = self.engine()?;
        let ctx = select_context(engine.plugin(), table, filters, limit, columns)?;

        let parquet = match (output, self.cli.format) {
            (Some(path), _) => Some(path),
            (None, OutputFormat::Parquet) => {
                return Err(Error::invalid_argument("--format parquet requires --output"));
            }
            (None, _) => None,
        };

        if let Some(path) = parquet {
            let batch = engine.collect_batch(table, &ctx).await?;
            let rows = write_batch_to_parquet(path, &batch, None)?;
            self.output_message(&json!({
                "type": "OUTPUT",
                "table": table,
                "path": path.display().to_string(),
                "rows": rows,
            }));
            return Ok(());
        }

        let format = self.cli.format;
        let stats = engine
            .execute(table, &ctx, |row| {
                println!("{}", render(format, &JsonValue::Object(row.into_inner())));
                Ok(())
            })
            .await?;
        debug!(%stats, "select finished");
        Ok(())
    }

    /// Run SQL over the referenced tables
    async fn query(&self, sql: &str, filters: &[String]) -> Result<()> {
        let engine = self.engine()?;
        let quals = query_contexts(engine.plugin(), filters)?;
        for row in engine.sql(sql, &quals).await? {
            self.output_message(&row);
        }
        Ok(())
    }

    /// Authenticate and fetch one user
    async fn check(&self) -> Result<()> {
        let engine = match self.engine() {
            Ok(engine) => engine,
            Err(e) => {
                self.connection_status(false, format!("Invalid config: {e}"));
                return Ok(());
            }
        };

        let sample = QueryContext::new().with_limit(1);
        match engine.execute("vanta_user", &sample, |_| Ok(())).await {
            Ok(_) => self.connection_status(true, "Connection successful".to_string()),
            Err(e) => self.connection_status(false, format!("Connection failed: {e}")),
        }
        Ok(())
    }

    fn connection_status(&self, ok: bool, message: String) {
        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connector": PLUGIN_NAME,
            "connectionStatus": {
                "status": if ok { "SUCCEEDED" } else { "FAILED" },
                "message": message,
            }
        }));
    }

    /// Output a message
    fn output_message(&self, msg: &JsonValue) {
        println!("{}", render(self.cli.format, msg));
    }
}

/// Serialise a value for the chosen output format
pub fn render(format: OutputFormat, value: &JsonValue) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Parquet => {
            serde_json::to_string(value).unwrap_or_default()
        }
        OutputFormat::Pretty => serde_json::to_string_pretty(value).unwrap_or_default(),
    }
}

/// Build the scan context of `select` from its flags
pub fn select_context(
    plugin: &Plugin,
    table: &str,
    filters: &[String],
    limit: Option<u64>,
    columns: Option<Vec<String>>,
) -> Result<QueryContext> {
    let definition = plugin.table(table)?.definition();
    let mut ctx = QueryContext::new();
    for filter in filters {
        let (column, value) = parse_filter(filter)?;
        ctx.add_text_qual(definition, column, value);
    }
    ctx.limit = limit;
    ctx.columns = columns.filter(|c| !c.is_empty());
    Ok(ctx)
}

/// Group `table.column=value` filters into one context per table
pub fn query_contexts(
    plugin: &Plugin,
    filters: &[String],
) -> Result<BTreeMap<String, QueryContext>> {
    let mut contexts: BTreeMap<String, QueryContext> = BTreeMap::new();
    for filter in filters {
        let (table, column, value) = parse_table_filter(filter)?;
        let definition = plugin.table(table)?.definition();
        contexts
            .entry(table.to_string())
            .or_default()
            .add_text_qual(definition, column, value);
    }
    Ok(contexts)
}
