//! Query engine
//!
//! Plans and runs table scans against the Vanta API.
//!
//! # Overview
//!
//! The engine module provides:
//! - `QueryEngine` - Validates a scan, chooses list or get, streams rows
//! - `ScanStats` - Row counts and timing of one scan
//! - SQL over several tables through [`SqlEngine`]
//!
//! ```text
//! execute(table, ctx)
//!   ├─ id = ...  ──▶ provider.get × N (concurrent) ─┐
//!   └─ otherwise ──▶ provider.list (paged)  ────────┴─▶ RowSink ──▶ callback
//! ```

mod types;

pub use types::{ScanMode, ScanStats};

use crate::api::VantaClient;
use crate::config::ConnectionConfig;
use crate::connection::ConnectionManager;
use crate::database::{referenced_tables, SqlEngine};
use crate::error::{Error, Result};
use crate::output::rows_to_batch;
use crate::plugin::Plugin;
use crate::table::{QueryContext, Row, RowSink, TableDefinition, TableProvider};
use crate::types::JsonValue;
use arrow::record_batch::RecordBatch;
use futures::future::try_join_all;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;
use tracing::{debug, info};

/// Runs scans over the registered tables with a shared API client
#[derive(Debug)]
pub struct QueryEngine {
    connections: ConnectionManager,
    plugin: Plugin,
}

impl QueryEngine {
    /// Engine over every Vanta table
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_plugin(config, Plugin::new())
    }

    /// Engine over a custom table registry
    pub fn with_plugin(config: ConnectionConfig, plugin: Plugin) -> Self {
        Self {
            connections: ConnectionManager::new(config),
            plugin,
        }
    }

    pub fn plugin(&self) -> &Plugin {
        &self.plugin
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    /// Scan one table, handing each matching row to `callback`
    pub async fn execute<F>(
        &self,
        table: &str,
        ctx: &QueryContext,
        callback: F,
    ) -> Result<ScanStats>
    where
        F: FnMut(Row) -> Result<()> + Send,
    {
        let start = Instant::now();
        let provider = self.plugin.table(table)?;
        let definition = provider.definition();
        let mode = plan(definition, ctx)?;
        debug!(table, ?mode, quals = ?ctx.quals, limit = ?ctx.limit, "starting scan");

        let client = self.connections.client().await?;
        let mut sink = RowSink::new(definition, ctx, callback);
        match mode {
            ScanMode::Get => fetch_by_key(provider.as_ref(), &client, ctx, &mut sink).await?,
            ScanMode::List => provider.list(&client, ctx, &mut sink).await?,
        }

        let mut stats = ScanStats::new(table, mode);
        stats.rows = sink.rows_emitted();
        stats.filtered = sink.rows_filtered();
        stats.duration = start.elapsed();
        info!(
            table,
            rows = stats.rows,
            filtered = stats.filtered,
            duration_ms = stats.duration_ms(),
            "scan complete"
        );
        Ok(stats)
    }

    /// Scan a table into memory
    pub async fn collect(&self, table: &str, ctx: &QueryContext) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        self.execute(table, ctx, |row| {
            rows.push(row);
            Ok(())
        })
        .await?;
        Ok(rows)
    }

    /// Scan a table into an Arrow record batch with the projected columns
    pub async fn collect_batch(&self, table: &str, ctx: &QueryContext) -> Result<RecordBatch> {
        let rows = self.collect(table, ctx).await?;
        let definition = self.plugin.table(table)?.definition();
        rows_to_batch(definition, &rows, ctx.columns.as_deref())
    }

    /// Run SQL over the tables it mentions.
    ///
    /// Each referenced table is scanned with its entry in `quals` (if any) and
    /// loaded into an in-memory DuckDB database before the query runs.
    pub async fn sql(
        &self,
        query: &str,
        quals: &BTreeMap<String, QueryContext>,
    ) -> Result<Vec<JsonValue>> {
        if let Some(unknown) = quals.keys().find(|t| self.plugin.table(t).is_err()) {
            return Err(Error::table_not_found(unknown.as_str()));
        }

        let mut loaded = Vec::new();
        for table in referenced_tables(query) {
            let Ok(provider) = self.plugin.table(&table) else {
                debug!(table, "not a Vanta table, leaving it to DuckDB");
                continue;
            };
            let ctx = quals.get(&table).cloned().unwrap_or_default();
            let rows = self.collect(&table, &ctx).await?;
            loaded.push((provider.definition(), rows));
        }

        let mut engine = SqlEngine::new()?;
        for (definition, rows) in &loaded {
            engine.register_table(definition, rows)?;
        }
        engine.query(query)
    }
}

/// Check a scan against the table and decide how to fetch it
fn plan(definition: &TableDefinition, ctx: &QueryContext) -> Result<ScanMode> {
    for column in ctx.quals.keys().chain(ctx.columns.iter().flatten()) {
        if definition.column(column).is_none() {
            return Err(Error::column_not_found(definition.name, column.as_str()));
        }
    }

    let by_key = definition.get_keys.as_ref().is_some_and(|keys| {
        keys.iter().any(|k| k.is_required())
            && keys
                .iter()
                .filter(|k| k.is_required())
                .all(|k| ctx.has_qual(k.name))
    });
    if by_key {
        return Ok(ScanMode::Get);
    }

    if let Some(key) = definition.required_keys().find(|k| !ctx.has_qual(k.name)) {
        return Err(Error::MissingRequiredQual {
            table: definition.name.to_string(),
            column: key.name.to_string(),
        });
    }
    Ok(ScanMode::List)
}

/// Look up every requested key value concurrently, in qual order
async fn fetch_by_key(
    provider: &dyn TableProvider,
    client: &VantaClient,
    ctx: &QueryContext,
    sink: &mut RowSink<'_>,
) -> Result<()> {
    let key = provider
        .definition()
        .get_keys
        .as_ref()
        .and_then(|keys| keys.iter().find(|k| k.is_required()))
        .map_or("id", |k| k.name);

    let mut seen = HashSet::new();
    let mut ids = ctx.qual_strings(key);
    ids.retain(|id| seen.insert(id.clone()));

    let items = try_join_all(ids.iter().map(|id| provider.get(client, ctx, id))).await?;
    for item in items.into_iter().flatten() {
        let item = provider.hydrate(client, ctx, item).await?;
        sink.push(item)?;
        if sink.is_satisfied() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
