//! HTTP server mode for REST access to the Vanta tables

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ConnectionConfig;
use crate::engine::QueryEngine;
use crate::error::{Error, Result};
use crate::plugin::PLUGIN_NAME;
use crate::table::{QueryContext, TableDefinition};
use crate::types::JsonValue;

/// Server configuration
pub struct ServerConfig {
    /// Vanta connection used by every request
    pub connection: ConnectionConfig,
    /// Port to listen on
    pub port: u16,
}

/// App state shared across handlers
struct AppState {
    engine: QueryEngine,
}

/// Request body for the query endpoint
#[derive(Debug, Deserialize)]
struct QueryRequest {
    /// SQL referencing vanta_* tables
    sql: String,
    /// Table → column → value (or array of values) applied when loading
    #[serde(default)]
    quals: BTreeMap<String, BTreeMap<String, JsonValue>>,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Build the HTTP API over an engine
pub fn router(engine: QueryEngine) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/tables", get(list_tables))
        .route("/tables/:name", get(get_table))
        .route("/tables/:name/rows", get(table_rows))
        .route("/query", post(run_query))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { engine }))
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig) -> Result<()> {
    let port = config.port;
    let app = router(QueryEngine::new(config.connection));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// HTTP status for an engine error
fn error_status(error: &Error) -> StatusCode {
    match error {
        Error::TableNotFound { .. } => StatusCode::NOT_FOUND,
        Error::ColumnNotFound { .. }
        | Error::MissingRequiredQual { .. }
        | Error::InvalidArgument { .. }
        | Error::Sql(_) => StatusCode::BAD_REQUEST,
        Error::Auth { .. }
        | Error::OAuth2 { .. }
        | Error::Http(_)
        | Error::HttpStatus { .. }
        | Error::RateLimited { .. }
        | Error::Timeout { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &Error) -> Response {
    (
        error_status(error),
        Json(ApiResponse::<()>::error(error.to_string())),
    )
        .into_response()
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "connector": PLUGIN_NAME,
        "version": crate::VERSION,
    }))
}

/// List tables
async fn list_tables(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tables: Vec<JsonValue> = state
        .engine
        .plugin()
        .definitions()
        .into_iter()
        .map(|def| {
            json!({
                "name": def.name,
                "description": def.description,
                "columns": def.columns.len(),
                "get_by_id": def.get_keys.is_some(),
            })
        })
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(tables)))
}

/// Describe one table
async fn get_table(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    match state.engine.plugin().table(&name) {
        Ok(table) => (
            StatusCode::OK,
            Json(ApiResponse::success(table.definition().describe())),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// Scan a table: `?col=value&col=other&limit=N&columns=a,b`
async fn table_rows(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let ctx = match state
        .engine
        .plugin()
        .table(&name)
        .and_then(|table| rows_context(table.definition(), &params))
    {
        Ok(ctx) => ctx,
        Err(e) => return error_response(&e),
    };

    let mut rows = Vec::new();
    let scan = state
        .engine
        .execute(&name, &ctx, |row| {
            rows.push(row);
            Ok(())
        })
        .await;

    match scan {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(json!({ "rows": rows, "stats": stats }))),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// Build a scan context from query-string pairs
fn rows_context(definition: &TableDefinition, params: &[(String, String)]) -> Result<QueryContext> {
    let mut ctx = QueryContext::new();
    for (key, value) in params {
        match key.as_str() {
            "limit" => {
                let limit = value.parse::<u64>().map_err(|_| {
                    Error::invalid_argument(format!(
                        "limit must be a non-negative integer, got '{value}'"
                    ))
                })?;
                ctx.limit = Some(limit);
            }
            "columns" => {
                let columns: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect();
                ctx.columns = Some(columns);
            }
            column => ctx.add_text_qual(definition, column, value),
        }
    }
    Ok(ctx)
}

/// Run SQL over the referenced tables
async fn run_query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Response {
    let mut contexts: BTreeMap<String, QueryContext> = BTreeMap::new();
    for (table, columns) in req.quals {
        let ctx = contexts.entry(table).or_default();
        for (column, value) in columns {
            match value {
                JsonValue::Array(values) => {
                    for v in values {
                        ctx.add_qual(column.clone(), v);
                    }
                }
                single => ctx.add_qual(column, single),
            }
        }
    }

    match state.engine.sql(&req.sql, &contexts).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(json!({ "rows": rows }))),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}
