//! Turning API items into rows
//!
//! A [`RowSink`] wraps the caller's row callback. Each pushed [`TableItem`]
//! goes through the column transforms, is coerced to the column types,
//! checked against the quals, projected, and handed on.

use super::context::QueryContext;
use super::types::{snake_to_camel, Column, ColumnType, TableDefinition, Transform};
use crate::error::Result;
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// An API resource in JSON form, plus values fetched alongside it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableItem {
    /// The resource, serialised with its API (camelCase) field names
    pub value: JsonValue,
    /// Hydrated columns and the keys the item was fetched under
    pub extras: JsonObject,
}

impl TableItem {
    pub fn new(value: JsonValue) -> Self {
        Self {
            value,
            extras: JsonObject::new(),
        }
    }

    /// Serialise a model
    pub fn from_model<T: Serialize>(model: &T) -> Result<Self> {
        Ok(Self::new(serde_json::to_value(model)?))
    }

    /// Attach a value for a hydrated or qual-derived column
    #[must_use]
    pub fn with(mut self, column: &str, value: impl Into<JsonValue>) -> Self {
        self.extras.insert(column.to_string(), value.into());
        self
    }
}

/// One output row, keyed by column name in definition order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(JsonObject);

impl Row {
    pub fn get(&self, column: &str) -> Option<&JsonValue> {
        self.0.get(column)
    }

    pub fn as_object(&self) -> &JsonObject {
        &self.0
    }

    pub fn into_inner(self) -> JsonObject {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<JsonObject> for Row {
    fn from(map: JsonObject) -> Self {
        Self(map)
    }
}

type Callback<'a> = Box<dyn FnMut(Row) -> Result<()> + Send + 'a>;

/// Streams rows of one table scan to a callback
pub struct RowSink<'a> {
    definition: &'a TableDefinition,
    ctx: &'a QueryContext,
    callback: Callback<'a>,
    emitted: u64,
    filtered: u64,
}

impl<'a> RowSink<'a> {
    pub fn new(
        definition: &'a TableDefinition,
        ctx: &'a QueryContext,
        callback: impl FnMut(Row) -> Result<()> + Send + 'a,
    ) -> Self {
        Self {
            definition,
            ctx,
            callback: Box::new(callback),
            emitted: 0,
            filtered: 0,
        }
    }

    /// Transform an item and emit it if it matches the quals.
    ///
    /// Items pushed after the limit is reached are dropped.
    pub fn push(&mut self, item: TableItem) -> Result<()> {
        if self.is_satisfied() {
            return Ok(());
        }

        let row = build_row(self.definition, self.ctx, &item);
        if !matches_quals(self.definition, self.ctx, &row) {
            self.filtered += 1;
            return Ok(());
        }

        (self.callback)(project(row, self.ctx))?;
        self.emitted += 1;
        Ok(())
    }

    /// Rows still wanted, when the query has a limit
    pub fn rows_remaining(&self) -> Option<u64> {
        self.ctx.limit.map(|limit| limit.saturating_sub(self.emitted))
    }

    /// Whether the limit has been reached
    pub fn is_satisfied(&self) -> bool {
        self.rows_remaining() == Some(0)
    }

    pub fn rows_emitted(&self) -> u64 {
        self.emitted
    }

    pub fn rows_filtered(&self) -> u64 {
        self.filtered
    }

    pub fn definition(&self) -> &TableDefinition {
        self.definition
    }
}

impl std::fmt::Debug for RowSink<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSink")
            .field("table", &self.definition.name)
            .field("emitted", &self.emitted)
            .field("filtered", &self.filtered)
            .finish_non_exhaustive()
    }
}

/// Apply every column transform to an item
pub fn build_row(definition: &TableDefinition, ctx: &QueryContext, item: &TableItem) -> Row {
    let mut row = JsonObject::new();
    for column in &definition.columns {
        let raw = extract(column, ctx, item);
        row.insert(column.name.to_string(), coerce(raw, column.column_type));
    }
    Row(row)
}

fn extract(column: &Column, ctx: &QueryContext, item: &TableItem) -> JsonValue {
    match column.transform {
        Transform::FromCamel => item
            .value
            .get(snake_to_camel(column.name))
            .cloned()
            .unwrap_or(JsonValue::Null),
        Transform::FromField(path) => lookup_path(&item.value, path),
        Transform::FromQual(qual) => item
            .extras
            .get(qual)
            .cloned()
            .or_else(|| ctx.equals_qual_string(qual).map(JsonValue::String))
            .unwrap_or(JsonValue::Null),
        Transform::Derived(f) => f(&item.value),
        Transform::Hydrated => item
            .extras
            .get(column.name)
            .cloned()
            .unwrap_or(JsonValue::Null),
        Transform::Deprecated => JsonValue::Null,
    }
}

/// Walk a dotted path of object keys
pub fn lookup_path(value: &JsonValue, path: &str) -> JsonValue {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
        .cloned()
        .unwrap_or(JsonValue::Null)
}

/// Coerce a raw value to a column type. Empty strings and values that do
/// not fit the type become null.
pub fn coerce(value: JsonValue, column_type: ColumnType) -> JsonValue {
    use JsonValue as V;

    match (column_type, value) {
        (_, V::Null) => V::Null,
        (_, V::String(s)) if s.is_empty() => V::Null,

        (ColumnType::String, V::String(s)) => V::String(s),
        (ColumnType::String, other) => V::String(other.to_string()),

        (ColumnType::Bool, V::Bool(b)) => V::Bool(b),
        (ColumnType::Bool, V::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" => V::Bool(true),
            "false" => V::Bool(false),
            _ => V::Null,
        },
        (ColumnType::Bool, V::Number(n)) => n.as_f64().map_or(V::Null, |f| V::Bool(f != 0.0)),

        (ColumnType::Int, V::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map_or(V::Null, V::from),
        (ColumnType::Int, V::String(s)) => s.trim().parse::<i64>().map_or(V::Null, V::from),
        (ColumnType::Int, V::Bool(b)) => V::from(i64::from(b)),

        (ColumnType::Double, V::Number(n)) => n.as_f64().map_or(V::Null, V::from),
        (ColumnType::Double, V::String(s)) => s.trim().parse::<f64>().map_or(V::Null, V::from),

        (ColumnType::Timestamp, V::String(s)) => parse_timestamp(&s)
            .map_or(V::Null, |ts| V::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
        (ColumnType::Timestamp, V::Number(n)) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map_or(V::Null, |ts| V::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))),

        (ColumnType::Json, other) => other,

        _ => V::Null,
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn matches_quals(definition: &TableDefinition, ctx: &QueryContext, row: &Row) -> bool {
    ctx.quals.iter().all(|(name, accepted)| {
        let Some(column) = definition.column(name) else {
            return true;
        };
        let actual = row.get(name).unwrap_or(&JsonValue::Null);
        accepted
            .iter()
            .any(|want| coerce(want.clone(), column.column_type) == *actual)
    })
}

fn project(row: Row, ctx: &QueryContext) -> Row {
    match &ctx.columns {
        None => row,
        Some(columns) => {
            let mut all = row.into_inner();
            let mut out = JsonObject::new();
            for name in columns {
                if let Some(value) = all.remove(name) {
                    out.insert(name.clone(), value);
                }
            }
            Row(out)
        }
    }
}
