//! Per-query constraints handed to table providers

use super::types::{ColumnType, TableDefinition};
use crate::types::JsonValue;
use std::collections::BTreeMap;

/// Equality quals, row limit and projected columns of one scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryContext {
    /// Column → accepted values (`col = a` or `col IN (a, b)`)
    pub quals: BTreeMap<String, Vec<JsonValue>>,
    /// Maximum number of rows wanted
    pub limit: Option<u64>,
    /// Requested columns; `None` means all of them
    pub columns: Option<Vec<String>>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted value for a column
    #[must_use]
    pub fn with_qual(mut self, column: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.add_qual(column, value);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn add_qual(&mut self, column: impl Into<String>, value: impl Into<JsonValue>) {
        self.quals.entry(column.into()).or_default().push(value.into());
    }

    /// Add a qual written as text (`--where col=value`, `?col=value`), typed by
    /// the column. Unknown columns keep the text and are rejected at planning.
    pub fn add_text_qual(&mut self, definition: &TableDefinition, column: &str, raw: &str) {
        let value = match definition.column(column) {
            Some(c) => parse_qual_value(c.column_type, raw),
            None => JsonValue::String(raw.to_string()),
        };
        self.add_qual(column, value);
    }

    pub fn has_qual(&self, column: &str) -> bool {
        self.quals.get(column).is_some_and(|v| !v.is_empty())
    }

    /// All accepted values of a column
    pub fn qual_values(&self, column: &str) -> &[JsonValue] {
        self.quals.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Accepted values of a column rendered as strings
    pub fn qual_strings(&self, column: &str) -> Vec<String> {
        self.qual_values(column).iter().filter_map(qual_string).collect()
    }

    /// The value of a single-valued equality qual
    pub fn equals_qual_string(&self, column: &str) -> Option<String> {
        match self.qual_values(column) {
            [value] => qual_string(value),
            _ => None,
        }
    }

    /// Whether a column's value is needed, either for output or to match a qual
    pub fn needs(&self, column: &str) -> bool {
        self.has_qual(column)
            || self
                .columns
                .as_ref()
                .map_or(true, |cols| cols.iter().any(|c| c == column))
    }
}

/// Parse a textual qual value as a column type, keeping the text when it does
/// not parse
pub fn parse_qual_value(column_type: ColumnType, raw: &str) -> JsonValue {
    let parsed = match column_type {
        ColumnType::Bool => raw.parse::<bool>().ok().map(JsonValue::Bool),
        ColumnType::Int => raw.parse::<i64>().ok().map(JsonValue::from),
        ColumnType::Double => raw.parse::<f64>().ok().map(JsonValue::from),
        ColumnType::Json => serde_json::from_str(raw).ok(),
        ColumnType::String | ColumnType::Timestamp => None,
    };
    parsed.unwrap_or_else(|| JsonValue::String(raw.to_string()))
}

fn qual_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}
