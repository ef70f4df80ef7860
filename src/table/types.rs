//! Table and column definitions

use crate::types::JsonValue;
use serde::Serialize;
use serde_json::json;

/// Prefix used in descriptions of columns kept only for compatibility
pub const DEPRECATED_PREFIX: &str = "[DEPRECATED]";

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    String,
    Bool,
    Int,
    Double,
    /// RFC 3339 timestamp, normalised to UTC
    Timestamp,
    /// Arbitrary JSON (objects and arrays)
    Json,
}

impl ColumnType {
    /// Lower-case type name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::Timestamp => "timestamp",
            Self::Json => "json",
        }
    }
}

/// Computes a column value from the item's JSON form
pub type DeriveFn = fn(&JsonValue) -> JsonValue;

/// How a column's value is produced from an item
#[derive(Clone, Copy, Default)]
pub enum Transform {
    /// The item's camelCase field named after the column
    #[default]
    FromCamel,
    /// A dotted path of camelCase fields (`owner.displayName`)
    FromField(&'static str),
    /// The value of an equality qual, or the key the row was fetched under
    FromQual(&'static str),
    /// Computed from the whole item
    Derived(DeriveFn),
    /// Fetched separately, only when the column is requested
    Hydrated,
    /// Always null
    Deprecated,
}

impl Transform {
    fn label(&self) -> String {
        match self {
            Self::FromCamel => "from_camel".to_string(),
            Self::FromField(path) => format!("from_field({path})"),
            Self::FromQual(column) => format!("from_qual({column})"),
            Self::Derived(_) => "derived".to_string(),
            Self::Hydrated => "hydrated".to_string(),
            Self::Deprecated => "deprecated".to_string(),
        }
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// A single table column
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub description: String,
    pub transform: Transform,
}

impl Column {
    /// A column read from the camelCase field of the same name
    pub fn new(name: &'static str, column_type: ColumnType, description: &str) -> Self {
        Self {
            name,
            column_type,
            description: description.to_string(),
            transform: Transform::FromCamel,
        }
    }

    pub fn string(name: &'static str, description: &str) -> Self {
        Self::new(name, ColumnType::String, description)
    }

    pub fn bool(name: &'static str, description: &str) -> Self {
        Self::new(name, ColumnType::Bool, description)
    }

    pub fn int(name: &'static str, description: &str) -> Self {
        Self::new(name, ColumnType::Int, description)
    }

    pub fn double(name: &'static str, description: &str) -> Self {
        Self::new(name, ColumnType::Double, description)
    }

    pub fn timestamp(name: &'static str, description: &str) -> Self {
        Self::new(name, ColumnType::Timestamp, description)
    }

    pub fn json(name: &'static str, description: &str) -> Self {
        Self::new(name, ColumnType::Json, description)
    }

    /// A compatibility column that always returns null
    pub fn deprecated(name: &'static str, column_type: ColumnType, description: &str) -> Self {
        Self {
            name,
            column_type,
            description: format!("{DEPRECATED_PREFIX} {description}"),
            transform: Transform::Deprecated,
        }
    }

    /// Read the value from a dotted field path
    #[must_use]
    pub fn from_field(mut self, path: &'static str) -> Self {
        self.transform = Transform::FromField(path);
        self
    }

    /// Read the value from the qual of the same name
    #[must_use]
    pub fn from_qual(mut self) -> Self {
        self.transform = Transform::FromQual(self.name);
        self
    }

    /// Compute the value from the item
    #[must_use]
    pub fn derived(mut self, f: DeriveFn) -> Self {
        self.transform = Transform::Derived(f);
        self
    }

    /// Mark the column as separately fetched
    #[must_use]
    pub fn hydrated(mut self) -> Self {
        self.transform = Transform::Hydrated;
        self
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self.transform, Transform::Deprecated)
    }

    pub fn is_hydrated(&self) -> bool {
        matches!(self.transform, Transform::Hydrated)
    }

    /// JSON description used by `inspect` and the HTTP API
    pub fn describe(&self) -> JsonValue {
        json!({
            "name": self.name,
            "type": self.column_type,
            "description": self.description,
            "transform": self.transform.label(),
        })
    }
}

/// Whether a key column must be constrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Require {
    Required,
    Optional,
}

/// A column a list or get call can use as an API-side filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyColumn {
    pub name: &'static str,
    pub require: Require,
}

impl KeyColumn {
    pub fn required(name: &'static str) -> Self {
        Self {
            name,
            require: Require::Required,
        }
    }

    pub fn optional(name: &'static str) -> Self {
        Self {
            name,
            require: Require::Optional,
        }
    }

    pub fn is_required(&self) -> bool {
        self.require == Require::Required
    }
}

/// A table's shape and the keys its list and get calls understand
#[derive(Debug, Clone)]
pub struct TableDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: Vec<Column>,
    /// Key columns of the list call
    pub list_keys: Vec<KeyColumn>,
    /// Key columns of the get call; `None` when the table has no lookup
    pub get_keys: Option<Vec<KeyColumn>>,
}

impl TableDefinition {
    /// Start a definition with no columns and no keys
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            columns: Vec::new(),
            list_keys: Vec::new(),
            get_keys: None,
        }
    }

    #[must_use]
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn list_keys(mut self, keys: Vec<KeyColumn>) -> Self {
        self.list_keys = keys;
        self
    }

    /// Enable single-item lookup by the `id` column
    #[must_use]
    pub fn get_by_id(mut self) -> Self {
        self.get_keys = Some(vec![KeyColumn::required("id")]);
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Key columns of the list call that must be present
    pub fn required_keys(&self) -> impl Iterator<Item = &KeyColumn> {
        self.list_keys.iter().filter(|k| k.is_required())
    }

    /// JSON description used by `inspect` and the HTTP API
    pub fn describe(&self) -> JsonValue {
        json!({
            "name": self.name,
            "description": self.description,
            "list_key_columns": self.list_keys,
            "get_key_columns": self.get_keys,
            "columns": self.columns.iter().map(Column::describe).collect::<Vec<_>>(),
        })
    }
}

/// `failing_resource_entities` → `failingResourceEntities`
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
