//! Table registry

use crate::error::{Error, Result};
use crate::table::{TableDefinition, TableProvider};
use crate::tables;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Connector name reported by `check` and the HTTP API
pub const PLUGIN_NAME: &str = "vanta";

/// Maps table names to their providers
#[derive(Clone)]
pub struct Plugin {
    tables: BTreeMap<&'static str, Arc<dyn TableProvider>>,
}

impl Plugin {
    /// Registry with every Vanta table
    pub fn new() -> Self {
        Self::with_tables(tables::all())
    }

    /// Registry with a custom set of tables
    pub fn with_tables(providers: impl IntoIterator<Item = Arc<dyn TableProvider>>) -> Self {
        let tables = providers
            .into_iter()
            .map(|provider| (provider.definition().name, provider))
            .collect();
        Self { tables }
    }

    /// Look a table up by name
    pub fn table(&self, name: &str) -> Result<&Arc<dyn TableProvider>> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::table_not_found(name))
    }

    /// Table names, sorted
    pub fn table_names(&self) -> Vec<&'static str> {
        self.tables.keys().copied().collect()
    }

    /// Every table definition, sorted by name
    pub fn definitions(&self) -> Vec<&TableDefinition> {
        self.tables.values().map(|t| t.definition()).collect()
    }
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("tables", &self.table_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lists_all_tables() {
        let plugin = Plugin::new();
        assert_eq!(
            plugin.table_names(),
            vec![
                "vanta_computer",
                "vanta_evidence",
                "vanta_group",
                "vanta_integration",
                "vanta_monitor",
                "vanta_policy",
                "vanta_user",
                "vanta_vendor",
            ]
        );
        assert_eq!(plugin.definitions().len(), 8);
    }

    #[test]
    fn test_unknown_table() {
        let err = Plugin::new().table("vanta_nope").err().unwrap();
        assert_eq!(err.to_string(), "Table 'vanta_nope' not found");
    }
}
