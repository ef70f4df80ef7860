use serde::{Deserialize, Serialize};

/// A connected integration. The API identifies these by `integrationId`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Integration {
    pub integration_id: String,
    pub display_name: String,
    pub resource_kinds: Vec<String>,
    pub connections: Vec<IntegrationConnection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntegrationConnection {
    pub connection_id: String,
    pub is_disabled: bool,
    pub connection_error_message: Option<String>,
}
