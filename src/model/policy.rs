use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A policy document; `status` is one of `NEEDS_REMEDIATION`, `COMPLIANT`
/// or `NOT_STARTED`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub approved_at_date: Option<DateTime<Utc>>,
    pub latest_version: Option<PolicyLatestVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyLatestVersion {
    pub status: String,
}
