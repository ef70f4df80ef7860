//! Automated tests (surfaced as monitors) and the entities they evaluate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity status for resources currently failing a test
pub const ENTITY_STATUS_FAILING: &str = "FAILING";

/// An automated compliance test
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Test {
    pub id: String,
    pub name: String,
    pub last_test_run_date: Option<DateTime<Utc>>,
    pub latest_flip_date: Option<DateTime<Utc>>,
    pub description: String,
    pub failure_description: String,
    pub remediation_description: String,
    pub version: Option<TestVersion>,
    pub category: String,
    pub integrations: Vec<String>,
    pub status: String,
    pub deactivated_status_info: Option<TestDeactivatedStatus>,
    pub remediation_status_info: Option<TestRemediationStatus>,
    pub owner: Option<TestOwner>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestVersion {
    pub major: i64,
    pub minor: i64,
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestDeactivatedStatus {
    pub is_deactivated: bool,
    pub deactivated_reason: Option<String>,
    pub last_updated_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestRemediationStatus {
    pub status: String,
    pub soonest_remediate_by_date: Option<DateTime<Utc>>,
    pub item_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestOwner {
    pub id: String,
    pub email_address: String,
    pub display_name: String,
}

/// A resource evaluated by a test
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestEntity {
    pub id: String,
    pub entity_status: String,
    pub display_name: String,
    pub response_type: String,
    pub deactivated_reason: Option<String>,
    pub last_updated_date: Option<DateTime<Utc>>,
    pub created_date: Option<DateTime<Utc>>,
}
