use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person tracked by Vanta (employee, contractor, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub email_address: String,
    pub employment: Option<Employment>,
    pub name: Option<Name>,
    pub group_ids: Vec<String>,
    pub sources: Option<Sources>,
    pub tasks_summary: Option<TasksSummary>,
}

impl Person {
    /// Whether the person is currently employed
    pub fn is_active(&self) -> bool {
        self.employment
            .as_ref()
            .and_then(|e| e.status.as_ref())
            .is_some_and(|s| *s == EmploymentStatus::Current)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Employment {
    pub end_date: Option<DateTime<Utc>>,
    pub job_title: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub status: Option<EmploymentStatus>,
}

/// Employment status; values the API adds later are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmploymentStatus {
    Upcoming,
    Current,
    OnLeave,
    Inactive,
    Other(String),
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Current => "CURRENT",
            Self::OnLeave => "ON_LEAVE",
            Self::Inactive => "INACTIVE",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for EmploymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "UPCOMING" => Self::Upcoming,
            "CURRENT" => Self::Current,
            "ON_LEAVE" => Self::OnLeave,
            "INACTIVE" => Self::Inactive,
            _ => Self::Other(value),
        }
    }
}

impl From<EmploymentStatus> for String {
    fn from(value: EmploymentStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Name {
    pub display: String,
    pub last: String,
    pub first: String,
}

/// Which integration each attribute was synced from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sources {
    pub email_address: Option<SourceInfo>,
    pub employment: Option<SourceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

/// Security task progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TasksSummary {
    pub completion_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub details: TasksDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TasksDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_trainings: Option<TaskDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_custom_tasks: Option<TaskDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_offboarding_custom_tasks: Option<TaskDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_background_checks: Option<TaskDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_policies: Option<AcceptPoliciesTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_device_monitoring: Option<TaskDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskDetail {
    pub task_type: String,
    pub status: String,
    pub due_date: Option<DateTime<Utc>>,
    pub completion_date: Option<DateTime<Utc>>,
    /// Either `null` or an object describing why the task is disabled
    pub disabled: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AcceptPoliciesTask {
    pub task_type: String,
    pub status: String,
    pub due_date: Option<DateTime<Utc>>,
    pub completion_date: Option<DateTime<Utc>>,
    pub disabled: serde_json::Value,
    pub unaccepted_policies: Vec<AcceptedPolicy>,
    pub accepted_policies: Vec<AcceptedPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptedPolicy {
    pub name: String,
}
