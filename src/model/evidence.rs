use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A piece of evidence attached to an audit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Evidence {
    pub id: String,
    pub external_id: String,
    pub status: String,
    pub name: String,
    pub deletion_date: Option<DateTime<Utc>>,
    pub creation_date: Option<DateTime<Utc>>,
    pub status_updated_date: Option<DateTime<Utc>>,
    pub test_status: Option<String>,
    pub evidence_type: String,
    pub evidence_id: String,
    pub related_controls: Vec<RelatedControl>,
    pub description: Option<String>,
}

impl Evidence {
    /// Names of the controls this evidence supports
    pub fn related_control_names(&self) -> Vec<String> {
        self.related_controls
            .iter()
            .map(|c| c.name.clone())
            .filter(|n| !n.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelatedControl {
    pub name: String,
    pub section_names: Vec<String>,
}
