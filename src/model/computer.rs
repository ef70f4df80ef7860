use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome reported by a passing device check
pub const CHECK_PASS: &str = "PASS";

/// A workstation monitored by the Vanta agent or an MDM integration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Computer {
    pub id: String,
    pub integration_id: String,
    pub last_check_date: Option<DateTime<Utc>>,
    pub operating_system: Option<OperatingSystem>,
    pub owner: Option<ComputerOwner>,
    pub serial_number: String,
    pub udid: String,
    pub screenlock: Option<SecurityCheck>,
    pub disk_encryption: Option<SecurityCheck>,
    pub password_manager: Option<SecurityCheck>,
    pub antivirus_installation: Option<SecurityCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComputerOwner {
    pub id: String,
    pub email_address: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingSystem {
    #[serde(rename = "type")]
    pub os_type: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityCheck {
    pub outcome: String,
}

impl SecurityCheck {
    pub fn passed(&self) -> bool {
        self.outcome == CHECK_PASS
    }
}
