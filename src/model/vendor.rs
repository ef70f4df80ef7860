use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A third-party vendor under vendor risk management
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub website_url: String,
    pub account_manager_name: Option<String>,
    pub account_manager_email: Option<String>,
    pub services_provided: Option<String>,
    pub additional_notes: Option<String>,
    pub security_owner_user_id: String,
    pub business_owner_user_id: String,
    pub contract_start_date: Option<DateTime<Utc>>,
    pub contract_renewal_date: Option<DateTime<Utc>>,
    pub contract_termination_date: Option<DateTime<Utc>>,
    pub next_security_review_due_date: Option<DateTime<Utc>>,
    pub last_security_review_completion_date: Option<DateTime<Utc>>,
    pub is_visible_to_auditors: bool,
    pub is_risk_auto_scored: bool,
    pub category: Option<VendorCategory>,
    pub auth_details: Option<VendorAuthDetails>,
    pub risk_attribute_ids: Vec<String>,
    pub status: String,
    pub inherent_risk_level: String,
    pub residual_risk_level: String,
    pub vendor_headquarters: Option<String>,
    pub contract_amount: Option<f64>,
    pub custom_fields: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VendorCategory {
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VendorAuthDetails {
    pub method: String,
    #[serde(rename = "passwordMFA")]
    pub password_mfa: Option<bool>,
    pub password_requires_number: Option<bool>,
    pub password_requires_symbol: Option<bool>,
    pub password_minimum_length: Option<i64>,
}
