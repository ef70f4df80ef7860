//! `vanta_vendor`
//!
//! `url`, `severity` and `latest_security_review_completed_at` keep the
//! names older queries used for `website_url`, `inherent_risk_level` and
//! `last_security_review_completion_date`.

use super::{lookup, organization_name};
use crate::api::VantaClient;
use crate::error::Result;
use crate::table::{
    list_all, Column, ColumnType, KeyColumn, QueryContext, RowSink, TableDefinition, TableItem,
    TableProvider,
};
use async_trait::async_trait;

const MAX_PAGE_SIZE: u32 = 100;

pub struct VendorTable {
    definition: TableDefinition,
}

impl VendorTable {
    pub fn new() -> Self {
        let definition = TableDefinition::new("vanta_vendor", "Vanta Vendor")
            .list_keys(vec![KeyColumn::optional("severity")])
            .get_by_id()
            .columns(vec![
                Column::string("name", "The display name of the vendor."),
                Column::string("id", "A unique identifier of the vendor."),
                Column::string("website_url", "The website of the vendor."),
                Column::string("url", "The URL of the vendor tool.").from_field("websiteUrl"),
                Column::string("status", "The management status of the vendor."),
                Column::string("category", "The category of the vendor.")
                    .from_field("category.displayName"),
                Column::string("inherent_risk_level", "The inherent risk level of the vendor."),
                Column::string("residual_risk_level", "The residual risk level of the vendor."),
                Column::string("severity", "The risk level of the vendor.")
                    .from_field("inherentRiskLevel"),
                Column::string("account_manager_name", "The vendor's account manager."),
                Column::string(
                    "account_manager_email",
                    "The email of the vendor's account manager.",
                ),
                Column::string("services_provided", "Services the vendor provides."),
                Column::string("additional_notes", "Free-form notes about the vendor."),
                Column::string("vendor_headquarters", "Where the vendor is headquartered."),
                Column::string(
                    "security_owner_user_id",
                    "The user responsible for the vendor's security review.",
                ),
                Column::string(
                    "business_owner_user_id",
                    "The user who owns the business relationship.",
                ),
                Column::timestamp("contract_start_date", "When the contract started."),
                Column::timestamp("contract_renewal_date", "When the contract renews."),
                Column::timestamp("contract_termination_date", "When the contract ends."),
                Column::double("contract_amount", "The contract value."),
                Column::timestamp(
                    "next_security_review_due_date",
                    "When the next security review is due.",
                ),
                Column::timestamp(
                    "last_security_review_completion_date",
                    "When the last security review was completed.",
                ),
                Column::timestamp(
                    "latest_security_review_completed_at",
                    "The time when the security assessment was last reviewed.",
                )
                .from_field("lastSecurityReviewCompletionDate"),
                Column::bool("is_visible_to_auditors", "If true, auditors can see the vendor."),
                Column::bool(
                    "is_risk_auto_scored",
                    "If true, the vendor risk level is scored automatically.",
                ),
                Column::json("auth_details", "How users authenticate to the vendor."),
                Column::json("risk_attribute_ids", "Risk attributes assigned to the vendor."),
                Column::json("custom_fields", "Custom field values."),
                Column::deprecated(
                    "vendor_risk_locked",
                    ColumnType::Bool,
                    "If true, the vendor risk level is locked.",
                ),
                Column::deprecated("owner", ColumnType::Json, "The owner of the vendor."),
                Column::deprecated(
                    "risk_profile",
                    ColumnType::Json,
                    "Specifies the risk profile of the vendor.",
                ),
                organization_name(),
            ]);
        Self { definition }
    }
}

impl Default for VendorTable {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableProvider for VendorTable {
    fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    async fn list(
        &self,
        client: &VantaClient,
        ctx: &QueryContext,
        sink: &mut RowSink<'_>,
    ) -> Result<()> {
        list_all(self, client, ctx, sink, MAX_PAGE_SIZE, move |page| async move {
            client.list_vendors(&page).await
        })
        .await?;
        Ok(())
    }

    async fn get(
        &self,
        client: &VantaClient,
        _ctx: &QueryContext,
        id: &str,
    ) -> Result<Option<TableItem>> {
        lookup(self.definition.name, id, client.get_vendor(id)).await
    }
}
