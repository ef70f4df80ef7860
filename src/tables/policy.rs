//! `vanta_policy`

use super::{lookup, organization_name};
use crate::api::VantaClient;
use crate::error::Result;
use crate::table::{
    list_all, Column, ColumnType, QueryContext, RowSink, TableDefinition, TableItem, TableProvider,
};
use async_trait::async_trait;

const MAX_PAGE_SIZE: u32 = 100;

pub struct PolicyTable {
    definition: TableDefinition,
}

impl PolicyTable {
    pub fn new() -> Self {
        let definition = TableDefinition::new("vanta_policy", "Vanta Policy")
            .get_by_id()
            .columns(vec![
                Column::string("id", "A unique identifier of the policy."),
                Column::string("name", "The name of the policy."),
                Column::string("title", "The title of the policy.").from_field("name"),
                Column::string("description", "A human-readable description of the policy."),
                Column::string("status", "The current status of the policy."),
                Column::timestamp("approved_at_date", "The time when the policy was approved."),
                Column::timestamp("approved_at", "The time when the policy was approved.")
                    .from_field("approvedAtDate"),
                Column::string(
                    "latest_version_status",
                    "The status of the latest version of the policy.",
                )
                .from_field("latestVersion.status"),
                Column::json("latest_version", "The latest version of the policy."),
                Column::deprecated("policy_type", ColumnType::String, "The type of the policy."),
                Column::deprecated(
                    "num_users",
                    ColumnType::Int,
                    "The number of users assigned with the policy.",
                ),
                Column::deprecated(
                    "approver",
                    ColumnType::Json,
                    "The Vanta user who approved the policy.",
                ),
                Column::deprecated("standards", ColumnType::Json, "A list of policy standards."),
                Column::deprecated(
                    "uploaded_doc",
                    ColumnType::Json,
                    "Specifies the docs uploaded for the policy.",
                ),
                organization_name(),
            ]);
        Self { definition }
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableProvider for PolicyTable {
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
            client.list_policies(&page).await
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
        lookup(self.definition.name, id, client.get_policy(id)).await
    }
}
