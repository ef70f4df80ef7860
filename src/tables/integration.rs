//! `vanta_integration`: connected third-party services

use super::{lookup, organization_name};
use crate::api::VantaClient;
use crate::error::Result;
use crate::table::{
    list_all, Column, ColumnType, QueryContext, RowSink, TableDefinition, TableItem, TableProvider,
};
use async_trait::async_trait;

const MAX_PAGE_SIZE: u32 = 50;

pub struct IntegrationTable {
    definition: TableDefinition,
}

impl IntegrationTable {
    pub fn new() -> Self {
        let definition = TableDefinition::new("vanta_integration", "Vanta Integration")
            .get_by_id()
            .columns(vec![
                Column::string("display_name", "The display name of the integration."),
                Column::string("id", "A unique identifier of the integration.")
                    .from_field("integrationId"),
                Column::json("resource_kinds", "Resource kinds the integration can scope."),
                Column::json(
                    "scopable_resource",
                    "A list of scopable resources (resource kinds).",
                )
                .from_field("resourceKinds"),
                Column::json("connections", "A list of connections for this integration."),
                Column::deprecated(
                    "description",
                    ColumnType::String,
                    "A human-readable description of the integration.",
                ),
                Column::deprecated(
                    "application_url",
                    ColumnType::String,
                    "The URL of the application.",
                ),
                Column::deprecated(
                    "installation_url",
                    ColumnType::String,
                    "The installation URL of the integration.",
                ),
                Column::deprecated(
                    "logo_slug_id",
                    ColumnType::String,
                    "The slug of the logo used for the integration.",
                ),
                Column::deprecated(
                    "credentials",
                    ColumnType::Json,
                    "The credential metadata of the integration.",
                ),
                Column::deprecated(
                    "integration_categories",
                    ColumnType::Json,
                    "A list of integration categories.",
                ),
                Column::deprecated(
                    "service_categories",
                    ColumnType::Json,
                    "A list of service categories.",
                ),
                Column::deprecated(
                    "tests",
                    ColumnType::Json,
                    "A list of tests defined for monitoring the integrations.",
                ),
                organization_name(),
            ]);
        Self { definition }
    }
}

impl Default for IntegrationTable {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableProvider for IntegrationTable {
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
            client.list_integrations(&page).await
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
        lookup(self.definition.name, id, client.get_integration(id)).await
    }
}
