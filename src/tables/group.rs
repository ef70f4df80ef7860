//! `vanta_group`

use super::{lookup, organization_name};
use crate::api::VantaClient;
use crate::error::Result;
use crate::table::{
    list_all, Column, ColumnType, QueryContext, RowSink, TableDefinition, TableItem, TableProvider,
};
use async_trait::async_trait;

const MAX_PAGE_SIZE: u32 = 100;

pub struct GroupTable {
    definition: TableDefinition,
}

impl GroupTable {
    pub fn new() -> Self {
        let definition = TableDefinition::new("vanta_group", "Vanta Group")
            .get_by_id()
            .columns(vec![
                Column::string("name", "The name of the group."),
                Column::string("id", "A unique identifier of the group."),
                Column::timestamp("creation_date", "The creation date of the group."),
                Column::deprecated(
                    "checklist",
                    ColumnType::Json,
                    "Describes the security requirements for the group.",
                ),
                Column::deprecated(
                    "embedded_idp_group",
                    ColumnType::Json,
                    "A list of embedded IDP group.",
                ),
                organization_name(),
            ]);
        Self { definition }
    }
}

impl Default for GroupTable {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableProvider for GroupTable {
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
            client.list_groups(&page).await
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
        lookup(self.definition.name, id, client.get_group(id)).await
    }
}
