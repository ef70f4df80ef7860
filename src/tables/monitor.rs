//! `vanta_monitor`: automated compliance tests
//!
//! Equality quals on `status`, `category` and `owner_id` are sent as API
//! filters. `framework_id`, `control_id` and `integration_id` exist only as
//! filters: their value in a row is the qual it was listed under.

use super::{key_sets, key_str, lookup, organization_name};
use crate::api::{ListTestEntitiesOptions, ListTestsOptions, VantaClient};
use crate::error::Result;
use crate::model::{TestEntity, ENTITY_STATUS_FAILING};
use crate::pagination::{CursorPaginator, PageRequest};
use crate::table::{
    list_all_keyed, Column, ColumnType, KeyColumn, QueryContext, RowSink, TableDefinition,
    TableItem, TableProvider,
};
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use tracing::debug;

const MAX_PAGE_SIZE: u32 = 100;
const ENTITY_PAGE_SIZE: u32 = 100;

/// Columns that only make sense as filters
const FILTER_COLUMNS: [&str; 3] = ["framework_id", "control_id", "integration_id"];

const FAILING_ENTITIES: &str = "failing_resource_entities";

pub struct MonitorTable {
    definition: TableDefinition,
}

impl MonitorTable {
    pub fn new() -> Self {
        let definition = TableDefinition::new("vanta_monitor", "Vanta Monitor")
            .list_keys(vec![
                KeyColumn::optional("status"),
                KeyColumn::optional("category"),
                KeyColumn::optional("owner_id"),
                KeyColumn::optional("framework_id"),
                KeyColumn::optional("control_id"),
                KeyColumn::optional("integration_id"),
            ])
            .get_by_id()
            .columns(vec![
                Column::string("name", "A human-readable name of the test."),
                Column::string("id", "A unique identifier of the test."),
                Column::string("test_id", "A unique identifier for this test.").from_field("id"),
                Column::string("category", "A high-level categorization of the test."),
                Column::string(
                    "status",
                    "The status of the test: OK, DEACTIVATED, NEEDS_ATTENTION, IN_PROGRESS, INVALID or NOT_APPLICABLE.",
                ),
                Column::string("outcome", "Outcome of the latest test run.").from_field("status"),
                Column::string("description", "A human-readable description of the test."),
                Column::string("failure_description", "What a failure of the test means."),
                Column::string("remediation_description", "How to fix a failing test."),
                Column::timestamp("last_test_run_date", "When the test last ran."),
                Column::timestamp(
                    "latest_flip_date",
                    "The last time the test flipped to a passing or failing state.",
                ),
                Column::timestamp(
                    "latest_flip_time",
                    "The last time the test flipped to a passing or failing state.",
                )
                .from_field("latestFlipDate"),
                Column::string("owner_id", "The user who owns the test.").from_field("owner.id"),
                Column::string("owner_name", "The display name of the test owner.")
                    .from_field("owner.displayName"),
                Column::bool("is_deactivated", "If true, the test is deactivated.")
                    .from_field("deactivatedStatusInfo.isDeactivated"),
                Column::string("remediation_status", "The remediation status of the test.")
                    .from_field("remediationStatusInfo.status"),
                Column::json("integrations", "Integrations the test runs against."),
                Column::json("version", "The version of the test."),
                Column::json("owner", "The owner of the test."),
                Column::json("deactivated_status_info", "Metadata about test deactivation."),
                Column::json("remediation_status_info", "Specifies the remediation information."),
                Column::string("framework_id", "Filter tests by framework.").from_qual(),
                Column::string("control_id", "Filter tests by control.").from_qual(),
                Column::string("integration_id", "Filter tests by integration.").from_qual(),
                Column::json(FAILING_ENTITIES, "Resources currently failing the test.")
                    .hydrated(),
                Column::deprecated(
                    "compliance_status",
                    ColumnType::String,
                    "The compliance status of the test.",
                ),
                Column::deprecated("services", ColumnType::Json, "A list of services."),
                Column::deprecated(
                    "assignees",
                    ColumnType::Json,
                    "A list of users assigned as owner for this test.",
                ),
                Column::deprecated(
                    "controls",
                    ColumnType::Json,
                    "A list of controls being checked during the test.",
                ),
                organization_name(),
            ]);
        Self { definition }
    }

    /// Fetch every failing entity of a test
    async fn failing_entities(
        &self,
        client: &VantaClient,
        test_id: &str,
    ) -> Result<Vec<TestEntity>> {
        let paginator = CursorPaginator::new(FAILING_ENTITIES, ENTITY_PAGE_SIZE);
        let mut entities = Vec::new();
        paginator
            .run(
                move |page: PageRequest| {
                    let options = ListTestEntitiesOptions {
                        page,
                        entity_status: Some(ENTITY_STATUS_FAILING.to_string()),
                    };
                    async move { client.list_test_entities(test_id, &options).await }
                },
                &mut |data: Vec<TestEntity>| {
                    entities.extend(data);
                    Ok(true)
                },
            )
            .await?;
        debug!(test_id, count = entities.len(), "fetched failing entities");
        Ok(entities)
    }
}

impl Default for MonitorTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Build list options from the quals and one combination of filter-only keys
fn list_options(ctx: &QueryContext, keys: &JsonObject) -> ListTestsOptions {
    ListTestsOptions {
        status_filter: ctx.equals_qual_string("status"),
        category_filter: ctx.equals_qual_string("category"),
        owner_filter: ctx.equals_qual_string("owner_id"),
        framework_filter: key_str(keys, "framework_id").map(String::from),
        control_filter: key_str(keys, "control_id").map(String::from),
        integration_filter: key_str(keys, "integration_id").map(String::from),
        ..Default::default()
    }
}

#[async_trait]
impl TableProvider for MonitorTable {
    fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    async fn list(
        &self,
        client: &VantaClient,
        ctx: &QueryContext,
        sink: &mut RowSink<'_>,
    ) -> Result<()> {
        for keys in key_sets(ctx, &FILTER_COLUMNS) {
            let base = list_options(ctx, &keys);
            list_all_keyed(self, client, ctx, sink, MAX_PAGE_SIZE, keys, move |page| {
                let options = ListTestsOptions {
                    page,
                    ..base.clone()
                };
                async move { client.list_tests(&options).await }
            })
            .await?;

            if sink.is_satisfied() {
                break;
            }
        }
        Ok(())
    }

    async fn get(
        &self,
        client: &VantaClient,
        _ctx: &QueryContext,
        id: &str,
    ) -> Result<Option<TableItem>> {
        lookup(self.definition.name, id, client.get_test(id)).await
    }

    async fn hydrate(
        &self,
        client: &VantaClient,
        ctx: &QueryContext,
        item: TableItem,
    ) -> Result<TableItem> {
        if !ctx.needs(FAILING_ENTITIES) {
            return Ok(item);
        }
        let Some(test_id) = item.value.get("id").and_then(JsonValue::as_str) else {
            return Ok(item);
        };
        let entities = self.failing_entities(client, test_id).await?;
        let value = serde_json::to_value(entities)?;
        Ok(item.with(FAILING_ENTITIES, value))
    }
}
