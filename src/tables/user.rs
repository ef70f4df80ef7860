//! `vanta_user`: people in the Vanta organization

use super::{lookup, organization_name};
use crate::api::VantaClient;
use crate::error::Result;
use crate::model::EmploymentStatus;
use crate::table::{
    list_all, lookup_path, Column, ColumnType, KeyColumn, QueryContext, RowSink, TableDefinition,
    TableItem, TableProvider,
};
use crate::types::JsonValue;
use async_trait::async_trait;

const MAX_PAGE_SIZE: u32 = 100;

pub struct UserTable {
    definition: TableDefinition,
}

impl UserTable {
    pub fn new() -> Self {
        let definition = TableDefinition::new("vanta_user", "Vanta User")
            .list_keys(vec![KeyColumn::optional("employment_status")])
            .get_by_id()
            .columns(vec![
                Column::string("display_name", "The display name of the user.")
                    .from_field("name.display"),
                Column::string("id", "A unique identifier of the user."),
                Column::string("email", "The email of the user.").from_field("emailAddress"),
                Column::string("employment_status", "The current employment status of the user.")
                    .from_field("employment.status"),
                Column::string("job_title", "The job title of the user.")
                    .from_field("employment.jobTitle"),
                Column::string("task_status", "The security task status of the user.")
                    .from_field("tasksSummary.status"),
                Column::timestamp("task_due_date", "When the user's security tasks are due.")
                    .from_field("tasksSummary.dueDate"),
                Column::timestamp("start_date", "The employment start date of the user.")
                    .from_field("employment.startDate"),
                Column::timestamp("end_date", "The employment end date of the user.")
                    .from_field("employment.endDate"),
                Column::string("family_name", "The family name of the user.")
                    .from_field("name.last"),
                Column::string("given_name", "The given name of the user.")
                    .from_field("name.first"),
                Column::bool("is_active", "If true, the user is active.").derived(is_active),
                Column::json("group_ids", "List of group IDs the user belongs to."),
                Column::json(
                    "employment",
                    "Employment information including job title and dates.",
                ),
                Column::json(
                    "name",
                    "Name information including display, first, and last name.",
                ),
                Column::json("sources", "Information about data sources for this user."),
                Column::json("tasks_summary", "Summary of security task completion status."),
                Column::deprecated(
                    "is_from_scan",
                    ColumnType::Bool,
                    "If true, the user was discovered by the security scan.",
                ),
                Column::deprecated(
                    "needs_employee_digest_reminder",
                    ColumnType::Bool,
                    "If true, user will get an email digest of their incomplete security tasks.",
                ),
                Column::deprecated(
                    "is_not_human",
                    ColumnType::Bool,
                    "If true, the resource is not a human.",
                ),
                organization_name(),
            ]);
        Self { definition }
    }
}

impl Default for UserTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A person is active while their employment status is `CURRENT`
fn is_active(item: &JsonValue) -> JsonValue {
    let status = lookup_path(item, "employment.status");
    JsonValue::Bool(status.as_str() == Some(EmploymentStatus::Current.as_str()))
}

#[async_trait]
impl TableProvider for UserTable {
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
            client.list_people(&page).await
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
        lookup(self.definition.name, id, client.get_person(id)).await
    }
}
