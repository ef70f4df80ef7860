//! `vanta_evidence`: evidence collected for an audit
//!
//! Listing is scoped to an audit, so `audit_id` is a required qual.

use super::{key_sets, key_str, organization_name};
use crate::api::{ListEvidenceOptions, VantaClient};
use crate::error::{Error, Result};
use crate::model::Evidence;
use crate::table::{
    list_all_keyed, Column, ColumnType, KeyColumn, QueryContext, RowSink, TableDefinition,
    TableProvider,
};
use crate::types::JsonValue;
use async_trait::async_trait;
use serde::Deserialize;

const MAX_PAGE_SIZE: u32 = 50;
const AUDIT_ID: &str = "audit_id";

pub struct EvidenceTable {
    definition: TableDefinition,
}

impl EvidenceTable {
    pub fn new() -> Self {
        let definition = TableDefinition::new("vanta_evidence", "Vanta Evidence")
            .list_keys(vec![KeyColumn::required(AUDIT_ID)])
            .columns(vec![
                Column::string(AUDIT_ID, "The audit ID (required parameter).").from_qual(),
                Column::string("id", "Vanta internal reference to evidence."),
                Column::string(
                    "external_id",
                    "This is a static UUID to map Audit Firm controls to Vanta controls.",
                ),
                Column::string("status", "Vanta internal statuses for audit evidence."),
                Column::string(
                    "name",
                    "Mutable name for evidence. Not guaranteed to be unique.",
                ),
                Column::timestamp("deletion_date", "The date this Audit Evidence was deleted."),
                Column::timestamp("creation_date", "The date this Audit Evidence was created."),
                Column::timestamp(
                    "status_updated_date",
                    "Point in time that status was last updated.",
                ),
                Column::string(
                    "test_status",
                    "The outcome of the automated test run, for Test-type evidence.",
                ),
                Column::string("evidence_type", "The type of Audit Evidence."),
                Column::string("evidence_id", "Unique identifier for evidence."),
                Column::string(
                    "description",
                    "The description for the evidence. It will be set to null if the evidence is deleted.",
                ),
                Column::json("related_controls", "The controls associated to this evidence."),
                Column::json(
                    "related_control_names",
                    "Names of controls associated to this evidence.",
                )
                .derived(related_control_names),
                Column::deprecated("title", ColumnType::String, "The title of the document."),
                Column::deprecated(
                    "evidence_request_id",
                    ColumnType::String,
                    "A unique identifier for this evidence request.",
                ),
                Column::deprecated(
                    "category",
                    ColumnType::String,
                    "Specifies the category of the evidence request.",
                ),
                Column::deprecated(
                    "uid",
                    ColumnType::String,
                    "An identifier that is unique across all of Vanta.",
                ),
                Column::deprecated(
                    "restricted",
                    ColumnType::Bool,
                    "If true, access to the contents of the evidence documents is restricted.",
                ),
                Column::deprecated(
                    "renewal_metadata",
                    ColumnType::Json,
                    "Information on the renewal cadence of the evidence request.",
                ),
                organization_name(),
            ]);
        Self { definition }
    }
}

impl Default for EvidenceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-empty names of the related controls
fn related_control_names(item: &JsonValue) -> JsonValue {
    let names = Evidence::deserialize(item)
        .map(|evidence| evidence.related_control_names())
        .unwrap_or_default();
    JsonValue::from(names)
}

#[async_trait]
impl TableProvider for EvidenceTable {
    fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    async fn list(
        &self,
        client: &VantaClient,
        ctx: &QueryContext,
        sink: &mut RowSink<'_>,
    ) -> Result<()> {
        for keys in key_sets(ctx, &[AUDIT_ID]) {
            let audit_id = key_str(&keys, AUDIT_ID)
                .ok_or_else(|| Error::MissingRequiredQual {
                    table: self.definition.name.to_string(),
                    column: AUDIT_ID.to_string(),
                })?
                .to_string();

            list_all_keyed(self, client, ctx, sink, MAX_PAGE_SIZE, keys, move |page| {
                let audit_id = audit_id.clone();
                async move {
                    client
                        .list_evidence(&audit_id, &ListEvidenceOptions::from(page))
                        .await
                }
            })
            .await?;

            if sink.is_satisfied() {
                break;
            }
        }
        Ok(())
    }
}
