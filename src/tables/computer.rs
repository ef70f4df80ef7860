//! `vanta_computer`: workstations monitored by the Vanta agent or an MDM

use super::{lookup, organization_name};
use crate::api::VantaClient;
use crate::error::Result;
use crate::model::SecurityCheck;
use crate::table::{
    list_all, lookup_path, Column, ColumnType, QueryContext, RowSink, TableDefinition, TableItem,
    TableProvider,
};
use crate::types::JsonValue;
use async_trait::async_trait;
use serde::Deserialize;

const MAX_PAGE_SIZE: u32 = 100;

pub struct ComputerTable {
    definition: TableDefinition,
}

impl ComputerTable {
    pub fn new() -> Self {
        let definition = TableDefinition::new("vanta_computer", "Vanta Computer")
            .get_by_id()
            .columns(vec![
                Column::string("id", "A unique Vanta generated identifier of the computer."),
                Column::string("integration_id", "The integration reporting the computer."),
                Column::string("serial_number", "The serial number of the workstation."),
                Column::string("udid", "The unique device identifier of the workstation."),
                Column::timestamp(
                    "last_check_date",
                    "The time when the workstation was last checked.",
                ),
                Column::string("os_type", "The operating system of the workstation.")
                    .from_field("operatingSystem.type"),
                Column::string("os_version", "The OS version of the workstation.")
                    .from_field("operatingSystem.version"),
                Column::string("owner_id", "A unique identifier of the owner of the workstation.")
                    .from_field("owner.id"),
                Column::string("owner_name", "The name of the workstation owner.")
                    .from_field("owner.displayName"),
                Column::string("owner_email", "The email address of the workstation owner.")
                    .from_field("owner.emailAddress"),
                Column::string("screenlock_outcome", "Outcome of the screen lock check.")
                    .from_field("screenlock.outcome"),
                Column::string(
                    "disk_encryption_outcome",
                    "Outcome of the disk encryption check.",
                )
                .from_field("diskEncryption.outcome"),
                Column::string(
                    "password_manager_outcome",
                    "Outcome of the password manager check.",
                )
                .from_field("passwordManager.outcome"),
                Column::string(
                    "antivirus_installation_outcome",
                    "Outcome of the antivirus installation check.",
                )
                .from_field("antivirusInstallation.outcome"),
                Column::bool(
                    "has_screen_lock",
                    "If true, the workstation has a screen lock configured.",
                )
                .derived(has_screen_lock),
                Column::bool(
                    "is_encrypted",
                    "If true, the workstation's hard drive is encrypted.",
                )
                .derived(is_encrypted),
                Column::bool(
                    "is_password_manager_installed",
                    "If true, a password manager is installed in the workstation.",
                )
                .derived(is_password_manager_installed),
                Column::json("operating_system", "Operating system details."),
                Column::json("owner", "The owner of the workstation."),
                Column::deprecated(
                    "agent_version",
                    ColumnType::String,
                    "The Vanta agent version.",
                ),
                Column::deprecated(
                    "hostname",
                    ColumnType::String,
                    "The hostname of the workstation.",
                ),
                Column::deprecated(
                    "last_ping",
                    ColumnType::Timestamp,
                    "The time when the workstation was last scanned by the Vanta agent.",
                ),
                Column::deprecated(
                    "installed_av_programs",
                    ColumnType::Json,
                    "A list of anti-virus programs installed in the workstation.",
                ),
                organization_name(),
            ]);
        Self { definition }
    }
}

impl Default for ComputerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a security check passed; null when the check was not reported
fn check_passed(item: &JsonValue, check: &str) -> JsonValue {
    match Option::<SecurityCheck>::deserialize(&lookup_path(item, check)) {
        Ok(Some(result)) if !result.outcome.is_empty() => JsonValue::Bool(result.passed()),
        _ => JsonValue::Null,
    }
}

fn has_screen_lock(item: &JsonValue) -> JsonValue {
    check_passed(item, "screenlock")
}

fn is_encrypted(item: &JsonValue) -> JsonValue {
    check_passed(item, "diskEncryption")
}

fn is_password_manager_installed(item: &JsonValue) -> JsonValue {
    check_passed(item, "passwordManager")
}

#[async_trait]
impl TableProvider for ComputerTable {
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
            client.list_computers(&page).await
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
        lookup(self.definition.name, id, client.get_computer(id)).await
    }
}
