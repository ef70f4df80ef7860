//! Vanta tables
//!
//! One provider per resource. Every table lists through the shared cursor
//! loop in [`list_all`](crate::table::list_all); all but `vanta_evidence`
//! can also look a single item up by `id`.

mod computer;
mod evidence;
mod group;
mod integration;
mod monitor;
mod policy;
mod user;
mod vendor;

pub use computer::ComputerTable;
pub use evidence::EvidenceTable;
pub use group::GroupTable;
pub use integration::IntegrationTable;
pub use monitor::MonitorTable;
pub use policy::PolicyTable;
pub use user::UserTable;
pub use vendor::VendorTable;

use crate::error::Result;
use crate::table::{Column, ColumnType, QueryContext, TableItem, TableProvider};
use crate::types::{JsonObject, JsonValue};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Every table this connector serves
pub fn all() -> Vec<Arc<dyn TableProvider>> {
    vec![
        Arc::new(ComputerTable::new()),
        Arc::new(EvidenceTable::new()),
        Arc::new(GroupTable::new()),
        Arc::new(IntegrationTable::new()),
        Arc::new(MonitorTable::new()),
        Arc::new(PolicyTable::new()),
        Arc::new(UserTable::new()),
        Arc::new(VendorTable::new()),
    ]
}

/// Await a single-item lookup; a 404 means no row
async fn lookup<T, Fut>(table: &str, id: &str, fetch: Fut) -> Result<Option<TableItem>>
where
    T: Serialize,
    Fut: Future<Output = Result<T>>,
{
    match fetch.await {
        Ok(model) => Ok(Some(TableItem::from_model(&model)?)),
        Err(e) if e.is_not_found() => {
            debug!(table, id, "item not found");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Every combination of the values given for the named qual columns.
///
/// `a IN (1, 2) AND b = 3` over `[a, b]` gives `{a:1,b:3}` and `{a:2,b:3}`;
/// columns without a qual are left out.
fn key_sets(ctx: &QueryContext, columns: &[&str]) -> Vec<JsonObject> {
    let mut sets = vec![JsonObject::new()];
    for column in columns {
        let values = ctx.qual_strings(column);
        if values.is_empty() {
            continue;
        }
        sets = sets
            .into_iter()
            .flat_map(|set| {
                values.iter().map(move |value| {
                    let mut next = set.clone();
                    next.insert((*column).to_string(), JsonValue::String(value.clone()));
                    next
                })
            })
            .collect();
    }
    sets
}

fn key_str<'a>(keys: &'a JsonObject, column: &str) -> Option<&'a str> {
    keys.get(column).and_then(JsonValue::as_str)
}

/// Compatibility column carried by every table
fn organization_name() -> Column {
    Column::deprecated(
        "organization_name",
        ColumnType::String,
        "The name of the organization.",
    )
}
