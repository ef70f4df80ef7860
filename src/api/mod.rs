//! Vanta API client
//!
//! One method per REST endpoint. List methods return a single page
//! ([`ListOutput`](crate::pagination::ListOutput)); callers page through with
//! [`CursorPaginator`](crate::pagination::CursorPaginator).

mod client;
mod options;

pub use client::VantaClient;
pub use options::{ListEvidenceOptions, ListTestEntitiesOptions, ListTestsOptions};

#[cfg(test)]
mod tests;
