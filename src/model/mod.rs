//! Typed Vanta API resources
//!
//! Field names follow the API's camelCase JSON. Every field defaults when
//! absent so a partial object still decodes.

mod computer;
mod evidence;
mod group;
mod integration;
mod monitor;
mod people;
mod policy;
mod vendor;

pub use computer::{Computer, ComputerOwner, OperatingSystem, SecurityCheck};
pub use evidence::{Evidence, RelatedControl};
pub use group::Group;
pub use integration::{Integration, IntegrationConnection};
pub use monitor::{
    Test, TestDeactivatedStatus, TestEntity, TestOwner, TestRemediationStatus, TestVersion,
    ENTITY_STATUS_FAILING,
};
pub use people::{
    AcceptPoliciesTask, AcceptedPolicy, Employment, EmploymentStatus, Name, Person, SourceInfo,
    Sources, TaskDetail, TasksDetails, TasksSummary,
};
pub use policy::{Policy, PolicyLatestVersion};
pub use vendor::{Vendor, VendorAuthDetails, VendorCategory};
