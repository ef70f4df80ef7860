//! Per-endpoint list options

use crate::http::RequestConfig;
use crate::pagination::PageRequest;

/// Filters accepted by `GET /v1/tests`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTestsOptions {
    pub page: PageRequest,
    /// `OK`, `DEACTIVATED`, `NEEDS_ATTENTION`, `IN_PROGRESS`, `INVALID` or `NOT_APPLICABLE`
    pub status_filter: Option<String>,
    pub framework_filter: Option<String>,
    pub integration_filter: Option<String>,
    pub control_filter: Option<String>,
    pub owner_filter: Option<String>,
    pub category_filter: Option<String>,
    pub is_in_rollout: Option<bool>,
}

impl ListTestsOptions {
    pub(crate) fn to_request(&self) -> RequestConfig {
        self.page
            .apply(RequestConfig::new())
            .query_opt("statusFilter", self.status_filter.clone())
            .query_opt("frameworkFilter", self.framework_filter.clone())
            .query_opt("integrationFilter", self.integration_filter.clone())
            .query_opt("controlFilter", self.control_filter.clone())
            .query_opt("ownerFilter", self.owner_filter.clone())
            .query_opt("categoryFilter", self.category_filter.clone())
            .query_opt("isInRollout", self.is_in_rollout.map(|b| b.to_string()))
    }
}

/// Filters accepted by `GET /v1/tests/{id}/entities`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTestEntitiesOptions {
    pub page: PageRequest,
    /// e.g. `FAILING` or `DEACTIVATED`
    pub entity_status: Option<String>,
}

impl ListTestEntitiesOptions {
    pub(crate) fn to_request(&self) -> RequestConfig {
        self.page
            .apply(RequestConfig::new())
            .query_opt("entityStatus", self.entity_status.clone())
    }
}

/// Paging for `GET /v1/audits/{id}/evidence`
///
/// The audit evidence endpoint names its paging parameters `limit` and
/// `cursor` rather than `pageSize` / `pageCursor`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEvidenceOptions {
    pub page: PageRequest,
}

impl From<PageRequest> for ListEvidenceOptions {
    fn from(page: PageRequest) -> Self {
        Self { page }
    }
}

impl ListEvidenceOptions {
    pub(crate) fn to_request(&self) -> RequestConfig {
        RequestConfig::new()
            .query_opt("limit", self.page.page_size.map(|s| s.to_string()))
            .query_opt("cursor", self.page.cursor.clone())
    }
}
