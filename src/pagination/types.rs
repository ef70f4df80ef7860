//! Pagination types
//!
//! Every Vanta list endpoint wraps its rows in the same envelope:
//!
//! ```json
//! { "results": { "pageInfo": { "hasNextPage": true, "endCursor": "..." }, "data": [] } }
//! ```

use crate::http::RequestConfig;
use serde::{Deserialize, Serialize};

/// Query parameter carrying the page size
pub const PAGE_SIZE_PARAM: &str = "pageSize";

/// Query parameter carrying the cursor of the page to fetch
pub const PAGE_CURSOR_PARAM: &str = "pageCursor";

/// Cursor metadata returned with every page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Results<T> {
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for Results<T> {
    fn default() -> Self {
        Self {
            page_info: PageInfo::default(),
            data: Vec::new(),
        }
    }
}

/// Response body of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOutput<T> {
    #[serde(default = "Results::default")]
    pub results: Results<T>,
}

impl<T> ListOutput<T> {
    /// Build a page from rows and cursor info
    pub fn new(data: Vec<T>, page_info: PageInfo) -> Self {
        Self {
            results: Results { page_info, data },
        }
    }

    /// Cursor metadata of this page
    pub fn page_info(&self) -> &PageInfo {
        &self.results.page_info
    }

    /// Consume the page, returning its rows
    pub fn into_data(self) -> Vec<T> {
        self.results.data
    }
}

/// Page size and cursor for one list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Rows per page; the API default applies when unset
    pub page_size: Option<u32>,
    /// Cursor from the previous page's `endCursor`
    pub cursor: Option<String>,
}

impl PageRequest {
    /// First page with the given size
    pub fn first(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            cursor: None,
        }
    }

    /// Add `pageSize` / `pageCursor` to a request, omitting unset values
    #[must_use]
    pub fn apply(&self, config: RequestConfig) -> RequestConfig {
        config
            .query_opt(PAGE_SIZE_PARAM, self.page_size.map(|s| s.to_string()))
            .query_opt(PAGE_CURSOR_PARAM, self.cursor.clone())
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available, starting at this cursor
    Continue { cursor: String },
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Cursor of the next page to fetch
    pub cursor: Option<String>,
    /// Pages fetched so far
    pub pages: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }

    /// Record a fetched page
    pub fn add_page(&mut self, records: u64) {
        self.pages += 1;
        self.total_fetched += records;
    }
}

/// Page size for a query: the endpoint maximum unless the row limit is smaller
pub fn page_size_for(limit: Option<u64>, max_page_size: u32) -> u32 {
    match limit {
        Some(limit) if limit < u64::from(max_page_size) => (limit as u32).max(1),
        _ => max_page_size,
    }
}
