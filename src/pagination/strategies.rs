//! Cursor pagination driver
//!
//! Fetches pages until `hasNextPage` is false, the cursor runs dry, or the
//! consumer signals it has enough rows.

use super::types::{ListOutput, NextPage, PageInfo, PageRequest, PaginationState};
use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;
use tracing::debug;

/// Cursor-based pagination over `pageSize` / `pageCursor`
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Rows requested per page
    pub page_size: u32,
    /// Label used in log lines
    pub label: String,
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new(label: impl Into<String>, page_size: u32) -> Self {
        Self {
            page_size,
            label: label.into(),
        }
    }

    /// Request for the page the state points at
    pub fn request(&self, state: &PaginationState) -> PageRequest {
        PageRequest {
            page_size: Some(self.page_size),
            cursor: state.cursor.clone(),
        }
    }

    /// Inspect a page's cursor info and decide whether to continue
    pub fn process_page(
        &self,
        page_info: &PageInfo,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_page(records_count as u64);

        debug!(
            table = %self.label,
            page = state.pages,
            rows = records_count,
            has_next_page = page_info.has_next_page,
            end_cursor = page_info.end_cursor.as_deref().unwrap_or(""),
            "fetched page"
        );

        if !page_info.has_next_page {
            state.mark_done();
            return NextPage::Done;
        }

        match page_info.end_cursor.as_deref() {
            Some(cursor) if !cursor.is_empty() => {
                state.set_cursor(cursor.to_string());
                NextPage::Continue {
                    cursor: cursor.to_string(),
                }
            }
            _ => {
                state.mark_done();
                NextPage::Done
            }
        }
    }

    /// Drive the fetch loop.
    ///
    /// `fetch` issues one list call; `consumer` receives each page's rows and
    /// returns `false` once it wants no more.
    pub async fn run<T, F, Fut, C>(&self, mut fetch: F, consumer: &mut C) -> Result<PaginationState>
    where
        T: Send + 'static,
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<ListOutput<T>>>,
        C: PageConsumer<T> + ?Sized,
    {
        let mut state = PaginationState::new();

        while !state.done {
            let page = fetch(self.request(&state)).await?;
            let next = self.process_page(page.page_info(), page.results.data.len(), &mut state);

            let wants_more = consumer.consume(page.into_data()).await?;
            if !wants_more && next.is_continue() {
                debug!(table = %self.label, "row limit reached, stopping pagination");
                state.mark_done();
            }
        }

        Ok(state)
    }
}

/// Receives the rows of each fetched page
#[async_trait]
pub trait PageConsumer<T: Send + 'static>: Send {
    /// Handle one page; return `false` to stop paginating
    async fn consume(&mut self, page: Vec<T>) -> Result<bool>;
}

#[async_trait]
impl<T, F> PageConsumer<T> for F
where
    T: Send + 'static,
    F: FnMut(Vec<T>) -> Result<bool> + Send,
{
    async fn consume(&mut self, page: Vec<T>) -> Result<bool> {
        self(page)
    }
}
