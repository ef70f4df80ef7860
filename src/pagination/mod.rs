//! Pagination module
//!
//! # Overview
//!
//! Vanta lists are cursor paginated. Each response carries a `pageInfo`
//! block; the next page is requested by sending its `endCursor` back as
//! `pageCursor`. Every resource shares the same loop in [`CursorPaginator`].

mod strategies;
mod types;

pub use strategies::{CursorPaginator, PageConsumer};
pub use types::{
    page_size_for, ListOutput, NextPage, PageInfo, PageRequest, PaginationState, Results,
    PAGE_CURSOR_PARAM, PAGE_SIZE_PARAM,
};

#[cfg(test)]
mod tests;
