//! Tests for pagination module

use super::*;
use crate::error::Error;
use crate::http::RequestConfig;
use serde_json::json;
use std::collections::VecDeque;
use test_case::test_case;

fn page(data: Vec<u32>, has_next: bool, cursor: Option<&str>) -> ListOutput<u32> {
    ListOutput::new(
        data,
        PageInfo {
            has_next_page: has_next,
            end_cursor: cursor.map(String::from),
            ..PageInfo::default()
        },
    )
}

// ============================================================================
// Envelope Tests
// ============================================================================

#[test]
fn test_list_output_deserialize() {
    let body = json!({
        "results": {
            "pageInfo": {
                "hasNextPage": true,
                "hasPreviousPage": false,
                "startCursor": "a",
                "endCursor": "b"
            },
            "data": [{"id": "g1"}, {"id": "g2"}]
        }
    });

    let output: ListOutput<serde_json::Value> = serde_json::from_value(body).unwrap();
    assert!(output.page_info().has_next_page);
    assert_eq!(output.page_info().end_cursor.as_deref(), Some("b"));
    assert_eq!(output.into_data().len(), 2);
}

#[test]
fn test_list_output_missing_fields_default() {
    let output: ListOutput<serde_json::Value> = serde_json::from_value(json!({})).unwrap();
    assert!(!output.page_info().has_next_page);
    assert!(output.into_data().is_empty());

    let output: ListOutput<serde_json::Value> =
        serde_json::from_value(json!({"results": {"data": [1]}})).unwrap();
    assert_eq!(output.page_info(), &PageInfo::default());
}

// ============================================================================
// PageRequest Tests
// ============================================================================

#[test]
fn test_page_request_params() {
    let request = PageRequest {
        page_size: Some(50),
        cursor: Some("next".into()),
    };
    let config = request.apply(RequestConfig::new());
    assert_eq!(config.query.get(PAGE_SIZE_PARAM), Some(&"50".to_string()));
    assert_eq!(config.query.get(PAGE_CURSOR_PARAM), Some(&"next".to_string()));
}

#[test]
fn test_page_request_omits_unset_and_empty() {
    let config = PageRequest::default().apply(RequestConfig::new());
    assert!(config.query.is_empty());

    let config = PageRequest {
        page_size: Some(10),
        cursor: Some(String::new()),
    }
    .apply(RequestConfig::new());
    assert!(!config.query.contains_key(PAGE_CURSOR_PARAM));
}

#[test_case(None, 100 => 100 ; "no limit uses max")]
#[test_case(Some(5), 100 => 5 ; "small limit shrinks page")]
#[test_case(Some(500), 100 => 100 ; "large limit keeps max")]
#[test_case(Some(100), 100 => 100 ; "equal limit keeps max")]
#[test_case(Some(0), 50 => 1 ; "zero limit still asks for one row")]
fn test_page_size_for(limit: Option<u64>, max: u32) -> u32 {
    page_size_for(limit, max)
}

// ============================================================================
// CursorPaginator Tests
// ============================================================================

#[test]
fn test_process_page_continue_and_done() {
    let paginator = CursorPaginator::new("vanta_group", 100);
    let mut state = PaginationState::new();

    let next = paginator.process_page(
        page(vec![1, 2], true, Some("c1")).page_info(),
        2,
        &mut state,
    );
    assert_eq!(next, NextPage::Continue { cursor: "c1".into() });
    assert_eq!(state.cursor.as_deref(), Some("c1"));
    assert_eq!(state.total_fetched, 2);

    let next = paginator.process_page(page(vec![3], false, Some("c2")).page_info(), 1, &mut state);
    assert!(next.is_done());
    assert!(state.done);
    assert_eq!(state.pages, 2);
}

#[test]
fn test_process_page_stops_without_cursor() {
    let paginator = CursorPaginator::new("vanta_group", 100);
    let mut state = PaginationState::new();

    let next = paginator.process_page(page(vec![1], true, None).page_info(), 1, &mut state);
    assert!(next.is_done());

    let mut state = PaginationState::new();
    let next = paginator.process_page(page(vec![1], true, Some("")).page_info(), 1, &mut state);
    assert!(next.is_done());
}

#[tokio::test]
async fn test_run_follows_cursors_until_last_page() {
    let paginator = CursorPaginator::new("vanta_user", 2);
    let mut pages = VecDeque::from(vec![
        page(vec![1, 2], true, Some("c1")),
        page(vec![3, 4], true, Some("c2")),
        page(vec![5], false, None),
    ]);
    let mut requests = Vec::new();
    let mut rows = Vec::new();

    let state = paginator
        .run(
            |req| {
                requests.push(req);
                let next = pages.pop_front();
                async move { next.ok_or_else(|| Error::Other("no more pages".into())) }
            },
            &mut |data: Vec<u32>| {
                rows.extend(data);
                Ok(true)
            },
        )
        .await
        .unwrap();

    assert_eq!(rows, vec![1, 2, 3, 4, 5]);
    assert_eq!(state.pages, 3);
    assert_eq!(
        requests,
        vec![
            PageRequest { page_size: Some(2), cursor: None },
            PageRequest { page_size: Some(2), cursor: Some("c1".into()) },
            PageRequest { page_size: Some(2), cursor: Some("c2".into()) },
        ]
    );
}

#[tokio::test]
async fn test_run_stops_when_consumer_is_satisfied() {
    let paginator = CursorPaginator::new("vanta_user", 2);
    let mut calls = 0;

    let state = paginator
        .run(
            |_req| {
                calls += 1;
                async { Ok(page(vec![1, 2], true, Some("more"))) }
            },
            &mut |_data: Vec<u32>| Ok(false),
        )
        .await
        .unwrap();

    assert_eq!(calls, 1);
    assert!(state.done);
}

#[tokio::test]
async fn test_run_propagates_fetch_error() {
    let paginator = CursorPaginator::new("vanta_user", 2);
    let result = paginator
        .run(
            |_req| async { Err::<ListOutput<u32>, _>(Error::http_status(500, "boom")) },
            &mut |_data: Vec<u32>| Ok(true),
        )
        .await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
}
