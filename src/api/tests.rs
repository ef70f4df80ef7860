//! Tests for the Vanta API client

use super::*;
use crate::config::ConnectionConfig;
use crate::pagination::PageRequest;
use crate::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_config(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig::from_yaml_str(&format!(
        "access_token: test-token\nbase_url: {}\nhttp:\n  max_retries: 0\n  rate_limit: null\n",
        server.uri()
    ))
    .unwrap()
}

fn oauth_config(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig::from_yaml_str(&format!(
        "client_id: cid\nclient_secret: csecret\nbase_url: {}\nhttp:\n  max_retries: 0\n  rate_limit: null\n",
        server.uri()
    ))
    .unwrap()
}

fn page(data: serde_json::Value, has_next: bool, cursor: &str) -> serde_json::Value {
    json!({
        "results": {
            "pageInfo": {"hasNextPage": has_next, "endCursor": cursor},
            "data": data
        }
    })
}

#[tokio::test]
async fn test_list_people_sends_page_params_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/people"))
        .and(query_param("pageSize", "25"))
        .and(query_param("pageCursor", "cur-1"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{"id": "p1", "emailAddress": "a@example.com"}]),
            false,
            "",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = VantaClient::new(&token_config(&server)).unwrap();
    let output = client
        .list_people(&PageRequest {
            page_size: Some(25),
            cursor: Some("cur-1".into()),
        })
        .await
        .unwrap();

    assert!(!output.page_info().has_next_page);
    let people = output.into_data();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].email_address, "a@example.com");
}

#[tokio::test]
async fn test_get_group_decodes_bare_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/groups/g-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "g-1",
            "name": "Engineering",
            "creationDate": "2024-03-01T12:00:00.000Z"
        })))
        .mount(&server)
        .await;

    let client = VantaClient::new(&token_config(&server)).unwrap();
    let group = client.get_group("g-1").await.unwrap();

    assert_eq!(group.name, "Engineering");
    assert!(group.creation_date.is_some());
}

#[tokio::test]
async fn test_null_scalars_decode_as_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tests/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t-1",
            "name": "MFA enabled",
            "description": null,
            "integrations": null,
            "owner": null
        })))
        .mount(&server)
        .await;

    let client = VantaClient::new(&token_config(&server)).unwrap();
    let test = client.get_test("t-1").await.unwrap();

    assert_eq!(test.description, "");
    assert!(test.integrations.is_empty());
    assert!(test.owner.is_none());
}

#[tokio::test]
async fn test_empty_id_is_rejected_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = VantaClient::new(&token_config(&server)).unwrap();

    let err = client.get_person("").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid argument: person ID cannot be empty");

    let err = client
        .list_evidence("", &ListEvidenceOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("audit ID cannot be empty"));
}

#[tokio::test]
async fn test_list_tests_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tests"))
        .and(query_param("statusFilter", "NEEDS_ATTENTION"))
        .and(query_param("frameworkFilter", "soc2"))
        .and(query_param("isInRollout", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{"id": "t1", "status": "NEEDS_ATTENTION"}]),
            false,
            "",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = VantaClient::new(&token_config(&server)).unwrap();
    let output = client
        .list_tests(&ListTestsOptions {
            status_filter: Some("NEEDS_ATTENTION".into()),
            framework_filter: Some("soc2".into()),
            is_in_rollout: Some(false),
            ..ListTestsOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(output.into_data()[0].status, "NEEDS_ATTENTION");
}

#[tokio::test]
async fn test_list_test_entities_and_evidence_paths() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tests/t%201/entities"))
        .and(query_param("entityStatus", "FAILING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{"id": "e1", "entityStatus": "FAILING", "displayName": "bucket"}]),
            false,
            "",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/audits/audit-9/evidence"))
        .and(query_param("limit", "50"))
        .and(query_param("cursor", "c-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{"id": "ev1", "name": "Backup policy"}]),
            false,
            "",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = VantaClient::new(&token_config(&server)).unwrap();

    let entities = client
        .list_test_entities(
            "t 1",
            &ListTestEntitiesOptions {
                entity_status: Some("FAILING".into()),
                ..ListTestEntitiesOptions::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(entities.into_data()[0].display_name, "bucket");

    let evidence = client
        .list_evidence(
            "audit-9",
            &ListEvidenceOptions::from(PageRequest {
                page_size: Some(50),
                cursor: Some("c-2".into()),
            }),
        )
        .await
        .unwrap();
    assert_eq!(evidence.into_data()[0].name, "Backup policy");
}

#[tokio::test]
async fn test_api_error_includes_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/vendors"))
        .respond_with(ResponseTemplate::new(403).set_body_string("{\"error\":\"forbidden\"}"))
        .mount(&server)
        .await;

    let client = VantaClient::new(&token_config(&server)).unwrap();
    let err = client
        .list_vendors(&PageRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 403, .. }));
    assert!(err.to_string().contains("forbidden"));
}

#[tokio::test]
async fn test_connect_primes_oauth_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "oauth-tok",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/integrations"))
        .and(header("authorization", "Bearer oauth-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{"integrationId": "aws", "displayName": "AWS"}]),
            false,
            "",
        )))
        .mount(&server)
        .await;

    let client = VantaClient::connect(&oauth_config(&server)).await.unwrap();
    let output = client
        .list_integrations(&PageRequest::default())
        .await
        .unwrap();
    assert_eq!(output.into_data()[0].integration_id, "aws");
}

#[tokio::test]
async fn test_connect_fails_on_bad_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    let err = VantaClient::connect(&oauth_config(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OAuth2 { .. }));
}

#[test]
fn test_new_without_credentials_fails() {
    let config = ConnectionConfig::from_yaml_str("base_url: https://api.example.com\n").unwrap();
    assert!(VantaClient::new(&config).is_err());
}

#[test]
fn test_evidence_options_use_limit_and_cursor() {
    let request = ListEvidenceOptions::from(PageRequest {
        page_size: Some(25),
        cursor: Some("abc".into()),
    })
    .to_request();

    assert_eq!(request.query.get("limit").map(String::as_str), Some("25"));
    assert_eq!(request.query.get("cursor").map(String::as_str), Some("abc"));
    assert!(!request.query.contains_key("pageSize"));
    assert!(!request.query.contains_key("pageCursor"));

    assert!(ListEvidenceOptions::default().to_request().query.is_empty());
}
