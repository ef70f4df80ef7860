//! Tests for engine module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(server: &MockServer) -> QueryEngine {
    QueryEngine::new(
        ConnectionConfig::from_yaml_str(&format!(
            "access_token: tok\nbase_url: {}\nhttp:\n  max_retries: 0\n  rate_limit: null\n",
            server.uri()
        ))
        .unwrap(),
    )
}

fn person(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "emailAddress": format!("{id}@example.com"),
        "employment": {"status": status},
        "groupIds": ["g1"]
    })
}

async fn mount_people(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/people"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": {
                "pageInfo": {"hasNextPage": false, "endCursor": null},
                "data": [person("u1", "CURRENT"), person("u2", "INACTIVE"), person("u3", "CURRENT")]
            }
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ============================================================================
// Planning Tests
// ============================================================================

#[test]
fn test_plan_chooses_get_for_id_qual() {
    let def = crate::tables::UserTable::new().definition().clone();
    assert_eq!(plan(&def, &QueryContext::new()).unwrap(), ScanMode::List);
    assert_eq!(
        plan(&def, &QueryContext::new().with_qual("id", "u1")).unwrap(),
        ScanMode::Get
    );
}

#[test]
fn test_plan_rejects_unknown_columns() {
    let def = crate::tables::UserTable::new().definition().clone();
    let err = plan(&def, &QueryContext::new().with_qual("nope", "x")).unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound { ref column, .. } if column == "nope"));

    let err = plan(&def, &QueryContext::new().with_columns(["id", "bogus"])).unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound { ref column, .. } if column == "bogus"));
}

#[test]
fn test_plan_requires_audit_id_for_evidence() {
    let def = crate::tables::EvidenceTable::new().definition().clone();
    let err = plan(&def, &QueryContext::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Table 'vanta_evidence' requires an equality qualifier on 'audit_id'"
    );
    assert_eq!(
        plan(&def, &QueryContext::new().with_qual("audit_id", "a1")).unwrap(),
        ScanMode::List
    );
}

// ============================================================================
// Execution Tests
// ============================================================================

#[tokio::test]
async fn test_execute_list() {
    let server = MockServer::start().await;
    mount_people(&server, 1).await;
    let engine = engine(&server);

    let ctx = QueryContext::new()
        .with_qual("is_active", true)
        .with_columns(["id", "email"]);
    let mut rows = Vec::new();
    let stats = engine
        .execute("vanta_user", &ctx, |row| {
            rows.push(row.into_inner());
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(stats.mode, ScanMode::List);
    assert_eq!(stats.rows, 2);
    assert_eq!(stats.filtered, 1);
    assert_eq!(
        rows.into_iter().map(Value::Object).collect::<Vec<_>>(),
        vec![
            json!({"id": "u1", "email": "u1@example.com"}),
            json!({"id": "u3", "email": "u3@example.com"}),
        ]
    );
}

#[tokio::test]
async fn test_execute_get_by_ids() {
    let server = MockServer::start().await;
    mount_people(&server, 0).await;
    for id in ["u1", "u2"] {
        Mock::given(method("GET"))
            .and(path(format!("/v1/people/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(person(id, "CURRENT")))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/v1/people/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let ctx = QueryContext::new()
        .with_qual("id", "u2")
        .with_qual("id", "gone")
        .with_qual("id", "u1")
        .with_qual("id", "u2");
    let rows = engine(&server).collect("vanta_user", &ctx).await.unwrap();

    let ids: Vec<_> = rows.iter().map(|r| r.get("id").cloned().unwrap()).collect();
    assert_eq!(ids, vec![json!("u2"), json!("u1")]);
}

#[tokio::test]
async fn test_execute_respects_limit() {
    let server = MockServer::start().await;
    mount_people(&server, 1).await;

    let stats = engine(&server)
        .execute("vanta_user", &QueryContext::new().with_limit(1), |_| Ok(()))
        .await
        .unwrap();
    assert_eq!(stats.rows, 1);
}

#[tokio::test]
async fn test_execute_unknown_table() {
    let server = MockServer::start().await;
    let err = engine(&server)
        .execute("vanta_nothing", &QueryContext::new(), |_| Ok(()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TableNotFound { .. }));
}

#[tokio::test]
async fn test_callback_error_stops_scan() {
    let server = MockServer::start().await;
    mount_people(&server, 1).await;

    let err = engine(&server)
        .execute("vanta_user", &QueryContext::new(), |_| {
            Err(Error::Other("sink closed".into()))
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "sink closed");
}

#[tokio::test]
async fn test_collect_batch() {
    let server = MockServer::start().await;
    mount_people(&server, 1).await;

    let ctx = QueryContext::new().with_columns(["id", "is_active"]);
    let batch = engine(&server).collect_batch("vanta_user", &ctx).await.unwrap();
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(batch.schema().field(1).name(), "is_active");
}

// ============================================================================
// SQL Tests
// ============================================================================

#[tokio::test]
async fn test_sql_over_tables() {
    let server = MockServer::start().await;
    mount_people(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": {
                "pageInfo": {"hasNextPage": false, "endCursor": null},
                "data": [{"id": "g1", "name": "Engineering"}]
            }
        })))
        .mount(&server)
        .await;

    let rows = engine(&server)
        .sql(
            "SELECT g.name, count(*) AS members \
             FROM vanta_user u JOIN vanta_group g ON u.group_ids LIKE '%\"' || g.id || '\"%' \
             WHERE u.is_active GROUP BY g.name",
            &BTreeMap::new(),
        )
        .await
        .unwrap();
    assert_eq!(rows, vec![json!({"name": "Engineering", "members": 2})]);
}

#[tokio::test]
async fn test_sql_passes_quals_per_table() {
    let server = MockServer::start().await;
    mount_people(&server, 1).await;

    let quals = BTreeMap::from([(
        "vanta_user".to_string(),
        QueryContext::new().with_qual("employment_status", "INACTIVE"),
    )]);
    let rows = engine(&server)
        .sql("SELECT id FROM vanta_user", &quals)
        .await
        .unwrap();
    assert_eq!(rows, vec![json!({"id": "u2"})]);
}

#[tokio::test]
async fn test_sql_rejects_unknown_qual_table() {
    let server = MockServer::start().await;
    let quals = BTreeMap::from([("vanta_nothing".to_string(), QueryContext::new())]);
    let err = engine(&server).sql("SELECT 1", &quals).await.unwrap_err();
    assert!(matches!(err, Error::TableNotFound { .. }));
}

#[test]
fn test_scan_stats_display() {
    let mut stats = ScanStats::new("vanta_user", ScanMode::List);
    stats.rows = 3;
    stats.duration = std::time::Duration::from_millis(12);
    assert_eq!(stats.to_string(), "vanta_user: 3 rows (0 filtered) in 12ms");
    assert_eq!(
        serde_json::to_value(&stats).unwrap(),
        json!({"table": "vanta_user", "mode": "list", "rows": 3, "filtered": 0, "duration_ms": 12})
    );
}
