//! Integration tests for FOLIO discovery
//!
//! A wiremock server plays the Okapi gateway: login, SRS record paging,
//! the marc-record-identifiers stream, and inventory instance lookups.

use folio_bad_urls::config::{FolioConfig, StrategyKind};
use folio_bad_urls::discovery::{CandidateSource, DiscoveryError, FolioStrategy};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn folio_config(server: &MockServer, strategy: StrategyKind, ids_path: &str) -> FolioConfig {
    FolioConfig {
        okapi_url: server.uri(),
        tenant_id: "diku".to_string(),
        username: "checker".to_string(),
        password: "secret".to_string(),
        strategy,
        query_limit: 2,
        batch_limit: 3,
        instance_ids_path: ids_path.to_string(),
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/authn/login"))
        .and(header("x-okapi-tenant", "diku"))
        .and(body_json(json!({"username": "checker", "password": "secret"})))
        .respond_with(ResponseTemplate::new(201).insert_header("x-okapi-token", TOKEN))
        .expect(1)
        .mount(server)
        .await;
}

fn srs_record(hrid: &str, url: &str) -> serde_json::Value {
    json!({
        "externalIdsHolder": {"instanceId": format!("id-{}", hrid), "instanceHrid": hrid},
        "additionalInfo": {"suppressDiscovery": false},
        "parsedRecord": {"content": {"fields": [
            {"001": hrid},
            {"856": {"ind1": "4", "ind2": "0", "subfields": [{"u": url}]}}
        ]}}
    })
}

fn srs_record_without_link(hrid: &str) -> serde_json::Value {
    json!({
        "externalIdsHolder": {"instanceId": format!("id-{}", hrid), "instanceHrid": hrid},
        "additionalInfo": {"suppressDiscovery": false},
        "parsedRecord": {"content": {"fields": [{"245": {"subfields": [{"a": "Title"}]}}]}}
    })
}

fn timeout() -> Duration {
    Duration::from_secs(5)
}

#[tokio::test]
async fn test_srs_strategy_pages_through_batch() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/source-storage/records"))
        .and(query_param("limit", "0"))
        .and(header("x-okapi-token", TOKEN))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"records": [], "totalRecords": 5})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/source-storage/records"))
        .and(query_param("state", "ACTUAL"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                srs_record("in001", "https://a.example/1"),
                srs_record_without_link("in002")
            ],
            "totalRecords": 5
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/source-storage/records"))
        .and(query_param("offset", "2"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [srs_record("in003", "https://b.example/3")],
            "totalRecords": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = folio_config(&server, StrategyKind::Srs, "unused.json");
    let mut strategy = FolioStrategy::connect(&config, timeout(), false)
        .await
        .unwrap();

    assert_eq!(strategy.batch_size(), 3);
    assert_eq!(strategy.total_count().await.unwrap(), 5);

    let batch = strategy.next_batch(0).await.unwrap();
    let found: Vec<(Option<&str>, &str)> = batch
        .iter()
        .map(|c| (c.identifier.as_deref(), c.url.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (Some("in001"), "https://a.example/1"),
            (Some("in003"), "https://b.example/3"),
        ]
    );
}

#[tokio::test]
async fn test_srs_short_page_ends_batch() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/source-storage/records"))
        .and(query_param("offset", "4"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [srs_record("in005", "https://c.example/")],
            "totalRecords": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = folio_config(&server, StrategyKind::Srs, "unused.json");
    let mut strategy = FolioStrategy::connect(&config, timeout(), false)
        .await
        .unwrap();

    let batch = strategy.next_batch(4).await.unwrap();
    assert_eq!(batch.len(), 1);
}

#[tokio::test]
async fn test_upstream_error_is_status() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/source-storage/records"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let config = folio_config(&server, StrategyKind::Srs, "unused.json");
    let mut strategy = FolioStrategy::connect(&config, timeout(), false)
        .await
        .unwrap();

    match strategy.total_count().await {
        Err(DiscoveryError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authn/login"))
        .respond_with(ResponseTemplate::new(422).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let config = folio_config(&server, StrategyKind::Srs, "unused.json");
    let err = FolioStrategy::connect(&config, timeout(), false)
        .await
        .err()
        .unwrap();

    assert!(matches!(err, DiscoveryError::Login(_)));
    assert!(err.to_string().contains("422"));
}

#[tokio::test]
async fn test_instance_ids_strategy_builds_and_caches_ids() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let ids_path = dir.path().join("instance_ids.json");

    Mock::given(method("POST"))
        .and(path("/source-storage/stream/marc-record-identifiers"))
        .and(body_json(json!({"fieldsSearchExpression": "856.u is 'present'"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": ["c", "a", "b", "linked"],
            "totalCount": 4
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/source-storage/stream/marc-record-identifiers"))
        .and(body_json(json!({"fieldsSearchExpression": "856.w is 'present'"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": ["linked"],
            "totalCount": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/inventory/instances"))
        .and(query_param("query", "(id==\"a\" or id==\"b\")"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [
                {"id": "a", "hrid": "in0a", "discoverySuppress": false,
                 "electronicAccess": [{"uri": "https://a.example/"}]},
                {"id": "b", "hrid": "in0b", "discoverySuppress": true,
                 "electronicAccess": [{"uri": "https://b.example/"}]}
            ],
            "totalRecords": 2
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/inventory/instances"))
        .and(query_param("query", "(id==\"c\")"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [
                {"id": "c", "hrid": "in0c", "electronicAccess": [{"uri": "https://c.example/"}]}
            ],
            "totalRecords": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = folio_config(
        &server,
        StrategyKind::SrsInstanceIds,
        ids_path.to_str().unwrap(),
    );
    let mut strategy = FolioStrategy::connect(&config, timeout(), false)
        .await
        .unwrap();

    assert_eq!(strategy.total_count().await.unwrap(), 3);

    let cached: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(&ids_path).unwrap()).unwrap();
    assert_eq!(cached, vec!["a", "b", "c"]);

    let batch = strategy.next_batch(0).await.unwrap();
    let hrids: Vec<Option<&str>> = batch.iter().map(|c| c.identifier.as_deref()).collect();
    assert_eq!(hrids, vec![Some("in0a"), Some("in0c")]);
    assert_eq!(batch[1].url, "https://c.example/");
}

#[tokio::test]
async fn test_instance_ids_reused_from_cache() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let ids_path = dir.path().join("instance_ids.json");
    std::fs::write(&ids_path, r#"["x", "y"]"#).unwrap();

    Mock::given(method("POST"))
        .and(path("/source-storage/stream/marc-record-identifiers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(0)
        .mount(&server)
        .await;

    let config = folio_config(
        &server,
        StrategyKind::SrsInstanceIds,
        ids_path.to_str().unwrap(),
    );
    let mut strategy = FolioStrategy::connect(&config, timeout(), true)
        .await
        .unwrap();

    assert_eq!(strategy.total_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_instance_ids_past_end_is_empty() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let ids_path = dir.path().join("instance_ids.json");
    std::fs::write(&ids_path, r#"["x"]"#).unwrap();

    Mock::given(method("GET"))
        .and(path("/inventory/instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"instances": []})))
        .expect(0)
        .mount(&server)
        .await;

    let config = folio_config(
        &server,
        StrategyKind::SrsInstanceIds,
        ids_path.to_str().unwrap(),
    );
    let mut strategy = FolioStrategy::connect(&config, timeout(), true)
        .await
        .unwrap();

    assert!(strategy.next_batch(3).await.unwrap().is_empty());
}
