//! Execution tests for lazy paginated listing.
//!
//! Uses wiremock to mock the Dynatrace API and test actual execution flow.

use dtapi::{DynatraceClient, DynatraceError, Entity, EntityListQuery, List};
use futures::TryStreamExt;
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn entity(id: &str, name: &str) -> serde_json::Value {
    json!({ "entityId": id, "displayName": name })
}

/// Mount a two-page `type(HOST)` listing: two hosts, then one.
async fn mount_two_pages(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/entities"))
        .and(query_param("entitySelector", "type(HOST)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCount": 3,
            "pageSize": 2,
            "nextPageKey": "page-2",
            "entities": [entity("HOST-1", "web-01"), entity("HOST-2", "web-02")]
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities"))
        .and(query_param("nextPageKey", "page-2"))
        .and(query_param_is_missing("entitySelector"))
        .and(query_param_is_missing("pageSize"))
        .and(query_param_is_missing("from"))
        .and(query_param_is_missing("to"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCount": 3,
            "pageSize": 2,
            "entities": [entity("HOST-3", "db-01")]
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_list_is_lazy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entities": [] })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let list = client.entities().list("type(HOST)");

    assert_eq!(list.pages_fetched(), 0);
    let received = mock_server.received_requests().await.unwrap();
    assert!(received.is_empty(), "listing must not issue a request");

    drop(list);
}

#[tokio::test]
async fn test_list_sends_default_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities"))
        .and(query_param("entitySelector", "type(HOST)"))
        .and(query_param("from", "now-2h"))
        .and(query_param("to", "now"))
        .and(query_param("pageSize", "50"))
        .and(query_param_is_missing("fields"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCount": 1,
            "entities": [entity("HOST-1", "web-01")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let hosts = assert_ok!(client.entities().list("type(HOST)").collect_all().await);

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].entity_id.as_deref(), Some("HOST-1"));
}

#[tokio::test]
async fn test_list_with_custom_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities"))
        .and(query_param("entitySelector", "type(SERVICE)"))
        .and(query_param("from", "now-1d"))
        .and(query_param("to", "now-1h"))
        .and(query_param("fields", "+tags"))
        .and(query_param("pageSize", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entities": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let query = EntityListQuery::new("type(SERVICE)")
        .time_from("now-1d")
        .time_to("now-1h")
        .fields("+tags")
        .page_size(500);
    let services = Entity::list(&client, query).collect_all().await.unwrap();

    assert!(services.is_empty());
}

#[tokio::test]
async fn test_follow_up_pages_send_only_page_key() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server).await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let mut list = client.entities().list("type(HOST)");

    let first = list.next_page().await.unwrap().unwrap();
    assert_eq!(first.len(), 2);
    assert!(first.has_more());
    assert_eq!(list.total_count(), Some(3));

    let second = list.next_page().await.unwrap().unwrap();
    assert_eq!(second.len(), 1);
    assert!(!second.has_more());

    assert!(list.next_page().await.unwrap().is_none());
    assert!(list.is_exhausted());
    assert_eq!(list.pages_fetched(), 2);
}

#[tokio::test]
async fn test_try_next_walks_items_in_order() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server).await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let mut list = client.entities().list("type(HOST)");

    let mut names = Vec::new();
    while let Some(host) = list.try_next().await.unwrap() {
        names.push(host.display_name.unwrap_or_default());
    }

    assert_eq!(names, vec!["web-01", "web-02", "db-01"]);
}

#[tokio::test]
async fn test_next_page_returns_buffered_items_first() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server).await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let mut list = client.entities().list("type(HOST)");

    let first = list.try_next().await.unwrap().unwrap();
    assert_eq!(first.entity_id.as_deref(), Some("HOST-1"));

    let rest_of_first = list.next_page().await.unwrap().unwrap();
    assert_eq!(rest_of_first.len(), 1);
    assert_eq!(rest_of_first.items[0].entity_id.as_deref(), Some("HOST-2"));
    assert_eq!(rest_of_first.next_page_key.as_deref(), Some("page-2"));

    let second = list.next_page().await.unwrap().unwrap();
    assert_eq!(second.items[0].entity_id.as_deref(), Some("HOST-3"));
}

#[tokio::test]
async fn test_stream_yields_all_items() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server).await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let hosts: Vec<Entity> = client
        .entities()
        .list("type(HOST)")
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(hosts.len(), 3);
    assert_eq!(hosts[2].display_name.as_deref(), Some("db-01"));
}

#[tokio::test]
async fn test_independent_lists_do_not_interfere() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server).await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let service = client.entities();
    let mut a = service.list("type(HOST)");
    let b = service.list("type(HOST)");

    let first_a = a.try_next().await.unwrap().unwrap();
    let all_b = b.collect_all().await.unwrap();
    let rest_a = a.collect_all().await.unwrap();

    assert_eq!(first_a.entity_id.as_deref(), Some("HOST-1"));
    assert_eq!(all_b.len(), 3);
    assert_eq!(rest_a.len(), 2);
    assert_eq!(rest_a[0].entity_id.as_deref(), Some("HOST-2"));

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 4);
}

#[tokio::test]
async fn test_list_types_reads_types_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entityTypes"))
        .and(query_param("pageSize", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCount": 2,
            "types": [
                { "type": "HOST", "displayName": "Host" },
                { "type": "SERVICE", "displayName": "Service" }
            ],
            "entities": [entity("HOST-1", "should-not-be-read")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let types = client.entities().list_types(50).collect_all().await.unwrap();

    let names: Vec<_> = types.iter().filter_map(|t| t.entity_type.as_deref()).collect();
    assert_eq!(names, vec!["HOST", "SERVICE"]);
}

#[tokio::test]
async fn test_failed_page_can_be_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities"))
        .and(query_param("entitySelector", "type(HOST)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": [entity("HOST-1", "web-01")]
        })))
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let mut list = client.entities().list("type(HOST)");

    let err = list.try_next().await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));

    let host = list.try_next().await.unwrap().unwrap();
    assert_eq!(host.entity_id.as_deref(), Some("HOST-1"));
}

#[tokio::test]
async fn test_malformed_tags_fail_at_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": [{ "entityId": "HOST-1", "tags": "team:ops" }]
        })))
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let err = client
        .entities()
        .list("type(HOST)")
        .collect_all()
        .await
        .unwrap_err();

    assert!(matches!(err, DynatraceError::ParseError(_)));
}

#[tokio::test]
async fn test_hydration_defaults_missing_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": [{}, { "entityId": "HOST-2" }]
        })))
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let entities = client
        .entities()
        .list("type(HOST)")
        .collect_all()
        .await
        .unwrap();

    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0], Entity::default());
    assert!(entities[1].display_name.is_none());
    assert!(entities[1].properties.is_empty());
    assert!(entities[1].tags.is_empty());
}

#[tokio::test]
async fn test_null_properties_keep_the_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": [
                { "entityId": "HOST-1", "properties": null },
                { "entityId": "HOST-2", "properties": { "osType": "LINUX" } }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let entities = assert_ok!(client.entities().list("type(HOST)").collect_all().await);

    assert_eq!(entities.len(), 2);
    assert!(entities[0].properties.is_empty());
    assert_eq!(entities[1].property("osType"), Some(&json!("LINUX")));
}

#[tokio::test]
async fn test_endless_page_keys_stop_at_page_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageKey": "same-again",
            "entities": []
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();

    let mut list = client.entities().list("type(HOST)").with_max_pages(2);
    assert!(list.try_next().await.unwrap().is_none());
    assert_eq!(list.pages_fetched(), 2);
    assert!(list.is_exhausted());

    let streamed: Vec<Entity> = client
        .entities()
        .list("type(HOST)")
        .with_max_pages(1)
        .into_stream()
        .try_collect()
        .await
        .unwrap();
    assert!(streamed.is_empty());
}
