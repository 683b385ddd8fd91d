//! Execution tests for single-resource fetches.
//!
//! Uses wiremock to mock the Dynatrace API and test actual execution flow.

use dtapi::{DynatraceClient, DynatraceError, Entity, EntityGetQuery, Get};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_entity_returns_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities/HOST-0123456789ABCDEF"))
        .and(header("authorization", "Api-Token test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entityId": "HOST-0123456789ABCDEF",
            "displayName": "web-01",
            "tags": [{ "context": "CONTEXTLESS", "key": "team", "value": "ops" }],
            "properties": { "osType": "LINUX" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let entity = Entity::get(&client, "HOST-0123456789ABCDEF".to_string())
        .await
        .unwrap();

    assert_eq!(entity.display_name.as_deref(), Some("web-01"));
    assert_eq!(entity.tag("team").and_then(|t| t.value.as_deref()), Some("ops"));
}

#[tokio::test]
async fn test_get_entity_with_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities/SERVICE-1"))
        .and(query_param("from", "now-7d"))
        .and(query_param("fields", "+properties"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "entityId": "SERVICE-1" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let query = EntityGetQuery {
        from: Some("now-7d".to_string()),
        to: None,
        fields: Some("+properties".to_string()),
    };
    let entity = client
        .entities()
        .get_with_query("SERVICE-1", &query)
        .await
        .unwrap();

    assert_eq!(entity.entity_id.as_deref(), Some("SERVICE-1"));
}

#[tokio::test]
async fn test_get_missing_entity_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities/HOST-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": { "code": 404, "message": "Entity not found" }
        })))
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let err = client.entities().get("HOST-404").await.unwrap_err();

    match err {
        DynatraceError::NotFound { entity_type, id } => {
            assert_eq!(entity_type, "Entity");
            assert_eq!(id, "HOST-404");
        }
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_entity_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entityTypes/HOST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "HOST",
            "displayName": "Host",
            "dimensionKey": "dt.entity.host"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let ty = client.entities().get_type("HOST").await.unwrap();

    assert_eq!(ty.entity_type.as_deref(), Some("HOST"));
    assert_eq!(ty.dimension_key.as_deref(), Some("dt.entity.host"));
}

#[tokio::test]
async fn test_api_error_message_extracted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entityTypes/HOST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "message": "Token is missing required scope" }
        })))
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let err = client.entities().get_type("HOST").await.unwrap_err();

    match err {
        DynatraceError::ApiError {
            message,
            status_code,
        } => {
            assert_eq!(message, "Token is missing required scope");
            assert_eq!(status_code, Some(403));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entities/HOST-1"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&mock_server)
        .await;

    let client = DynatraceClient::new("test-token", &mock_server.uri()).unwrap();
    let err = client.entities().get("HOST-1").await.unwrap_err();

    assert!(matches!(
        err,
        DynatraceError::RateLimited {
            retry_after_secs: Some(30)
        }
    ));
}
