//! Integration tests for the authenticated request client: bearer
//! injection, response decoding, and the single refresh-and-retry pass
//! a 401 is allowed.

use std::sync::Arc;

use couriersync::api::{http_client, ApiClient, ApiError};
use couriersync::auth::{keys, AuthService, MemorySessionStore, SessionStore};
use couriersync::models::Package;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client whose auth and API base both point at the mock server. With a
/// token the store also carries a refresh token, as a real session would.
fn client_for(server: &MockServer, token: Option<&str>) -> (ApiClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    if let Some(token) = token {
        store.set(keys::ACCESS_TOKEN, token);
        store.set(keys::REFRESH_TOKEN, "R1");
    }
    let http = http_client().expect("http client");
    let auth = AuthService::new(http.clone(), server.uri(), store.clone());
    (ApiClient::new(http, server.uri(), auth), store)
}

// ── Response decoding ────────────────────────────────────────────────────

#[tokio::test]
async fn get_decodes_a_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paquetes"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"codigoPaquete": "PKG1", "estadoActual": "En ruta"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, Some("T1"));
    let packages: Vec<Package> = client
        .get("/paquetes")
        .await
        .expect("request")
        .expect("body");

    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].tracking_code(), Some("PKG1"));
}

#[tokio::test]
async fn success_without_a_json_body_decodes_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("pong", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, Some("T1"));
    let reply: Option<Value> = client.get("/ping").await.expect("request");
    assert!(reply.is_none());
}

#[tokio::test]
async fn no_content_decodes_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/paquetes/PKG1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, Some("T1"));
    let reply: Option<Value> = client.delete("/paquetes/PKG1").await.expect("request");
    assert!(reply.is_none());
}

#[tokio::test]
async fn errors_carry_the_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paquetes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, Some("T1"));
    let err = client.get::<Value>("/paquetes").await.unwrap_err();

    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected an HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_an_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paquetes"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, Some("T1"));
    let err = client.get::<Value>("/paquetes").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

// ── Request construction ─────────────────────────────────────────────────

#[tokio::test]
async fn post_serializes_the_body_as_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/echo"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"a": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, Some("T1"));
    let reply: Option<Value> = client
        .post("/echo", Some(&json!({"a": 1})))
        .await
        .expect("request");
    assert_eq!(reply, Some(json!({"ok": true})));
}

#[tokio::test]
async fn requests_without_a_session_omit_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paquetes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, None);
    let _: Option<Vec<Package>> = client.get("/paquetes").await.expect("request");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn absolute_endpoints_bypass_the_base_url() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&other)
        .await;

    let (client, _) = client_for(&server, Some("T1"));
    let reply: Option<Value> = client
        .get(&format!("{}/status", other.uri()))
        .await
        .expect("request");
    assert_eq!(reply, Some(json!({"ok": true})));
}

// ── 401 recovery ─────────────────────────────────────────────────────────

#[tokio::test]
async fn retry_after_refresh_carries_the_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paquetes"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/refresh"))
        .and(body_json(json!({"refresh_token": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "T2"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/paquetes"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, Some("T1"));
    let packages: Vec<Package> = client
        .get("/paquetes")
        .await
        .expect("request")
        .unwrap_or_default();

    assert!(packages.is_empty());
    assert_eq!(store.get(keys::ACCESS_TOKEN), Some("T2".to_string()));
}

#[tokio::test]
async fn failed_refresh_surfaces_session_expired_without_a_retry() {
    let server = MockServer::start().await;

    // expect(1) proves the original request was not replayed.
    Mock::given(method("GET"))
        .and(path("/paquetes"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/refresh"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, Some("T1"));
    let err = client.get::<Value>("/paquetes").await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    for key in keys::ALL {
        assert_eq!(store.get(key), None, "{key} should be cleared");
    }
}

#[tokio::test]
async fn a_401_without_a_session_is_session_expired() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paquetes"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    // No refresh token stored, so no refresh call goes out.
    Mock::given(method("POST"))
        .and(path("/login/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, None);
    let err = client.get::<Value>("/paquetes").await.unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
}

#[tokio::test]
async fn a_second_401_is_an_ordinary_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paquetes"))
        .respond_with(ResponseTemplate::new(401).set_body_string("still unauthorized"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "T2"})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, Some("T1"));
    let err = client.get::<Value>("/paquetes").await.unwrap_err();

    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("still unauthorized"));
        }
        other => panic!("expected an HTTP error, got {other:?}"),
    }
}
