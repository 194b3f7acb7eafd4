mod common;

use appleui_mcp::configuration::TransportMode;
use appleui_mcp::connectors::{AuthMode, KeyServiceConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ping() -> Value {
    json!({"jsonrpc": "2.0", "method": "ping", "id": 1})
}

#[tokio::test]
async fn missing_key_is_401() {
    let app = common::spawn_app(TransportMode::Stateless).await;
    let response = app.client.post(app.mcp_url()).json(&ping()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], -32001);
    assert_eq!(body["id"], Value::Null);
}

#[tokio::test]
async fn unknown_key_is_403() {
    let app = common::spawn_app(TransportMode::Stateless).await;
    let response = app
        .client
        .post(app.mcp_url())
        .bearer_auth("appleui_sk_not_a_real_key")
        .json(&ping())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], -32002);
    assert_eq!(body["error"]["message"], "Invalid or expired API key");
}

#[tokio::test]
async fn badly_formatted_key_is_403() {
    let app = common::spawn_app(TransportMode::Stateless).await;
    let response = app
        .client
        .post(app.mcp_url())
        .bearer_auth("sk-something-else")
        .json(&ping())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["message"], "Invalid API key format");
}

#[tokio::test]
async fn only_post_is_gated() {
    let app = common::spawn_app(TransportMode::Stateless).await;
    let response = app.client.get(app.mcp_url()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn gate_applies_to_stateful_mode() {
    let app = common::spawn_app(TransportMode::Stateful).await;
    let response = app.client.post(app.mcp_url()).json(&ping()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn key_service_backend() {
    let key_service = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "userId": "remote-user",
            "apiKeyId": "remote-key"
        })))
        .mount(&key_service)
        .await;
    Mock::given(method("POST"))
        .and(path("/usage"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&key_service)
        .await;

    let mut settings = common::test_settings(TransportMode::Stateless);
    settings.auth.mode = AuthMode::KeyService;
    settings.auth.key_service = Some(KeyServiceConfig {
        base_url: key_service.uri(),
        ..Default::default()
    });
    let app = common::spawn_app_with_configuration(settings).await;

    let response = app
        .client
        .post(app.mcp_url())
        .bearer_auth("appleui_sk_remote_key")
        .json(&ping())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn key_service_outage_is_500() {
    let key_service = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&key_service)
        .await;

    let mut settings = common::test_settings(TransportMode::Stateless);
    settings.auth.mode = AuthMode::KeyService;
    settings.auth.key_service = Some(KeyServiceConfig {
        base_url: key_service.uri(),
        ..Default::default()
    });
    let app = common::spawn_app_with_configuration(settings).await;

    let response = app
        .client
        .post(app.mcp_url())
        .bearer_auth("appleui_sk_remote_key")
        .json(&ping())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], -32002);
    assert_eq!(body["error"]["message"], "API key validation failed");
}
