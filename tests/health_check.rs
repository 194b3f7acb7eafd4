mod common;

use appleui_mcp::configuration::TransportMode;
use serde_json::Value;

#[tokio::test]
async fn health_check_works() {
    let app = common::spawn_app(TransportMode::Stateless).await;

    let response = app
        .client
        .get(&format!("{}/health", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["name"], "appleui-mcp");
}

#[tokio::test]
async fn discovery_documents_point_at_api_keys() {
    let app = common::spawn_app(TransportMode::Stateless).await;

    let resource: Value = app
        .client
        .get(&format!("{}/.well-known/oauth-protected-resource", &app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resource["bearer_methods_supported"], serde_json::json!(["header"]));
    assert!(resource["resource"].as_str().unwrap().ends_with("/mcp"));

    let metadata = app
        .client
        .get(&format!("{}/.well-known/oauth-authorization-server", &app.address))
        .send()
        .await
        .unwrap();
    assert!(metadata.status().is_success());

    let token = app
        .client
        .post(&format!("{}/api/token", &app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(token.status().as_u16(), 400);
    let body: Value = token.json().await.unwrap();
    assert_eq!(body["error"], "invalid_grant");
}
