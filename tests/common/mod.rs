#![allow(dead_code)]

use appleui_mcp::configuration::{Settings, TransportMode};
use appleui_mcp::connectors::{hash_api_key, AuthMode, StaticKeyConfig};
use serde_json::Value;
use std::net::TcpListener;

pub const TEST_KEY: &str = "appleui_sk_test_integration_0001";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn mcp_url(&self) -> String {
        format!("{}/mcp", self.address)
    }

    /// POST a JSON-RPC body with the test key
    pub async fn post_mcp(&self, body: &Value) -> reqwest::Response {
        self.post_mcp_with_session(body, None).await
    }

    pub async fn post_mcp_with_session(
        &self,
        body: &Value,
        session_id: Option<&str>,
    ) -> reqwest::Response {
        let mut req = self
            .client
            .post(self.mcp_url())
            .bearer_auth(TEST_KEY)
            .json(body);
        if let Some(id) = session_id {
            req = req.header("mcp-session-id", id);
        }
        req.send().await.expect("Failed to execute request.")
    }
}

pub fn test_settings(mode: TransportMode) -> Settings {
    let mut settings = Settings::default();
    settings.transport.mode = mode;
    settings.auth.mode = AuthMode::Static;
    settings.auth.keys = vec![StaticKeyConfig {
        key_hash: hash_api_key(TEST_KEY),
        key_id: "key-test".to_string(),
        user_id: "user-test".to_string(),
    }];
    settings
}

pub async fn spawn_app_with_configuration(settings: Settings) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = appleui_mcp::startup::run(listener, settings)
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

pub async fn spawn_app(mode: TransportMode) -> TestApp {
    spawn_app_with_configuration(test_settings(mode)).await
}
