use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::Instrument;

use super::cache::ValidationCache;
use super::{hash_api_key, ApiKeyConnector, ApiKeyValidation, API_KEY_PREFIX};
use crate::connectors::config::KeyServiceConfig;
use crate::connectors::errors::ConnectorError;

/// HTTP-based key service client
pub struct KeyServiceClient {
    base_url: String,
    http_client: reqwest::Client,
    auth_token: Option<String>,
    cache: ValidationCache,
}

impl KeyServiceClient {
    pub fn new(config: KeyServiceConfig) -> Result<Self, ConnectorError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ConnectorError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            auth_token: config.auth_token,
            cache: ValidationCache::new(Duration::from_secs(config.cache_ttl_secs)),
        })
    }

    fn post(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let req = self
            .http_client
            .post(format!("{}/{}", self.base_url, endpoint));
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl ApiKeyConnector for KeyServiceClient {
    async fn validate(&self, api_key: &str) -> Result<ApiKeyValidation, ConnectorError> {
        if !api_key.starts_with(API_KEY_PREFIX) {
            return Ok(ApiKeyValidation::rejected("Invalid API key format"));
        }

        let key_hash = hash_api_key(api_key);
        if let Some(cached) = self.cache.get(&key_hash).await {
            tracing::debug!("API key validation served from cache");
            return Ok(cached);
        }

        let span = tracing::info_span!("key_service_validate");
        let resp = self
            .post("validate")
            .json(&json!({ "keyHash": key_hash }))
            .send()
            .instrument(span)
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            tracing::error!("Key service refused our credentials: {}", status);
            return Err(ConnectorError::Unauthorized(format!(
                "key service answered {}",
                status
            )));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("Key service validate failed: {} {}", status, body);
            return Err(ConnectorError::HttpError(format!(
                "key service answered {}",
                status
            )));
        }

        let validation: ApiKeyValidation = resp
            .json()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(e.to_string()))?;

        self.cache.insert(key_hash, validation.clone()).await;
        Ok(validation)
    }

    async fn record_usage(&self, api_key_id: &str) -> Result<(), ConnectorError> {
        let span = tracing::info_span!("key_service_usage", api_key_id = %api_key_id);
        self.post("usage")
            .json(&json!({ "apiKeyId": api_key_id }))
            .send()
            .instrument(span)
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "appleui_sk_live_abc";

    fn client(server: &MockServer, cache_ttl_secs: u64) -> KeyServiceClient {
        KeyServiceClient::new(KeyServiceConfig {
            base_url: format!("{}/keys/", server.uri()),
            timeout_secs: 5,
            cache_ttl_secs,
            auth_token: Some("service-token".to_string()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn validates_and_caches_positive_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/keys/validate"))
            .and(header("Authorization", "Bearer service-token"))
            .and(body_json(json!({ "keyHash": hash_api_key(KEY) })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "valid": true,
                "userId": "user-9",
                "apiKeyId": "key-9"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, 60);
        let first = client.validate(KEY).await.unwrap();
        let second = client.validate(KEY).await.unwrap();
        assert!(first.valid);
        assert_eq!(first, second);
        assert_eq!(second.api_key_id.as_deref(), Some("key-9"));
    }

    #[tokio::test]
    async fn negative_results_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/keys/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "valid": false,
                "error": "Key revoked"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server, 60);
        for _ in 0..2 {
            let validation = client.validate(KEY).await.unwrap();
            assert!(!validation.valid);
            assert_eq!(validation.error.as_deref(), Some("Key revoked"));
        }
    }

    #[tokio::test]
    async fn bad_prefix_never_reaches_the_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let validation = client(&server, 60).validate("nope").await.unwrap();
        assert_eq!(validation.error.as_deref(), Some("Invalid API key format"));
    }

    #[tokio::test]
    async fn server_error_is_connector_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/keys/validate"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
            .mount(&server)
            .await;

        assert!(matches!(
            client(&server, 60).validate(KEY).await,
            Err(ConnectorError::HttpError(_))
        ));
    }

    #[tokio::test]
    async fn records_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/keys/usage"))
            .and(body_json(json!({ "apiKeyId": "key-9" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server, 60).record_usage("key-9").await.unwrap();
    }
}
