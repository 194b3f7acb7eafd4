use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ApiKeyConnector, ApiKeyValidation};
use crate::connectors::errors::ConnectorError;

/// Scripted connector for gate tests
pub struct MockApiKeyConnector {
    outcome: Result<ApiKeyValidation, String>,
    usage_fails: bool,
    pub usage_calls: AtomicUsize,
}

impl MockApiKeyConnector {
    pub fn accepting(user_id: &str, api_key_id: &str) -> Self {
        Self {
            outcome: Ok(ApiKeyValidation::accepted(
                Some(user_id.to_string()),
                Some(api_key_id.to_string()),
            )),
            usage_fails: false,
            usage_calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(validation: ApiKeyValidation) -> Self {
        Self {
            outcome: Ok(validation),
            usage_fails: false,
            usage_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            outcome: Err("backend down".to_string()),
            usage_fails: true,
            usage_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_failing_usage(mut self) -> Self {
        self.usage_fails = true;
        self
    }
}

#[async_trait]
impl ApiKeyConnector for MockApiKeyConnector {
    async fn validate(&self, _api_key: &str) -> Result<ApiKeyValidation, ConnectorError> {
        self.outcome
            .clone()
            .map_err(ConnectorError::ServiceUnavailable)
    }

    async fn record_usage(&self, _api_key_id: &str) -> Result<(), ConnectorError> {
        self.usage_calls.fetch_add(1, Ordering::SeqCst);
        if self.usage_fails {
            return Err(ConnectorError::Internal("usage ledger offline".to_string()));
        }
        Ok(())
    }
}
