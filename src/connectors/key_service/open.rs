use async_trait::async_trait;

use super::{ApiKeyConnector, ApiKeyValidation};
use crate::connectors::errors::ConnectorError;

/// Accepts every credential. Selected by `auth.mode: disabled`.
pub struct OpenAccessConnector;

#[async_trait]
impl ApiKeyConnector for OpenAccessConnector {
    async fn validate(&self, _api_key: &str) -> Result<ApiKeyValidation, ConnectorError> {
        Ok(ApiKeyValidation::accepted(None, None))
    }

    async fn record_usage(&self, _api_key_id: &str) -> Result<(), ConnectorError> {
        Ok(())
    }
}
