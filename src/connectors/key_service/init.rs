use std::sync::Arc;

use super::{ApiKeyConnector, KeyServiceClient, OpenAccessConnector, StaticKeyConnector};
use crate::connectors::config::{AuthMode, AuthSettings};
use crate::connectors::errors::ConnectorError;

/// Build the credential backend selected by `auth.mode`
pub fn init(settings: &AuthSettings) -> Result<Arc<dyn ApiKeyConnector>, ConnectorError> {
    let connector: Arc<dyn ApiKeyConnector> = match settings.mode {
        AuthMode::Static => {
            let connector = StaticKeyConnector::new(&settings.keys);
            if connector.key_count() == 0 {
                tracing::warn!("No API keys configured: every MCP POST will be rejected");
            } else {
                tracing::info!("Loaded {} static API keys", connector.key_count());
            }
            Arc::new(connector)
        }
        AuthMode::KeyService => {
            let mut config = settings.key_service.clone().ok_or_else(|| {
                ConnectorError::Internal("auth.key_service is required in key_service mode".to_string())
            })?;
            if config.auth_token.is_none() {
                config.auth_token = std::env::var("KEY_SERVICE_AUTH_TOKEN").ok();
            }
            tracing::info!("Initializing key service connector: {}", config.base_url);
            Arc::new(KeyServiceClient::new(config)?)
        }
        AuthMode::Disabled => {
            tracing::warn!("API key authentication disabled - accepting any bearer credential");
            Arc::new(OpenAccessConnector)
        }
    };

    Ok(connector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_service_mode_needs_its_section() {
        let settings = AuthSettings {
            mode: AuthMode::KeyService,
            ..Default::default()
        };
        assert!(init(&settings).is_err());
    }

    #[tokio::test]
    async fn disabled_mode_accepts_anything() {
        let settings = AuthSettings {
            mode: AuthMode::Disabled,
            ..Default::default()
        };
        let connector = init(&settings).unwrap();
        assert!(connector.validate("whatever").await.unwrap().valid);
    }
}
