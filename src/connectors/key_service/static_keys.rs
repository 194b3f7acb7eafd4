use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{hash_api_key, ApiKeyConnector, ApiKeyValidation, API_KEY_PREFIX};
use crate::connectors::config::StaticKeyConfig;
use crate::connectors::errors::ConnectorError;

#[derive(Debug, Clone, PartialEq)]
pub struct KeyUsage {
    pub request_count: u64,
    pub last_used_at: chrono::DateTime<chrono::Utc>,
}

struct KnownKey {
    key_id: String,
    user_id: String,
}

/// Validates keys against hashes from configuration
pub struct StaticKeyConnector {
    keys: HashMap<String, KnownKey>,
    usage: RwLock<HashMap<String, KeyUsage>>,
}

impl StaticKeyConnector {
    pub fn new(entries: &[StaticKeyConfig]) -> Self {
        let keys = entries
            .iter()
            .map(|entry| {
                (
                    entry.key_hash.trim().to_lowercase(),
                    KnownKey {
                        key_id: entry.key_id.clone(),
                        user_id: entry.user_id.clone(),
                    },
                )
            })
            .collect();

        Self {
            keys,
            usage: RwLock::new(HashMap::new()),
        }
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub async fn usage(&self, key_id: &str) -> Option<KeyUsage> {
        self.usage.read().await.get(key_id).cloned()
    }
}

#[async_trait]
impl ApiKeyConnector for StaticKeyConnector {
    #[tracing::instrument(name = "Validate static API key", skip_all)]
    async fn validate(&self, api_key: &str) -> Result<ApiKeyValidation, ConnectorError> {
        if !api_key.starts_with(API_KEY_PREFIX) {
            return Ok(ApiKeyValidation::rejected("Invalid API key format"));
        }

        match self.keys.get(&hash_api_key(api_key)) {
            Some(known) => Ok(ApiKeyValidation::accepted(
                Some(known.user_id.clone()),
                Some(known.key_id.clone()),
            )),
            None => Ok(ApiKeyValidation::rejected("Invalid or expired API key")),
        }
    }

    async fn record_usage(&self, api_key_id: &str) -> Result<(), ConnectorError> {
        if !self.keys.values().any(|k| k.key_id == api_key_id) {
            return Err(ConnectorError::NotFound(format!("API key {}", api_key_id)));
        }

        let now = chrono::Utc::now();
        let mut usage = self.usage.write().await;
        usage
            .entry(api_key_id.to_string())
            .and_modify(|u| {
                u.request_count += 1;
                u.last_used_at = now;
            })
            .or_insert(KeyUsage {
                request_count: 1,
                last_used_at: now,
            });
        Ok(())
    }
}
