//! API key validation and usage recording.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::connectors::errors::ConnectorError;

mod cache;
pub mod client;
mod init;
#[cfg(test)]
pub mod mock;
pub mod open;
pub mod static_keys;

pub use client::KeyServiceClient;
pub use init::init;
pub use open::OpenAccessConnector;
pub use static_keys::{KeyUsage, StaticKeyConnector};

/// Every issued key starts with this
pub const API_KEY_PREFIX: &str = "appleui_sk_";

/// Lowercase hex SHA-256 of a raw key
pub fn hash_api_key(api_key: &str) -> String {
    format!("{:x}", Sha256::digest(api_key.as_bytes()))
}

/// Verdict from a credential backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiKeyValidation {
    pub fn accepted(user_id: Option<String>, api_key_id: Option<String>) -> Self {
        Self {
            valid: true,
            user_id,
            api_key_id,
            error: None,
        }
    }

    pub fn rejected(error: &str) -> Self {
        Self {
            valid: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn identity(&self) -> ApiKeyIdentity {
        ApiKeyIdentity {
            user_id: self.user_id.clone(),
            api_key_id: self.api_key_id.clone(),
        }
    }
}

/// Who an authenticated request belongs to; stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyIdentity {
    pub user_id: Option<String>,
    pub api_key_id: Option<String>,
}

#[async_trait]
pub trait ApiKeyConnector: Send + Sync {
    /// `Ok` with `valid: false` for a rejected key; `Err` only when the
    /// backend itself could not answer.
    async fn validate(&self, api_key: &str) -> Result<ApiKeyValidation, ConnectorError>;

    async fn record_usage(&self, api_key_id: &str) -> Result<(), ConnectorError>;
}
