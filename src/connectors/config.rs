use serde::{Deserialize, Serialize};

/// Which credential backend validates API keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Keys listed in configuration as SHA-256 hashes
    #[default]
    Static,
    /// External key service over HTTP
    KeyService,
    /// Any bearer credential passes; development only
    Disabled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub mode: AuthMode,
    pub keys: Vec<StaticKeyConfig>,
    pub key_service: Option<KeyServiceConfig>,
}

/// A configured key. Only the hash of the raw key is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticKeyConfig {
    /// Lowercase hex SHA-256 of the full key, prefix included
    pub key_hash: String,
    pub key_id: String,
    pub user_id: String,
}

/// External key service connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyServiceConfig {
    /// Base URL, e.g. http://localhost:4200/keys
    pub base_url: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// How long a positive validation is trusted
    pub cache_ttl_secs: u64,
    /// Bearer token for inter-service authentication (from env: KEY_SERVICE_AUTH_TOKEN)
    #[serde(skip)]
    pub auth_token: Option<String>,
}

impl Default for KeyServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4200/keys".to_string(),
            timeout_secs: 10,
            cache_ttl_secs: 60,
            auth_token: None,
        }
    }
}
