//! Credential backends for the API-key gate.
//!
//! Every backend implements [`ApiKeyConnector`]; the gate only sees the trait
//! object, so tests swap in a mock without any HTTP.
//!
//! ```ignore
//! let connector = connectors::init_api_keys(&settings.auth)?;
//! App::new().wrap(middleware::ApiKeyGate::new(connector.clone()))
//! ```

pub mod config;
pub mod errors;
pub mod key_service;

pub use config::{AuthMode, AuthSettings, KeyServiceConfig, StaticKeyConfig};
pub use errors::ConnectorError;
pub use key_service::{
    hash_api_key, ApiKeyConnector, ApiKeyIdentity, ApiKeyValidation, KeyServiceClient, KeyUsage,
    OpenAccessConnector, StaticKeyConnector, API_KEY_PREFIX,
};

pub use key_service::init as init_api_keys;
