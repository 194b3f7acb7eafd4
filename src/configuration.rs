use serde;

use crate::connectors::AuthSettings;

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app_host: String,
    pub app_port: u16,
    /// Route the MCP endpoint is mounted on
    pub mcp_path: String,
    pub server: ServerSettings,
    pub transport: TransportSettings,
    pub session: SessionSettings,
    pub auth: AuthSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_host: "127.0.0.1".to_string(),
            app_port: 8000,
            mcp_path: "/mcp".to_string(),
            server: ServerSettings::default(),
            transport: TransportSettings::default(),
            session: SessionSettings::default(),
            auth: AuthSettings::default(),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Externally reachable base URL, used in discovery documents
    pub public_url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: "appleui-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Apple Human Interface Guidelines design tools over MCP".to_string(),
            public_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Fresh protocol server per POST
    #[default]
    Stateless,
    /// Sessions keyed by the mcp-session-id header
    Stateful,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    pub mode: TransportMode,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Idle time after which a stateful session is evicted
    pub ttl_secs: u64,
    pub max_sessions: usize,
    /// Interval between keep-alive comments on the event stream
    pub keep_alive_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 1800,
            max_sessions: 10_000,
            keep_alive_secs: 15,
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    get_configuration_from("configuration")
}

/// Read `<name>.{yaml,json,toml,...}` (optional) and `APP__`-prefixed
/// environment variables, e.g. `APP__TRANSPORT__MODE=stateful`.
pub fn get_configuration_from(name: &str) -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = config::Config::builder()
        .add_source(config::File::with_name(name).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::AuthMode;

    #[test]
    fn defaults_without_any_source() {
        let settings = get_configuration_from("does-not-exist").unwrap();
        assert_eq!(settings.mcp_path, "/mcp");
        assert_eq!(settings.transport.mode, TransportMode::Stateless);
        assert_eq!(settings.session.ttl_secs, 1800);
        assert_eq!(settings.session.max_sessions, 10_000);
        assert_eq!(settings.auth.mode, AuthMode::Static);
    }

    #[test]
    fn reads_yaml_file() {
        let dir = std::env::temp_dir().join(format!("appleui-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("settings.yaml");
        std::fs::write(
            &file,
            r#"
app_port: 9100
transport:
  mode: stateful
session:
  ttl_secs: 120
auth:
  mode: static
  keys:
    - key_hash: "abc"
      key_id: "key-1"
      user_id: "user-1"
"#,
        )
        .unwrap();

        let name = dir.join("settings");
        let settings = get_configuration_from(name.to_str().unwrap()).unwrap();
        assert_eq!(settings.app_port, 9100);
        assert_eq!(settings.transport.mode, TransportMode::Stateful);
        assert_eq!(settings.session.ttl_secs, 120);
        assert_eq!(settings.session.keep_alive_secs, 15);
        assert_eq!(settings.auth.keys.len(), 1);
        assert_eq!(settings.auth.keys[0].key_id, "key-1");

        std::fs::remove_dir_all(dir).ok();
    }
}
