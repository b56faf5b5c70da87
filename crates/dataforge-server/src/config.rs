// Configuration module
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main server configuration, loaded from `dataforge.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub registry: RegistrySettings,
    #[serde(default)]
    pub vault: VaultSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 0 means one worker per CPU core.
    #[serde(default)]
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Where instance records are persisted.
    #[serde(default = "default_registry_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Secret the credential-vault key is derived from. The default exists
    /// so a fresh checkout starts; real deployments must override it.
    #[serde(default = "default_vault_secret")]
    pub secret: String,
}

impl VaultSettings {
    pub fn is_default_secret(&self) -> bool {
        self.secret == default_vault_secret()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console-only when absent.
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            secret: default_vault_secret(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
            log_to_console: true,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_registry_path() -> String {
    "data/instances.json".to_string()
}

fn default_vault_secret() -> String {
    "dataforge-dev-secret".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.workers, 0);
        assert_eq!(config.registry.path, "data/instances.json");
        assert!(config.vault.is_default_secret());
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.log_to_console);
        assert!(config.logging.file_path.is_none());
    }

    #[test]
    fn test_partial_file_overrides() {
        let config: ServerConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [vault]
            secret = "deployment-secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.vault.is_default_secret());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataforge.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
    }
}
