//! Server-side configuration.
//!
//! Loaded from a TOML file resolved by context name
//! (`/etc/stagetrack/<name>.toml`) or by explicit path.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Server configuration file.
///
/// ```toml
/// listen = "0.0.0.0:8080"
///
/// [storage]
/// data-dir = "/var/lib/stagetrack"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address; the CLI `--listen` flag overrides it.
    #[serde(default)]
    pub listen: Option<String>,

    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the database file and the read-only YAML
    /// configuration (items/, karigars.yaml). The single deployment
    /// secret of this service.
    #[serde(rename = "data-dir", default)]
    pub data_dir: String,

    /// Explicit database file path; defaults under data-dir.
    #[serde(rename = "db-path", default)]
    pub db_path: Option<String>,
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    ///
    /// A bare name (no `/` or `.`) resolves to `/etc/stagetrack/<name>.toml`;
    /// anything else is used as a path directly.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/stagetrack/{}.toml", name_or_path))
        }
    }

    /// Load configuration from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/stagetrack/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("/tmp/s.toml"),
            PathBuf::from("/tmp/s.toml")
        );
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        std::fs::write(
            &path,
            "listen = \"127.0.0.1:9090\"\n\n[storage]\ndata-dir = \"/var/lib/stagetrack\"\n",
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.listen.as_deref(), Some("127.0.0.1:9090"));
        assert_eq!(config.storage.data_dir, "/var/lib/stagetrack");
        assert!(config.storage.db_path.is_none());
    }

    #[test]
    fn test_load_missing_config_fails() {
        assert!(ServerConfig::load(Path::new("/nonexistent/stagetrack.toml")).is_err());
    }
}
