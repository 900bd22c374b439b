use std::path::PathBuf;

/// Common storage configuration shared by service binaries.
///
/// The binary parses these from its config file or command-line
/// arguments, then passes them to storage layer initialization.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory containing static configuration files (YAML).
    /// These are loaded into the KV file layer (read-only).
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/stagetrack.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from command-line arguments.
    ///
    /// Supported flags:
    /// - `--data-dir=PATH`
    /// - `--db=PATH`
    /// - `--listen=ADDR`
    pub fn from_args(args: &[String]) -> Self {
        let mut config = ServiceConfig::default();

        for arg in args {
            if let Some(val) = arg.strip_prefix("--data-dir=") {
                config.data_dir = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--db=") {
                config.db_path = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--listen=") {
                config.listen = val.to_string();
            }
        }

        config
    }

    /// Resolve the redb database path, falling back to `{data_dir}/stagetrack.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            self.data_dir
                .as_ref()
                .map(|d| d.join("stagetrack.redb"))
                .unwrap_or_else(|| PathBuf::from("stagetrack.redb"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args() {
        let args = vec![
            "--data-dir=/tmp/stagetrack".to_string(),
            "--listen=127.0.0.1:9090".to_string(),
        ];
        let config = ServiceConfig::from_args(&args);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/stagetrack")));
        assert_eq!(config.listen, "127.0.0.1:9090");
    }

    #[test]
    fn test_resolve_db_path_defaults() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/data/stagetrack.redb"));

        let explicit = ServiceConfig {
            db_path: Some(PathBuf::from("/elsewhere/db.redb")),
            ..Default::default()
        };
        assert_eq!(explicit.resolve_db_path(), PathBuf::from("/elsewhere/db.redb"));
    }
}
