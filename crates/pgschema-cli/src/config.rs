//! Database configuration file loading.

use std::fs;
use std::path::{Path, PathBuf};

use pgschema_core::ConnectionParams;
use serde::Deserialize;
use thiserror::Error;

/// Default PostgreSQL port.
const DEFAULT_PORT: u16 = 5432;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Database configuration file.
///
/// ```toml
/// [postgresql]
/// host = "db.internal"
/// port = 5432
/// dbname = "app"
/// user = "deploy"
/// password = "secret"
/// ```
#[derive(Debug, Deserialize)]
pub struct FileConfig {
    pub postgresql: PostgresSection,
}

#[derive(Debug, Deserialize)]
pub struct PostgresSection {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl FileConfig {
    /// Load and parse the configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Connection parameters for the external tools.
    pub fn into_params(self) -> ConnectionParams {
        ConnectionParams {
            host: self.postgresql.host,
            port: self.postgresql.port,
            dbname: self.postgresql.dbname,
            user: self.postgresql.user,
            password: self.postgresql.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
[postgresql]
host = "db.internal"
port = 5433
dbname = "main"
user = "deploy"
password = "secret"
"#,
        )
        .unwrap();

        let params = config.into_params();
        assert_eq!(params.host, "db.internal");
        assert_eq!(params.port, 5433);
        assert_eq!(params.dbname, "main");
    }

    #[test]
    fn test_port_defaults_to_5432() {
        let config: FileConfig = toml::from_str(
            r#"
[postgresql]
host = "localhost"
dbname = "main"
user = "deploy"
password = "secret"
"#,
        )
        .unwrap();
        assert_eq!(config.postgresql.port, DEFAULT_PORT);
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let result: Result<FileConfig, _> = toml::from_str(
            r#"
[postgresql]
host = "localhost"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_reports_missing_file_path() {
        let err = FileConfig::load(Path::new("/nonexistent/pgschema.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pgschema.toml"));
    }
}
