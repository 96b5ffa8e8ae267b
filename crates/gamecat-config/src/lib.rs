//! Configuration management for gamecat
//!
//! Loads the database credential file (`dbcredentials.toml`) that the
//! connection layer consumes. The file carries a single `[DB]` table:
//!
//! ```toml
//! [DB]
//! username = "catalog"
//! password = "secret"
//! ipaddress = "127.0.0.1"
//! port = 3306
//! dbname = "games.db"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Default credential file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "dbcredentials.toml";

/// Environment variable overriding the credential file location
pub const CONFIG_ENV_VAR: &str = "GAMECAT_CONFIG";

/// Database name that selects a private in-memory store
pub const MEMORY_DBNAME: &str = ":memory:";

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(rename = "DB")]
    pub db: DbConfig,
}

/// Connection parameters from the `[DB]` table
#[derive(Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub username: String,
    pub password: String,
    pub ipaddress: String,
    pub port: u16,
    pub dbname: String,

    /// Directory of the file this was loaded from; relative `dbname`s resolve against it
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Where the catalog store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    Memory,
    File(PathBuf),
}

impl DbConfig {
    /// Config for a private in-memory store
    pub fn in_memory() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            ipaddress: "localhost".to_string(),
            port: 3306,
            dbname: MEMORY_DBNAME.to_string(),
            base_dir: None,
        }
    }

    /// Check the parameters before a connection is attempted
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dbname.trim().is_empty() {
            return Err(ConfigError::Invalid("dbname must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Resolve `dbname` to a store location
    pub fn target(&self) -> DbTarget {
        if self.dbname == MEMORY_DBNAME {
            return DbTarget::Memory;
        }

        let path = PathBuf::from(&self.dbname);
        match &self.base_dir {
            Some(base) if path.is_relative() => DbTarget::File(base.join(path)),
            _ => DbTarget::File(path),
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("ipaddress", &self.ipaddress)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .finish()
    }
}

impl CatalogConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.db.validate()?;
        config.db.base_dir = path.parent().map(Path::to_path_buf);

        tracing::debug!("Loaded database configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from `$GAMECAT_CONFIG` or `./dbcredentials.toml`
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }

        Err(ConfigError::NotFound(local.to_path_buf()))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const SAMPLE: &str = r#"
[DB]
username = "catalog"
password = "hunter2"
ipaddress = "10.0.0.5"
port = 3307
dbname = "games.db"
"#;

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", SAMPLE).unwrap();

        let config = CatalogConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.db.username, "catalog");
        assert_eq!(config.db.password, "hunter2");
        assert_eq!(config.db.ipaddress, "10.0.0.5");
        assert_eq!(config.db.port, 3307);
        assert_eq!(config.db.dbname, "games.db");
    }

    #[test]
    fn test_relative_dbname_resolves_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dbcredentials.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = CatalogConfig::load(&path).unwrap();
        assert_eq!(
            config.db.target(),
            DbTarget::File(dir.path().join("games.db"))
        );
    }

    #[test]
    fn test_memory_target() {
        assert_eq!(DbConfig::in_memory().target(), DbTarget::Memory);
    }

    #[test]
    fn test_missing_file() {
        let err = CatalogConfig::load(Path::new("/nonexistent/dbcredentials.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_missing_db_table_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[other]\nkey = 1\n").unwrap();

        let err = CatalogConfig::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_validate_rejects_empty_dbname() {
        let mut db = DbConfig::in_memory();
        db.dbname = "  ".to_string();
        assert!(matches!(db.validate(), Err(ConfigError::Invalid(_))));

        let mut db = DbConfig::in_memory();
        db.port = 0;
        assert!(matches!(db.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut db = DbConfig::in_memory();
        db.password = "hunter2".to_string();
        let printed = format!("{:?}", db);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn test_save_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dbcredentials.toml");
        let config = CatalogConfig {
            db: DbConfig::in_memory(),
        };

        config.save(&path).unwrap();

        let loaded = CatalogConfig::load(&path).unwrap();
        assert_eq!(loaded.db.dbname, MEMORY_DBNAME);
        assert!(std::fs::read_to_string(&path).unwrap().contains("[DB]"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("dbcredentials.toml"));
        assert!(format!("{}", err).contains("not found"));

        let err = ConfigError::Invalid("bad port".to_string());
        assert!(format!("{}", err).contains("Invalid"));
    }
}
