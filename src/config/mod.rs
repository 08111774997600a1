//! Configuration loading and management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::error::ConfigError;

/// Connection settings for the database behind a row-count store.
///
/// The validator never opens a connection itself; these settings exist so
/// deployments can keep them next to their message overrides and hand
/// [`dsn`](DatabaseConfig::dsn) to whatever driver their store wraps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Driver name (e.g., "mysql", "pgsql")
    pub driver: String,

    pub host: String,

    pub port: u16,

    /// Database name
    pub database: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub charset: Option<String>,

    #[serde(default)]
    pub collation: Option<String>,

    /// Table name prefix, when the schema uses one
    #[serde(default)]
    pub prefix: Option<String>,
}

impl DatabaseConfig {
    /// Connection string in `driver:host=HOST:PORT;dbname=NAME` form
    pub fn dsn(&self) -> String {
        format!(
            "{}:host={}:{};dbname={}",
            self.driver, self.host, self.port, self.database
        )
    }
}

/// Complete configuration for the validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Message template overrides (rule name -> template)
    #[serde(default)]
    pub messages: HashMap<String, String>,

    /// Optional database settings for the caller's row-count store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

impl ValidatorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
