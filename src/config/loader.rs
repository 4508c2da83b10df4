//! Configuration loading from disk and the environment.

use std::path::Path;
use std::fs;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "STOREFRONT_CONFIG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML config file. Validation happens later, after environment
/// overrides are applied.
pub fn parse_file(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

impl ServerConfig {
    /// Load the effective configuration: the file named by
    /// `STOREFRONT_CONFIG` if set (otherwise defaults), then environment
    /// overrides, then validation.
    pub fn load() -> Result<ServerConfig, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                tracing::info!(path = %path, "Loading config file");
                parse_file(Path::new(&path))?
            }
            Err(_) => ServerConfig::default(),
        };

        config.apply_overrides(std::env::vars());
        validate_config(&config).map_err(ConfigError::Validation)?;

        Ok(config)
    }
}
