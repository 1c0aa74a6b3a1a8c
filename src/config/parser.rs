//! Configuration parser for loading the cluster description.
//!
//! This module handles loading configuration from YAML files and environment
//! variables, with proper precedence: YAML values first, `ORACLUST_*`
//! overrides on top, and secrets exclusively from the environment.

use crate::error::{ConfigError, OraclustError, Result};
use std::path::Path;
use tracing::{debug, info};

use super::spec::ProvisionConfig;

/// Configuration parser for loading provisioning configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<std::path::PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving the `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ProvisionConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(OraclustError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            OraclustError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<ProvisionConfig> {
        debug!("Parsing YAML configuration");

        let config: ProvisionConfig = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            OraclustError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        debug!(
            "Successfully parsed configuration for cluster alias: {}",
            config.cluster.alias
        );
        Ok(config)
    }

    /// Loads configuration with environment variable overrides and secret
    /// injection applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an
    /// override has an invalid value.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<ProvisionConfig> {
        let mut config = self.load_file(path)?;
        Self::apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Applies `ORACLUST_*` environment overrides and injects secrets.
    fn apply_env_overrides(config: &mut ProvisionConfig) -> Result<()> {
        if let Ok(host) = std::env::var("ORACLUST_API_HOST") {
            debug!("Overriding api.host from environment");
            config.api.host = host;
        }

        if let Ok(port) = std::env::var("ORACLUST_API_PORT") {
            debug!("Overriding api.port from environment");
            config.api.port = port.parse().map_err(|_| {
                OraclustError::Config(ConfigError::validation(
                    format!("ORACLUST_API_PORT is not a valid port: {port}"),
                    "api.port",
                ))
            })?;
        }

        if let Ok(username) = std::env::var("ORACLUST_API_USERNAME") {
            debug!("Overriding api.username from environment");
            config.api.username = username;
        }

        if let Ok(alias) = std::env::var("ORACLUST_CLUSTER_ALIAS") {
            debug!("Overriding cluster.alias from environment");
            config.cluster.alias = alias;
        }

        if let Ok(node_ip) = std::env::var("ORACLUST_NODE_IP") {
            debug!("Overriding cluster.node_ip from environment");
            config.cluster.node_ip = node_ip;
        }

        // Secrets never come from YAML.
        if let Ok(password) = std::env::var("ORACLUST_API_PASSWORD") {
            config.api.password = password;
        }

        if let Ok(password) = std::env::var("ORACLUST_SSH_PASSWORD") {
            config.cluster.ssh.password = password;
        }

        if let Ok(password) = std::env::var("ORACLUST_MONITOR_PASSWORD") {
            config.cluster.monitor.password = password;
        }

        Ok(())
    }

    /// Loads the `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the `.env` file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| std::path::PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                OraclustError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "oraclust.cluster.yaml",
    "oraclust.cluster.yml",
    "cluster.yaml",
    "cluster.yml",
];

/// Finds the configuration file in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if no configuration file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<std::path::PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(OraclustError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}
