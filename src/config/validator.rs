//! Configuration validation for the cluster description.
//!
//! Validation runs before any network call: every field the workflow will
//! send to the API must be present and plausible, and every secret must have
//! been injected from the environment.

use crate::error::{ConfigError, OraclustError, Result};
use tracing::debug;

use super::spec::{InstallConfig, ProvisionConfig};

/// Validator for provisioning configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors and warnings found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a provisioning configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self, config: &ProvisionConfig) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        Self::validate_api(config, &mut result);
        Self::validate_cluster(config, &mut result);

        if result.errors.is_empty() {
            debug!("Configuration validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(OraclustError::Config(ConfigError::ValidationError {
                message: first_error.message.clone(),
                field: Some(first_error.field.clone()),
            }))
        }
    }

    /// Validates the API section.
    fn validate_api(config: &ProvisionConfig, result: &mut ValidationResult) {
        let api = &config.api;

        if api.host.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("api.host"),
                message: String::from("API host cannot be empty"),
            });
        }

        if api.port == 0 {
            result.errors.push(ValidationError {
                field: String::from("api.port"),
                message: String::from("API port cannot be 0"),
            });
        }

        if api.username.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("api.username"),
                message: String::from("API username cannot be empty"),
            });
        }

        if api.password.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("api.password"),
                message: String::from(
                    "API password is empty; set ORACLUST_API_PASSWORD in the environment",
                ),
            });
        }
    }

    /// Validates the cluster section.
    fn validate_cluster(config: &ProvisionConfig, result: &mut ValidationResult) {
        let cluster = &config.cluster;

        if cluster.alias.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("cluster.alias"),
                message: String::from("Cluster alias cannot be empty"),
            });
        } else if !is_valid_alias(&cluster.alias) {
            result.errors.push(ValidationError {
                field: String::from("cluster.alias"),
                message: format!(
                    "Cluster alias '{}' is invalid. Must be lowercase alphanumeric with hyphens.",
                    cluster.alias
                ),
            });
        }

        if cluster.node_ip.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("cluster.node_ip"),
                message: String::from("Node IP cannot be empty"),
            });
        } else if !looks_like_ipv4(&cluster.node_ip) {
            result.warnings.push(format!(
                "cluster.node_ip: '{}' does not look like an IPv4 address",
                cluster.node_ip
            ));
        }

        if cluster.ssh.username.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("cluster.ssh.username"),
                message: String::from("SSH username cannot be empty"),
            });
        }

        if cluster.ssh.password.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("cluster.ssh.password"),
                message: String::from(
                    "SSH password is empty; set ORACLUST_SSH_PASSWORD in the environment",
                ),
            });
        }

        if cluster.ssh.port == 0 {
            result.errors.push(ValidationError {
                field: String::from("cluster.ssh.port"),
                message: String::from("SSH port cannot be 0"),
            });
        }

        if !cluster.ssh.public_key.is_empty() {
            result.warnings.push(String::from(
                "cluster.ssh.public_key is set but unused; the creation payload sends an empty key",
            ));
        }

        Self::validate_install(&cluster.oracle, "cluster.oracle", result);
        Self::validate_install(&cluster.grid, "cluster.grid", result);

        if cluster.monitor.user.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("cluster.monitor.user"),
                message: String::from("Monitor user cannot be empty"),
            });
        }

        if cluster.monitor.password.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("cluster.monitor.password"),
                message: String::from(
                    "Monitor password is empty; set ORACLUST_MONITOR_PASSWORD in the environment",
                ),
            });
        }
    }

    /// Validates an Oracle or Grid installation section.
    fn validate_install(install: &InstallConfig, prefix: &str, result: &mut ValidationResult) {
        if install.home.is_empty() {
            result.errors.push(ValidationError {
                field: format!("{prefix}.home"),
                message: String::from("Installation home cannot be empty"),
            });
        } else if !install.home.starts_with('/') {
            result.errors.push(ValidationError {
                field: format!("{prefix}.home"),
                message: format!("Installation home must be absolute: {}", install.home),
            });
        }

        if install.user.is_empty() {
            result.errors.push(ValidationError {
                field: format!("{prefix}.user"),
                message: String::from("Installation user cannot be empty"),
            });
        }
    }
}

/// Validates that an alias follows the naming convention.
/// Aliases must be lowercase alphanumeric with hyphens, starting with a letter.
fn is_valid_alias(alias: &str) -> bool {
    let mut chars = alias.chars();

    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }

    for c in chars {
        if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
            return false;
        }
    }

    !alias.ends_with('-') && !alias.contains("--")
}

/// Loose IPv4 shape check. The server does its own reachability check; this
/// only catches obvious typos early.
fn looks_like_ipv4(value: &str) -> bool {
    let octets: Vec<&str> = value.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| o.parse::<u8>().is_ok())
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::spec::{ApiConfig, ClusterConfig, MonitorConfig, SshConfig};

    fn valid_config() -> ProvisionConfig {
        ProvisionConfig {
            api: ApiConfig {
                host: String::from("192.168.1.99"),
                port: 11100,
                username: String::from("admin"),
                password: String::from("api-pass"),
            },
            cluster: ClusterConfig {
                alias: String::from("prod-rac"),
                node_ip: String::from("10.0.0.1"),
                ssh: SshConfig {
                    username: String::from("grid"),
                    password: String::from("ssh-pass"),
                    port: 22,
                    public_key: String::new(),
                },
                oracle: InstallConfig {
                    home: String::from("/u01/app/oracle/product/19.3.0/dbhome_1"),
                    user: String::from("oracle"),
                },
                grid: InstallConfig {
                    home: String::from("/u01/app/19.3.0/grid"),
                    user: String::from("grid"),
                },
                monitor: MonitorConfig {
                    user: String::from("c##monitor"),
                    password: String::from("monitor-pass"),
                },
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let result = ConfigValidator::new().validate(&valid_config()).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let mut config = valid_config();
        config.cluster.ssh.password.clear();
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert!(matches!(
            err,
            OraclustError::Config(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_relative_home_is_rejected() {
        let mut config = valid_config();
        config.cluster.oracle.home = String::from("u01/app/oracle");
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_odd_node_ip_only_warns() {
        let mut config = valid_config();
        config.cluster.node_ip = String::from("rac-node-1.internal");
        let result = ConfigValidator::new().validate(&config).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_valid_alias() {
        assert!(is_valid_alias("prod-rac"));
        assert!(is_valid_alias("rac19c"));
        assert!(is_valid_alias("a"));
    }

    #[test]
    fn test_invalid_alias() {
        assert!(!is_valid_alias(""));
        assert!(!is_valid_alias("Prod-Rac"));
        assert!(!is_valid_alias("19c-rac"));
        assert!(!is_valid_alias("prod_rac"));
        assert!(!is_valid_alias("prod-"));
        assert!(!is_valid_alias("prod--rac"));
    }
}
