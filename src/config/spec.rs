//! Configuration types for a provisioning run.
//!
//! These structs map to the `oraclust.cluster.yaml` file. Secrets (API login
//! password, SSH password, monitor password) are never read from YAML; the
//! parser injects them from environment variables.

use serde::{Deserialize, Serialize};

/// The root configuration for a provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisionConfig {
    /// Management API endpoint and login.
    pub api: ApiConfig,
    /// Target cluster description.
    pub cluster: ClusterConfig,
}

/// Management API endpoint and operator login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// API host.
    pub host: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
    /// Login username.
    pub username: String,
    /// Login password; injected from `ORACLUST_API_PASSWORD`.
    #[serde(default, skip_serializing)]
    pub password: String,
}

/// Target cluster description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Operator-assigned alias for the cluster, used for lookup after
    /// creation.
    pub alias: String,
    /// IP of any known cluster node; discovery starts here.
    pub node_ip: String,
    /// SSH access to the cluster nodes.
    pub ssh: SshConfig,
    /// Oracle installation.
    pub oracle: InstallConfig,
    /// Grid Infrastructure installation.
    pub grid: InstallConfig,
    /// Monitor database credentials.
    pub monitor: MonitorConfig,
}

/// SSH access to the cluster nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SshConfig {
    /// SSH username.
    pub username: String,
    /// SSH password; injected from `ORACLUST_SSH_PASSWORD`.
    #[serde(default, skip_serializing)]
    pub password: String,
    /// SSH port.
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    /// SSH public key. The creation payload always sends an empty
    /// placeholder; this field is accepted but currently unused.
    #[serde(default)]
    pub public_key: String,
}

/// An Oracle or Grid installation: home path plus owning OS user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallConfig {
    /// Installation home path.
    pub home: String,
    /// Owning OS user.
    pub user: String,
}

/// Monitor database credentials used for connectivity probes and the
/// creation payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Monitor username.
    pub user: String,
    /// Monitor password; injected from `ORACLUST_MONITOR_PASSWORD`.
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl ApiConfig {
    /// The base URL the client connects to.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{host}:{port}", host = self.host, port = self.port)
    }
}

const fn default_api_port() -> u16 {
    11100
}

const fn default_ssh_port() -> u16 {
    22
}
