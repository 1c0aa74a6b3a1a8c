//! Wire types for the cluster management API.
//!
//! Response payloads are decoded from values the schema layer has already
//! validated; request payloads are assembled explicitly by the facade and the
//! provisioner. All of these are transient values scoped to a single
//! orchestration run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// A cluster-level SCAN listener endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanEndpoint {
    /// SCAN name.
    pub scan_name: String,
    /// SCAN virtual IP.
    pub scan_ip: String,
    /// SCAN listener port.
    pub scan_port: u16,
}

/// A discovered cluster node candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    /// Node IP address.
    pub ip: String,
    /// Node hostname.
    pub host_name: String,
    /// Node virtual IP.
    pub vip: String,
    /// Local listener port.
    pub oracle_listener_port: u16,
    /// Whether the server could reach the node. Always true in validated
    /// responses; the find-host schema rejects disconnected hosts.
    pub connected: bool,
}

/// The full find-host discovery result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindHostData {
    /// Server-side cluster name.
    pub cluster_name: String,
    /// SCAN endpoints for the cluster.
    pub cluster_scan_ip: Vec<ScanEndpoint>,
    /// Discovered nodes.
    pub hosts: Vec<Host>,
}

/// A named database resource-pool allocation spanning a subset of hosts.
///
/// `importance`, `min`, and `max` are strings on the wire; pool entries are
/// pass-through data for the final creation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePoolEntry {
    /// Pool name.
    pub pool_name: String,
    /// Pool importance.
    pub importance: String,
    /// Minimum allocation.
    pub min: String,
    /// Maximum allocation.
    pub max: String,
    /// Hosts currently backing the pool; opaque server data.
    pub active_hosts: Value,
}

/// A running database instance on a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DbInstance {
    /// Node the instance runs on.
    pub host_name: String,
    /// Instance name.
    pub inst_name: String,
    /// Instance status (e.g. `OPEN`).
    pub inst_stat: String,
}

/// A discovered database and its instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseRecord {
    /// Database name.
    pub db_name: String,
    /// Opaque database configuration; sent back verbatim on creation.
    pub config: Value,
    /// Opaque per-database host data; sent back verbatim on creation.
    pub hosts: Value,
    /// Running instances.
    pub instances: Vec<DbInstance>,
}

/// Reachability of one database instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceHealth {
    /// Instance name.
    pub inst_name: String,
    /// Whether the monitor user could connect.
    pub connected: bool,
}

/// Per-instance connectivity result for one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionHealth {
    /// Database name.
    pub db_name: String,
    /// Per-instance results.
    pub instances: Vec<InstanceHealth>,
}

/// A database-to-service-name binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceNameBinding {
    /// Database name.
    pub db_name: String,
    /// Registered network service names.
    pub service_name: Vec<String>,
}

/// A provisioned cluster as it appears in the general listing. The server
/// sends more fields; only the two needed for alias resolution are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRecord {
    /// Server-generated cluster id.
    pub cluster_id: u64,
    /// Human-assigned alias.
    pub alias_name: String,
}

impl ConnectionHealth {
    /// A database is healthy iff it reported at least one instance and every
    /// instance connection succeeded. A single failed instance excludes the
    /// whole database.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        !self.instances.is_empty() && self.instances.iter().all(|inst| inst.connected)
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Request body for host discovery.
#[derive(Debug, Clone, Serialize)]
pub struct FindHostRequest {
    /// IP of any known cluster node.
    pub host_ip: String,
    /// SSH username.
    pub username: String,
    /// SSH password.
    pub password: String,
    /// Grid Infrastructure home path.
    pub gi_home: String,
    /// Grid OS user.
    pub grid_user: String,
    /// Oracle OS user.
    pub oracle_user: String,
    /// Oracle home path.
    pub oracle_home: String,
    /// SSH port.
    pub ssh_port: u16,
}

/// Per-host reference used for pool discovery.
#[derive(Debug, Clone, Serialize)]
pub struct PoolHostRef {
    /// Node IP address.
    pub ip: String,
    /// SSH username.
    pub username: String,
    /// SSH password.
    pub password: String,
    /// SSH port.
    pub ssh_port: u16,
}

/// Request body for resource-pool discovery.
#[derive(Debug, Clone, Serialize)]
pub struct FindPoolRequest {
    /// Hosts to probe.
    pub hosts: Vec<PoolHostRef>,
    /// Oracle home path.
    pub oracle_home: String,
    /// Oracle OS user.
    pub oracle_user: String,
}

/// Per-host reference used for database discovery; extends the pool reference
/// with the node identity fields.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseHostRef {
    /// Node IP address.
    pub ip: String,
    /// SSH username.
    pub username: String,
    /// SSH password.
    pub password: String,
    /// SSH port.
    pub ssh_port: u16,
    /// Node virtual IP.
    pub vip: String,
    /// Node hostname.
    pub host_name: String,
}

/// Request body for database discovery.
#[derive(Debug, Clone, Serialize)]
pub struct FindDatabaseRequest {
    /// SSH username.
    pub username: String,
    /// Oracle home path.
    pub oracle_home: String,
    /// Oracle OS user.
    pub oracle_user: String,
    /// Grid Infrastructure home path.
    pub gi_home: String,
    /// Grid OS user.
    pub grid_user: String,
    /// Hosts to probe.
    pub hosts: Vec<DatabaseHostRef>,
}

/// Request body for the connectivity and service-name probes. The `databases`
/// slot carries whichever records the probe is scoped to: full database
/// records for the connection check, the healthy connectivity subset for the
/// service-name lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionProbeRequest<T> {
    /// SCAN endpoints from discovery.
    pub cluster_scan_ip: Vec<ScanEndpoint>,
    /// Monitor username.
    pub o_user: String,
    /// Monitor password.
    pub o_pass: String,
    /// Records the probe is scoped to.
    pub databases: Vec<T>,
}

/// A healthy database enriched with its service names for the creation call.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionDatabase {
    /// Database name.
    pub db_name: String,
    /// Opaque configuration, passed back verbatim.
    pub config: Value,
    /// Opaque per-database host data, passed back verbatim.
    pub hosts: Value,
    /// Running instances.
    pub instances: Vec<DbInstance>,
    /// Service names resolved for this database.
    pub service_name: Vec<String>,
}

impl ProvisionDatabase {
    /// Attaches resolved service names to a discovered database record.
    #[must_use]
    pub fn new(record: DatabaseRecord, service_name: Vec<String>) -> Self {
        Self {
            db_name: record.db_name,
            config: record.config,
            hosts: record.hosts,
            instances: record.instances,
            service_name,
        }
    }
}

/// A host entry in the creation payload: the discovered node plus SSH
/// credentials, marked connected, with an empty placeholder public key.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionHost {
    /// Node IP address.
    pub ip: String,
    /// SSH username.
    pub username: String,
    /// SSH password.
    pub password: String,
    /// SSH port.
    pub ssh_port: u16,
    /// Node virtual IP.
    pub vip: String,
    /// Node hostname.
    pub host_name: String,
    /// Always true for hosts that survived discovery.
    pub connected: bool,
    /// Local listener port.
    pub oracle_listener_port: u16,
    /// Placeholder public key; password auth is used throughout.
    pub pub_key: String,
}

impl ProvisionHost {
    /// Builds the creation entry for one discovered host.
    #[must_use]
    pub fn new(host: &Host, ssh_username: &str, ssh_password: &str, ssh_port: u16) -> Self {
        Self {
            ip: host.ip.clone(),
            username: ssh_username.to_string(),
            password: ssh_password.to_string(),
            ssh_port,
            vip: host.vip.clone(),
            host_name: host.host_name.clone(),
            connected: true,
            oracle_listener_port: host.oracle_listener_port,
            pub_key: String::new(),
        }
    }
}

/// The full cluster-creation payload, assembled from every prior stage.
///
/// Each part is copied in explicitly; the struct itself is the aggregate, so
/// a colliding field name is a compile error rather than a silent overwrite.
#[derive(Debug, Clone, Serialize)]
pub struct CreateClusterRequest {
    /// Server-side cluster name from discovery.
    pub cluster_name: String,
    /// Operator-assigned alias.
    pub cluster_alias_name: String,
    /// Oracle home path.
    pub oracle_home: String,
    /// Oracle OS user.
    pub oracle_user: String,
    /// Monitor username.
    pub o_user: String,
    /// Monitor password.
    pub o_pass: String,
    /// Grid OS user.
    pub grid_user: String,
    /// Grid Infrastructure home path.
    pub gi_home: String,
    /// SCAN endpoints from discovery.
    pub cluster_scan_ip: Vec<ScanEndpoint>,
    /// SSH port.
    pub cluster_ssh_port: u16,
    /// SSH password.
    pub cluster_ssh_password: String,
    /// Placeholder public key.
    pub cluster_ssh_pub_key: String,
    /// SSH username.
    pub cluster_ssh_user: String,
    /// Healthy databases enriched with service names.
    pub databases: Vec<ProvisionDatabase>,
    /// Resource pools from discovery, passed through.
    pub pools: Vec<ResourcePoolEntry>,
    /// Per-host creation entries.
    pub hosts: Vec<ProvisionHost>,
}

impl Host {
    /// Builds the pool-discovery reference for this host.
    #[must_use]
    pub fn pool_ref(&self, ssh_username: &str, ssh_password: &str, ssh_port: u16) -> PoolHostRef {
        PoolHostRef {
            ip: self.ip.clone(),
            username: ssh_username.to_string(),
            password: ssh_password.to_string(),
            ssh_port,
        }
    }

    /// Builds the database-discovery reference for this host.
    #[must_use]
    pub fn database_ref(
        &self,
        ssh_username: &str,
        ssh_password: &str,
        ssh_port: u16,
    ) -> DatabaseHostRef {
        DatabaseHostRef {
            ip: self.ip.clone(),
            username: ssh_username.to_string(),
            password: ssh_password.to_string(),
            ssh_port,
            vip: self.vip.clone(),
            host_name: self.host_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn health(db_name: &str, connections: &[bool]) -> ConnectionHealth {
        ConnectionHealth {
            db_name: db_name.to_string(),
            instances: connections
                .iter()
                .enumerate()
                .map(|(i, connected)| InstanceHealth {
                    inst_name: format!("{db_name}{n}", n = i + 1),
                    connected: *connected,
                })
                .collect(),
        }
    }

    #[test]
    fn test_all_instances_connected_is_healthy() {
        assert!(health("orcl", &[true, true]).is_healthy());
    }

    #[test]
    fn test_single_failed_instance_excludes_the_database() {
        assert!(!health("orcl", &[true, false, true]).is_healthy());
    }

    #[test]
    fn test_no_instances_is_not_healthy() {
        assert!(!health("orcl", &[]).is_healthy());
    }

    #[test]
    fn test_provision_host_is_marked_connected_with_empty_key() {
        let host = Host {
            ip: String::from("10.0.0.1"),
            host_name: String::from("h1"),
            vip: String::from("10.0.0.2"),
            oracle_listener_port: 1521,
            connected: true,
        };

        let entry = ProvisionHost::new(&host, "grid", "secret", 22);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "ip": "10.0.0.1",
                "username": "grid",
                "password": "secret",
                "ssh_port": 22,
                "vip": "10.0.0.2",
                "host_name": "h1",
                "connected": true,
                "oracle_listener_port": 1521,
                "pub_key": "",
            })
        );
    }

    #[test]
    fn test_database_ref_carries_node_identity() {
        let host = Host {
            ip: String::from("10.0.0.1"),
            host_name: String::from("h1"),
            vip: String::from("10.0.0.2"),
            oracle_listener_port: 1521,
            connected: true,
        };

        let db_ref = host.database_ref("grid", "secret", 22);
        assert_eq!(db_ref.vip, "10.0.0.2");
        assert_eq!(db_ref.host_name, "h1");
    }
}
