//! Cluster provisioning orchestrator.
//!
//! Runs the provisioning workflow as five sequential stages: discover hosts,
//! allocate the database resource pool, discover databases, health-check and
//! resolve service names, then issue the creation call and resolve the new
//! cluster's id by alias. The first failure at any stage aborts the whole
//! run; there is no retry and no rollback of partial server-side work.

use std::collections::{HashMap, HashSet};
use tracing::info;

use crate::api::types::{
    ConnectionHealth, ConnectionProbeRequest, CreateClusterRequest, FindDatabaseRequest,
    FindHostRequest, FindPoolRequest, ProvisionDatabase, ProvisionHost,
};
use crate::api::ClusterApi;
use crate::config::ClusterConfig;
use crate::error::{ClusterError, Result};

/// Sequential provisioning workflow over the cluster management facade.
///
/// Each run owns exactly one API client (held by the facade); runs are
/// independent and share no state.
#[derive(Debug)]
pub struct ClusterProvisioner<'a> {
    /// Typed API facade.
    api: &'a ClusterApi,
    /// Target cluster description.
    cluster: &'a ClusterConfig,
}

impl<'a> ClusterProvisioner<'a> {
    /// Creates a provisioner for one cluster description.
    #[must_use]
    pub const fn new(api: &'a ClusterApi, cluster: &'a ClusterConfig) -> Self {
        Self { api, cluster }
    }

    /// Runs the full provisioning workflow and returns the created cluster's
    /// server-generated id.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered at any stage; the run is
    /// all-or-nothing and re-running after a partial failure may recreate
    /// resources that already exist server-side.
    pub async fn provision(&self) -> Result<u64> {
        let ssh = &self.cluster.ssh;
        let oracle = &self.cluster.oracle;
        let grid = &self.cluster.grid;
        let monitor = &self.cluster.monitor;

        // Stage 1: discover the topology from the one known node.
        info!("Discovering cluster topology from node {}", self.cluster.node_ip);
        let discovery = self
            .api
            .find_host(&FindHostRequest {
                host_ip: self.cluster.node_ip.clone(),
                username: ssh.username.clone(),
                password: ssh.password.clone(),
                gi_home: grid.home.clone(),
                grid_user: grid.user.clone(),
                oracle_user: oracle.user.clone(),
                oracle_home: oracle.home.clone(),
                ssh_port: ssh.port,
            })
            .await?;
        info!(
            "Discovered cluster '{}' with {} hosts",
            discovery.cluster_name,
            discovery.hosts.len()
        );

        // Stage 2: resource pools, pass-through data for the creation call.
        let pools = self
            .api
            .find_resource_database_pool(&FindPoolRequest {
                hosts: discovery
                    .hosts
                    .iter()
                    .map(|h| h.pool_ref(&ssh.username, &ssh.password, ssh.port))
                    .collect(),
                oracle_home: oracle.home.clone(),
                oracle_user: oracle.user.clone(),
            })
            .await?;
        info!("Found {} resource pools", pools.len());

        // Stage 3: databases across all discovered hosts.
        let databases = self
            .api
            .find_database(&FindDatabaseRequest {
                username: ssh.username.clone(),
                oracle_home: oracle.home.clone(),
                oracle_user: oracle.user.clone(),
                gi_home: grid.home.clone(),
                grid_user: grid.user.clone(),
                hosts: discovery
                    .hosts
                    .iter()
                    .map(|h| h.database_ref(&ssh.username, &ssh.password, ssh.port))
                    .collect(),
            })
            .await?;
        info!("Discovered {} databases", databases.len());

        // Stage 4: keep only databases whose every instance is reachable,
        // then resolve service names for that subset alone.
        let connections = self
            .api
            .get_database_connection(&ConnectionProbeRequest {
                cluster_scan_ip: discovery.cluster_scan_ip.clone(),
                o_user: monitor.user.clone(),
                o_pass: monitor.password.clone(),
                databases: databases.clone(),
            })
            .await?;

        let healthy: Vec<ConnectionHealth> = connections
            .into_iter()
            .filter(ConnectionHealth::is_healthy)
            .collect();
        info!("{} of {} databases are healthy", healthy.len(), databases.len());

        let bindings = self
            .api
            .get_database_service_name(&ConnectionProbeRequest {
                cluster_scan_ip: discovery.cluster_scan_ip.clone(),
                o_user: monitor.user.clone(),
                o_pass: monitor.password.clone(),
                databases: healthy.clone(),
            })
            .await?;

        let service_names: HashMap<String, Vec<String>> = bindings
            .into_iter()
            .map(|binding| (binding.db_name, binding.service_name))
            .collect();
        let healthy_names: HashSet<String> =
            healthy.iter().map(|health| health.db_name.clone()).collect();

        let mut provision_databases = Vec::with_capacity(healthy_names.len());
        for record in databases {
            if !healthy_names.contains(&record.db_name) {
                continue;
            }
            let service_name = service_names.get(&record.db_name).cloned().ok_or_else(|| {
                ClusterError::ServiceNameMissing {
                    db_name: record.db_name.clone(),
                }
            })?;
            provision_databases.push(ProvisionDatabase::new(record, service_name));
        }

        // Stage 5: assemble the full creation payload and resolve the result.
        let request = CreateClusterRequest {
            cluster_name: discovery.cluster_name,
            cluster_alias_name: self.cluster.alias.clone(),
            oracle_home: oracle.home.clone(),
            oracle_user: oracle.user.clone(),
            o_user: monitor.user.clone(),
            o_pass: monitor.password.clone(),
            grid_user: grid.user.clone(),
            gi_home: grid.home.clone(),
            cluster_scan_ip: discovery.cluster_scan_ip,
            cluster_ssh_port: ssh.port,
            cluster_ssh_password: ssh.password.clone(),
            cluster_ssh_pub_key: String::new(),
            cluster_ssh_user: ssh.username.clone(),
            databases: provision_databases,
            pools,
            hosts: discovery
                .hosts
                .iter()
                .map(|h| ProvisionHost::new(h, &ssh.username, &ssh.password, ssh.port))
                .collect(),
        };

        self.api.create_cluster(&request).await?;
        info!(
            "Cluster creation accepted; resolving alias '{}'",
            self.cluster.alias
        );

        let record = self.api.get_cluster_by_alias(&self.cluster.alias).await?;
        info!(
            "Provisioned cluster '{}' with id {}",
            record.alias_name, record.cluster_id
        );
        Ok(record.cluster_id)
    }

    /// Removes the cluster matching the configured alias.
    ///
    /// # Errors
    ///
    /// Returns an error if the alias cannot be resolved or the removal call
    /// fails.
    pub async fn remove(&self) -> Result<u64> {
        let record = self.api.get_cluster_by_alias(&self.cluster.alias).await?;
        info!(
            "Removing cluster '{}' (id {})",
            record.alias_name, record.cluster_id
        );
        self.api.remove_cluster(record.cluster_id).await?;
        Ok(record.cluster_id)
    }
}
