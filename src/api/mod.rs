//! Cluster management API integration.
//!
//! This module provides the authenticated HTTP client, the declarative
//! response-shape validation layer, the wire types, and the typed facade over
//! the remote cluster management API.

pub mod client;
pub mod cluster;
pub mod schema;
pub mod types;

pub use client::ApiClient;
pub use cluster::ClusterApi;
pub use schema::{FieldKind, Schema};
pub use types::{
    ClusterRecord, ConnectionHealth, ConnectionProbeRequest, CreateClusterRequest,
    DatabaseHostRef, DatabaseRecord, DbInstance, FindDatabaseRequest, FindHostData,
    FindHostRequest, FindPoolRequest, Host, InstanceHealth, PoolHostRef, ProvisionDatabase,
    ProvisionHost, ResourcePoolEntry, ScanEndpoint, ServiceNameBinding,
};
