//! Cluster management facade.
//!
//! Each operation builds a typed request body, invokes the HTTP client, and
//! checks the response envelope `{error_code, data}`. A non-zero `error_code`
//! is an application-level failure carrying the whole envelope; on success
//! the `data` payload is validated against the operation's declared shape and
//! decoded into its typed form.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ClusterError, Result, SchemaError};

use super::client::ApiClient;
use super::schema;
use super::types::{
    ClusterRecord, ConnectionHealth, ConnectionProbeRequest, CreateClusterRequest,
    DatabaseRecord, FindDatabaseRequest, FindHostData, FindHostRequest, FindPoolRequest,
    ResourcePoolEntry, ServiceNameBinding,
};

/// Cluster resource endpoint (create, delete by id).
const CLUSTER_PATH: &str = "/cloud/cluster";

/// General cluster listing endpoint.
const CLUSTER_LIST_PATH: &str = "/cloud/cluster/general";

/// Host discovery endpoint.
const FIND_HOST_PATH: &str = "/cloud/cluster/node/find";

/// Resource-pool discovery endpoint.
const FIND_POOL_PATH: &str = "/cloud/cluster/dbpool/find";

/// Database discovery endpoint.
const FIND_DATABASE_PATH: &str = "/cloud/cluster/db/find";

/// Database connectivity probe endpoint.
const CONNECTION_PATH: &str = "/cloud/cluster/databases/connection";

/// Database service-name lookup endpoint.
const SERVICE_NAME_PATH: &str = "/cloud/cluster/databases/servicename";

/// Typed facade over the cluster management API.
#[derive(Debug)]
pub struct ClusterApi {
    /// Authenticated HTTP client.
    client: ApiClient,
}

impl ClusterApi {
    /// Creates a facade over an authenticated client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Discovers the cluster topology starting from one known node.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-zero envelope, or a
    /// payload that does not match the find-host shape (including any host
    /// reported as not connected).
    pub async fn find_host(&self, request: &FindHostRequest) -> Result<FindHostData> {
        debug!("Discovering hosts from node {}", request.host_ip);
        let envelope = self.client.post(FIND_HOST_PATH, request).await?;
        let data = unwrap_envelope(envelope)?;
        decode(schema::find_host().validate(&data)?)
    }

    /// Discovers the database resource pools spanning the given hosts.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-zero envelope, or a
    /// malformed payload.
    pub async fn find_resource_database_pool(
        &self,
        request: &FindPoolRequest,
    ) -> Result<Vec<ResourcePoolEntry>> {
        debug!("Discovering resource pools across {} hosts", request.hosts.len());
        let envelope = self.client.post(FIND_POOL_PATH, request).await?;
        let data = unwrap_envelope(envelope)?;
        decode(schema::resource_pool().validate_many(&data)?)
    }

    /// Discovers the databases running on the given hosts.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-zero envelope, or a
    /// malformed payload.
    pub async fn find_database(
        &self,
        request: &FindDatabaseRequest,
    ) -> Result<Vec<DatabaseRecord>> {
        debug!("Discovering databases across {} hosts", request.hosts.len());
        let envelope = self.client.post(FIND_DATABASE_PATH, request).await?;
        let data = unwrap_envelope(envelope)?;
        decode(schema::database().validate_many(&data)?)
    }

    /// Probes per-instance connectivity for the given databases.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-zero envelope, or a
    /// malformed payload.
    pub async fn get_database_connection(
        &self,
        request: &ConnectionProbeRequest<DatabaseRecord>,
    ) -> Result<Vec<ConnectionHealth>> {
        debug!("Probing connectivity for {} databases", request.databases.len());
        let envelope = self.client.post(CONNECTION_PATH, request).await?;
        let data = unwrap_envelope(envelope)?;
        decode(schema::database_connection().validate_many(&data)?)
    }

    /// Resolves the registered service names for the given databases.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-zero envelope, or a
    /// malformed payload.
    pub async fn get_database_service_name(
        &self,
        request: &ConnectionProbeRequest<ConnectionHealth>,
    ) -> Result<Vec<ServiceNameBinding>> {
        debug!("Resolving service names for {} databases", request.databases.len());
        let envelope = self.client.post(SERVICE_NAME_PATH, request).await?;
        let data = unwrap_envelope(envelope)?;
        decode(schema::service_name().validate_many(&data)?)
    }

    /// Issues the cluster-creation request. Only the envelope is checked; the
    /// created cluster is resolved afterwards through the general listing.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-zero envelope.
    pub async fn create_cluster(&self, request: &CreateClusterRequest) -> Result<()> {
        debug!("Creating cluster '{}'", request.cluster_alias_name);
        let envelope = self.client.post(CLUSTER_PATH, request).await?;
        check_envelope(&envelope)
    }

    /// Removes a cluster by its server-generated id.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-zero envelope.
    pub async fn remove_cluster(&self, cluster_id: u64) -> Result<()> {
        debug!("Removing cluster {cluster_id}");
        let envelope = self
            .client
            .delete(&format!("{CLUSTER_PATH}/{cluster_id}"))
            .await?;
        check_envelope(&envelope)
    }

    /// Lists all provisioned clusters.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-zero envelope, or a
    /// malformed payload.
    pub async fn get_clusters(&self) -> Result<Vec<ClusterRecord>> {
        let envelope = self.client.get(CLUSTER_LIST_PATH).await?;
        let data = unwrap_envelope(envelope)?;
        let clusters = data
            .get("clusters")
            .ok_or_else(|| SchemaError::missing("data.clusters"))?;
        decode(schema::cluster_record().validate_many(clusters)?)
    }

    /// Resolves a cluster by its alias. First match wins; duplicates are not
    /// detected.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::ListEmpty`] when the listing is absent or
    /// empty, and [`ClusterError::NotFound`] when no record matches.
    pub async fn get_cluster_by_alias(&self, alias: &str) -> Result<ClusterRecord> {
        let envelope = self.client.get(CLUSTER_LIST_PATH).await?;
        let data = unwrap_envelope(envelope)?;

        let clusters = match data.get("clusters").and_then(Value::as_array) {
            Some(clusters) if !clusters.is_empty() => clusters,
            _ => return Err(ClusterError::ListEmpty.into()),
        };

        for cluster in clusters {
            let record: ClusterRecord = decode(schema::cluster_record().validate(cluster)?)?;
            if record.alias_name == alias {
                return Ok(record);
            }
        }

        Err(ClusterError::NotFound {
            alias: alias.to_string(),
        }
        .into())
    }
}

/// Checks the envelope and extracts the `data` payload.
fn unwrap_envelope(envelope: Value) -> Result<Value> {
    check_envelope(&envelope)?;
    envelope
        .get("data")
        .cloned()
        .ok_or_else(|| SchemaError::missing("data").into())
}

/// Checks that the envelope carries `error_code == 0`, without requiring a
/// `data` payload.
fn check_envelope(envelope: &Value) -> Result<()> {
    let error_code = envelope
        .get("error_code")
        .and_then(Value::as_i64)
        .ok_or_else(|| SchemaError::missing("error_code"))?;

    if error_code == 0 {
        Ok(())
    } else {
        Err(ApiError::Envelope {
            error_code,
            envelope: envelope.clone(),
        }
        .into())
    }
}

/// Decodes a schema-validated payload into its typed form.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        SchemaError::Decode {
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OraclustError;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn connected_api(server: &MockServer) -> ClusterApi {
        Mock::given(method("POST"))
            .and(path("/users/auth"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "token": "tok" } })),
            )
            .mount(server)
            .await;

        let client = ApiClient::connect(&server.uri(), "admin", "secret")
            .await
            .unwrap();
        ClusterApi::new(client)
    }

    fn find_host_request() -> FindHostRequest {
        FindHostRequest {
            host_ip: String::from("10.0.0.1"),
            username: String::from("grid"),
            password: String::from("secret"),
            gi_home: String::from("/u01/app/grid"),
            grid_user: String::from("grid"),
            oracle_user: String::from("oracle"),
            oracle_home: String::from("/u01/app/oracle"),
            ssh_port: 22,
        }
    }

    #[tokio::test]
    async fn test_find_host_decodes_validated_payload() {
        let server = MockServer::start().await;
        let api = connected_api(&server).await;

        Mock::given(method("POST"))
            .and(path("/cloud/cluster/node/find"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 0,
                "data": {
                    "cluster_name": "rac01",
                    "cluster_scan_ip": [
                        { "scan_name": "rac01-scan", "scan_ip": "10.0.0.10", "scan_port": 1521 }
                    ],
                    "hosts": [
                        {
                            "ip": "10.0.0.1",
                            "host_name": "h1",
                            "vip": "10.0.0.2",
                            "oracle_listener_port": 1521,
                            "connected": true
                        }
                    ],
                },
            })))
            .mount(&server)
            .await;

        let data = api.find_host(&find_host_request()).await.unwrap();
        assert_eq!(data.cluster_name, "rac01");
        assert_eq!(data.hosts.len(), 1);
        assert_eq!(data.hosts[0].host_name, "h1");
        assert_eq!(data.cluster_scan_ip[0].scan_port, 1521);
    }

    #[tokio::test]
    async fn test_non_zero_error_code_carries_the_envelope() {
        let server = MockServer::start().await;
        let api = connected_api(&server).await;

        Mock::given(method("POST"))
            .and(path("/cloud/cluster/node/find"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 1002,
                "data": null,
            })))
            .mount(&server)
            .await;

        let err = api.find_host(&find_host_request()).await.unwrap_err();
        match err {
            OraclustError::Api(ApiError::Envelope { error_code, envelope }) => {
                assert_eq!(error_code, 1002);
                assert_eq!(envelope["error_code"], 1002);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_disconnected_host_in_payload_is_rejected() {
        let server = MockServer::start().await;
        let api = connected_api(&server).await;

        Mock::given(method("POST"))
            .and(path("/cloud/cluster/node/find"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 0,
                "data": {
                    "cluster_name": "rac01",
                    "cluster_scan_ip": [],
                    "hosts": [
                        {
                            "ip": "10.0.0.1",
                            "host_name": "h1",
                            "vip": "10.0.0.2",
                            "oracle_listener_port": 1521,
                            "connected": false
                        }
                    ],
                },
            })))
            .mount(&server)
            .await;

        let err = api.find_host(&find_host_request()).await.unwrap_err();
        assert!(matches!(
            err,
            OraclustError::Schema(SchemaError::CheckFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_cluster_accepts_envelope_without_data() {
        let server = MockServer::start().await;
        let api = connected_api(&server).await;

        Mock::given(method("POST"))
            .and(path("/cloud/cluster"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error_code": 0 })))
            .mount(&server)
            .await;

        let request = CreateClusterRequest {
            cluster_name: String::from("rac01"),
            cluster_alias_name: String::from("prod"),
            oracle_home: String::from("/u01/app/oracle"),
            oracle_user: String::from("oracle"),
            o_user: String::from("monitor"),
            o_pass: String::from("monitor-pass"),
            grid_user: String::from("grid"),
            gi_home: String::from("/u01/app/grid"),
            cluster_scan_ip: Vec::new(),
            cluster_ssh_port: 22,
            cluster_ssh_password: String::from("secret"),
            cluster_ssh_pub_key: String::new(),
            cluster_ssh_user: String::from("grid"),
            databases: Vec::new(),
            pools: Vec::new(),
            hosts: Vec::new(),
        };
        assert!(api.create_cluster(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_cluster_targets_the_id_path() {
        let server = MockServer::start().await;
        let api = connected_api(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/cloud/cluster/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error_code": 0 })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(api.remove_cluster(42).await.is_ok());
    }

    #[tokio::test]
    async fn test_alias_lookup_on_empty_list_is_a_domain_error() {
        let server = MockServer::start().await;
        let api = connected_api(&server).await;

        Mock::given(method("GET"))
            .and(path("/cloud/cluster/general"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 0,
                "data": { "clusters": [] },
            })))
            .mount(&server)
            .await;

        let err = api.get_cluster_by_alias("prod").await.unwrap_err();
        assert!(matches!(err, OraclustError::Cluster(ClusterError::ListEmpty)));
    }

    #[tokio::test]
    async fn test_alias_lookup_misses_with_not_found() {
        let server = MockServer::start().await;
        let api = connected_api(&server).await;

        Mock::given(method("GET"))
            .and(path("/cloud/cluster/general"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 0,
                "data": {
                    "clusters": [
                        { "cluster_id": 7, "alias_name": "staging" }
                    ],
                },
            })))
            .mount(&server)
            .await;

        let err = api.get_cluster_by_alias("nonexistent-alias").await.unwrap_err();
        match err {
            OraclustError::Cluster(ClusterError::NotFound { alias }) => {
                assert_eq!(alias, "nonexistent-alias");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_alias_lookup_returns_the_first_match() {
        let server = MockServer::start().await;
        let api = connected_api(&server).await;

        Mock::given(method("GET"))
            .and(path("/cloud/cluster/general"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_code": 0,
                "data": {
                    "clusters": [
                        { "cluster_id": 7, "alias_name": "staging", "extra": "ignored" },
                        { "cluster_id": 42, "alias_name": "prod" },
                        { "cluster_id": 43, "alias_name": "prod" }
                    ],
                },
            })))
            .mount(&server)
            .await;

        let record = api.get_cluster_by_alias("prod").await.unwrap();
        assert_eq!(record.cluster_id, 42);
    }
}
