//! Authenticated HTTP client for the cluster management API.
//!
//! The client is constructed in two explicit phases: [`ApiClient::connect`]
//! performs the login call and extracts the session token, so a client value
//! never exists without one. The token is attached to every subsequent
//! request as the `x-access-token` header. Each orchestration run owns one
//! client; dropping it releases the underlying connection pool.

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::{ApiError, Result};

/// Login endpoint, relative to the base URL.
const AUTH_PATH: &str = "/users/auth";

/// Header carrying the session token.
const TOKEN_HEADER: &str = "x-access-token";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Authenticated JSON client for the management API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client.
    http: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    /// Session token obtained at login.
    token: String,
}

impl ApiClient {
    /// Connects to the API: builds the HTTP client and performs the login
    /// call, extracting the session token from `data.token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, the auth endpoint
    /// is unreachable, or the login response carries no token.
    pub async fn connect(base_url: &str, username: &str, password: &str) -> Result<Self> {
        Self::connect_with_timeout(base_url, username, password, DEFAULT_TIMEOUT_SECS).await
    }

    /// Connects with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::connect`].
    pub async fn connect_with_timeout(
        base_url: &str,
        username: &str,
        password: &str,
        timeout_secs: u64,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {e}")))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let token = Self::login(&http, &base_url, username, password).await?;
        debug!("Authenticated against {base_url}");

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Performs the login call and extracts the session token.
    async fn login(
        http: &Client,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<String> {
        let credentials = serde_json::json!({ "name": username, "password": password });

        let response = http
            .post(format!("{base_url}{AUTH_PATH}"))
            .json(&credentials)
            .send()
            .await
            .map_err(|e| ApiError::auth(format!("Login request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::auth(format!(
                "Login rejected with status {status}: {body}",
                status = status.as_u16()
            ))
            .into());
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::auth(format!("Login response is not JSON: {e}")))?;

        body.pointer("/data/token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::auth("Login response carried no token at data.token").into())
    }

    /// Issues a GET request and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a non-JSON
    /// body.
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.dispatch(Method::GET, path, None).await
    }

    /// Issues a POST request with a JSON body and returns the decoded JSON
    /// body.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::get`].
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::invalid_response(format!("Unserializable request body: {e}")))?;
        self.dispatch(Method::POST, path, Some(body)).await
    }

    /// Issues a PUT request with a JSON body and returns the decoded JSON
    /// body.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::get`].
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::invalid_response(format!("Unserializable request body: {e}")))?;
        self.dispatch(Method::PUT, path, Some(body)).await
    }

    /// Issues a DELETE request and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::get`].
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.dispatch(Method::DELETE, path, None).await
    }

    /// Sends one request with the session token attached.
    async fn dispatch(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        trace!("{method} {path}");

        let mut request = self
            .http
            .request(method, format!("{base}{path}", base = self.base_url))
            .header(TOKEN_HEADER, &self.token);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        serde_json::from_str(&text).map_err(|e| {
            ApiError::invalid_response(format!("Response body is not JSON: {e} (body: {text})"))
                .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OraclustError;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_login(token: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/auth"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "token": token } })),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_connect_posts_credentials_and_extracts_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/auth"))
            .and(body_json(json!({ "name": "admin", "password": "secret" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "token": "tok-1" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::connect(&server.uri(), "admin", "secret").await;
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_token_is_sent_on_every_request() {
        let server = server_with_login("tok-2").await;
        Mock::given(method("GET"))
            .and(path("/cloud/cluster/general"))
            .and(header("x-access-token", "tok-2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "error_code": 0, "data": { "clusters": [] } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::connect(&server.uri(), "admin", "secret")
            .await
            .unwrap();
        let body = client.get("/cloud/cluster/general").await.unwrap();
        assert_eq!(body["error_code"], 0);
    }

    #[tokio::test]
    async fn test_login_without_token_fails_construction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .mount(&server)
            .await;

        let err = ApiClient::connect(&server.uri(), "admin", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OraclustError::Api(ApiError::AuthenticationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_success_status_carries_raw_body() {
        let server = server_with_login("tok-3").await;
        Mock::given(method("GET"))
            .and(path("/cloud/cluster/general"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ApiClient::connect(&server.uri(), "admin", "secret")
            .await
            .unwrap();
        let err = client.get("/cloud/cluster/general").await.unwrap_err();
        match err {
            OraclustError::Api(ApiError::RequestFailed { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let server = server_with_login("tok-4").await;
        Mock::given(method("GET"))
            .and(path("/cloud/cluster/general"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = ApiClient::connect(&server.uri(), "admin", "secret")
            .await
            .unwrap();
        let err = client.get("/cloud/cluster/general").await.unwrap_err();
        assert!(matches!(
            err,
            OraclustError::Api(ApiError::InvalidResponse { .. })
        ));
    }
}
