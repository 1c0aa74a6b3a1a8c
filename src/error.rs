//! Error types for the oraclust provisioning tool.
//!
//! This module provides the error hierarchy for every operation in the
//! provisioning workflow: configuration, the HTTP client, response-shape
//! validation, and cluster-level lookups.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for oraclust operations.
#[derive(Debug, Error)]
pub enum OraclustError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Management API errors (transport, auth, envelope).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Response payload did not match its declared shape.
    #[error("Response validation error: {0}")]
    Schema(#[from] SchemaError),

    /// Cluster-level domain lookup failures.
    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// Environment variable is missing.
    #[error("Missing environment variable: {name}")]
    MissingEnvVar {
        /// Name of the missing variable.
        name: String,
    },
}

/// Errors raised by the authenticated HTTP client and the response envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Login failed: the auth endpoint was unreachable or returned no token.
    #[error("Authentication against the management API failed: {message}")]
    AuthenticationFailed {
        /// Description of the auth failure.
        message: String,
    },

    /// Transport-level failure reaching the API.
    #[error("Network error communicating with the management API: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The API answered with a non-success HTTP status.
    #[error("Management API request failed: {status} - {body}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// The response envelope carried a non-zero `error_code`.
    #[error("Management API reported error_code {error_code}: {envelope}")]
    Envelope {
        /// Application-level error code from the envelope.
        error_code: i64,
        /// The full envelope, kept for diagnostics.
        envelope: serde_json::Value,
    },

    /// The response body was not JSON or had an unexpected top-level shape.
    #[error("Invalid response from the management API: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Errors raised by the declarative response-shape validator.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A required field is absent.
    #[error("Missing required field '{field}'")]
    MissingField {
        /// Path of the missing field.
        field: String,
    },

    /// A field is present but has the wrong JSON type.
    #[error("Field '{field}' has the wrong type, expected {expected}")]
    WrongType {
        /// Path of the offending field.
        field: String,
        /// The expected JSON type.
        expected: &'static str,
    },

    /// A field failed its declared value check.
    #[error("Field '{field}' failed check: {expectation}")]
    CheckFailed {
        /// Path of the offending field.
        field: String,
        /// Human description of what the check expected.
        expectation: String,
    },

    /// The value being validated was not a JSON object.
    #[error("Expected a JSON object at {context}")]
    ExpectedObject {
        /// Where in the payload the object was expected.
        context: String,
    },

    /// A many-mode validation was handed something other than an array.
    #[error("Expected a JSON array at {context}")]
    ExpectedArray {
        /// Where in the payload the array was expected.
        context: String,
    },

    /// A validated payload could not be decoded into its typed form.
    #[error("Failed to decode validated payload: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

/// Cluster-level domain lookup failures.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The server returned no clusters at all.
    #[error("The cluster list is empty")]
    ListEmpty,

    /// No cluster matched the requested alias.
    #[error("No cluster found with alias '{alias}'")]
    NotFound {
        /// The alias that was looked up.
        alias: String,
    },

    /// A healthy database had no service-name binding.
    #[error("No service name returned for database '{db_name}'")]
    ServiceNameMissing {
        /// The database missing a binding.
        db_name: String,
    },
}

/// Result type alias for oraclust operations.
pub type Result<T> = std::result::Result<T, OraclustError>;

impl OraclustError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl ApiError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an authentication failure.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

impl SchemaError {
    /// Creates a missing-field error.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a wrong-type error.
    #[must_use]
    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
        }
    }
}
