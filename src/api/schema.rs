//! Declarative response-shape validation.
//!
//! Every management API operation declares the shape of its `data` payload as
//! a [`Schema`]: a flat list of named fields, each with a JSON kind, a
//! required flag, and an optional value check. One routine walks the raw
//! payload against the declaration and either produces a normalized value of
//! the same shape or fails naming the first offending field. Nested objects
//! and list-of-object ("many") payloads are recursive applications of the same
//! routine, and opaque blobs the server owns (database `config`, raw host
//! lists) pass through the `RawMap`/`RawList` escape hatches unchecked.

use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};

/// A value check applied after the kind check passes.
pub type Check = fn(&Value) -> bool;

/// The JSON kind a declared field must have.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A JSON string.
    Str,
    /// A JSON integer.
    Int,
    /// A JSON boolean.
    Bool,
    /// Any JSON array, accepted without deeper validation.
    RawList,
    /// Any JSON object, accepted without deeper validation.
    RawMap,
    /// A nested object validated against its own schema.
    Nested(Schema),
    /// An array of objects, each validated against the same schema.
    NestedMany(Schema),
}

/// A single declared field.
#[derive(Debug, Clone)]
struct Field {
    /// Field name as it appears on the wire.
    name: &'static str,
    /// Expected JSON kind.
    kind: FieldKind,
    /// Whether the field must be present.
    required: bool,
    /// Optional value check with a human description.
    check: Option<(&'static str, Check)>,
}

/// A declarative shape description for one payload.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declares a required field.
    #[must_use]
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name,
            kind,
            required: true,
            check: None,
        });
        self
    }

    /// Declares an optional field; absent optional fields are simply omitted
    /// from the normalized output.
    #[must_use]
    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name,
            kind,
            required: false,
            check: None,
        });
        self
    }

    /// Declares a required field with a value check.
    #[must_use]
    pub fn checked(
        mut self,
        name: &'static str,
        kind: FieldKind,
        expectation: &'static str,
        check: Check,
    ) -> Self {
        self.fields.push(Field {
            name,
            kind,
            required: true,
            check: Some((expectation, check)),
        });
        self
    }

    /// Validates a single object against this schema.
    ///
    /// Returns a normalized object holding exactly the declared fields; for
    /// conforming input the result is structurally equal to the input.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] naming the first offending field.
    pub fn validate(&self, raw: &Value) -> Result<Value> {
        self.validate_at(raw, "data")
    }

    /// Validates an array of objects, each against this schema.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the value is not an array or any element
    /// fails validation.
    pub fn validate_many(&self, raw: &Value) -> Result<Value> {
        self.validate_many_at(raw, "data")
    }

    fn validate_at(&self, raw: &Value, path: &str) -> Result<Value> {
        let object = raw.as_object().ok_or_else(|| SchemaError::ExpectedObject {
            context: path.to_string(),
        })?;

        let mut normalized = Map::with_capacity(self.fields.len());

        for field in &self.fields {
            let field_path = format!("{path}.{name}", name = field.name);

            let Some(value) = object.get(field.name) else {
                if field.required {
                    return Err(SchemaError::missing(field_path).into());
                }
                continue;
            };

            let validated = Self::validate_kind(&field.kind, value, &field_path)?;

            if let Some((expectation, check)) = field.check {
                if !check(value) {
                    return Err(SchemaError::CheckFailed {
                        field: field_path,
                        expectation: expectation.to_string(),
                    }
                    .into());
                }
            }

            normalized.insert(field.name.to_string(), validated);
        }

        Ok(Value::Object(normalized))
    }

    fn validate_many_at(&self, raw: &Value, path: &str) -> Result<Value> {
        let items = raw.as_array().ok_or_else(|| SchemaError::ExpectedArray {
            context: path.to_string(),
        })?;

        let mut normalized = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            normalized.push(self.validate_at(item, &format!("{path}[{index}]"))?);
        }

        Ok(Value::Array(normalized))
    }

    /// Checks a value against a field kind, recursing into nested schemas.
    fn validate_kind(kind: &FieldKind, value: &Value, path: &str) -> Result<Value> {
        match kind {
            FieldKind::Str => {
                if !value.is_string() {
                    return Err(SchemaError::wrong_type(path, "string").into());
                }
            }
            FieldKind::Int => {
                if !value.is_i64() && !value.is_u64() {
                    return Err(SchemaError::wrong_type(path, "integer").into());
                }
            }
            FieldKind::Bool => {
                if !value.is_boolean() {
                    return Err(SchemaError::wrong_type(path, "boolean").into());
                }
            }
            FieldKind::RawList => {
                if !value.is_array() {
                    return Err(SchemaError::wrong_type(path, "array").into());
                }
            }
            FieldKind::RawMap => {
                if !value.is_object() {
                    return Err(SchemaError::wrong_type(path, "object").into());
                }
            }
            FieldKind::Nested(schema) => return schema.validate_at(value, path),
            FieldKind::NestedMany(schema) => return schema.validate_many_at(value, path),
        }

        Ok(value.clone())
    }
}

// ---------------------------------------------------------------------------
// Operation schemas
// ---------------------------------------------------------------------------

/// Shape of the find-host payload: cluster name, scan endpoints, and the
/// discovered hosts. Hosts the server could not reach are a validation
/// failure, not data.
#[must_use]
pub fn find_host() -> Schema {
    let host = Schema::new()
        .checked(
            "connected",
            FieldKind::Bool,
            "host must be connected",
            |v| v.as_bool() == Some(true),
        )
        .field("host_name", FieldKind::Str)
        .field("oracle_listener_port", FieldKind::Int)
        .field("vip", FieldKind::Str)
        .field("ip", FieldKind::Str);

    let scan = Schema::new()
        .field("scan_name", FieldKind::Str)
        .field("scan_ip", FieldKind::Str)
        .field("scan_port", FieldKind::Int);

    Schema::new()
        .field("cluster_name", FieldKind::Str)
        .field("cluster_scan_ip", FieldKind::NestedMany(scan))
        .field("hosts", FieldKind::NestedMany(host))
}

/// Shape of one resource-pool entry. `importance`/`min`/`max` are strings on
/// the wire; `active_hosts` is an opaque list owned by the server.
#[must_use]
pub fn resource_pool() -> Schema {
    Schema::new()
        .field("active_hosts", FieldKind::RawList)
        .field("importance", FieldKind::Str)
        .field("max", FieldKind::Str)
        .field("min", FieldKind::Str)
        .field("pool_name", FieldKind::Str)
}

/// Shape of one discovered database with its running instances. `config` and
/// `hosts` are opaque blobs passed back verbatim on creation.
#[must_use]
pub fn database() -> Schema {
    let instance = Schema::new()
        .field("host_name", FieldKind::Str)
        .field("inst_name", FieldKind::Str)
        .field("inst_stat", FieldKind::Str);

    Schema::new()
        .field("config", FieldKind::RawMap)
        .field("db_name", FieldKind::Str)
        .field("hosts", FieldKind::RawList)
        .field("instances", FieldKind::NestedMany(instance))
}

/// Shape of one per-database connectivity probe result.
#[must_use]
pub fn database_connection() -> Schema {
    let instance = Schema::new()
        .field("connected", FieldKind::Bool)
        .field("inst_name", FieldKind::Str);

    Schema::new()
        .field("db_name", FieldKind::Str)
        .field("instances", FieldKind::NestedMany(instance))
}

/// Shape of one database-to-service-name binding.
#[must_use]
pub fn service_name() -> Schema {
    Schema::new()
        .field("db_name", FieldKind::Str)
        .field("service_name", FieldKind::RawList)
}

/// Shape of one provisioned cluster record in the general listing. The server
/// sends more fields; only the two used for alias resolution are declared.
#[must_use]
pub fn cluster_record() -> Schema {
    Schema::new()
        .field("cluster_id", FieldKind::Int)
        .field("alias_name", FieldKind::Str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OraclustError;
    use serde_json::json;

    fn schema_err(result: Result<Value>) -> SchemaError {
        match result {
            Err(OraclustError::Schema(e)) => e,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_is_named() {
        let schema = Schema::new()
            .field("ip", FieldKind::Str)
            .field("port", FieldKind::Int);
        let err = schema_err(schema.validate(&json!({ "ip": "10.0.0.1" })));
        match err {
            SchemaError::MissingField { field } => assert_eq!(field, "data.port"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let schema = Schema::new().field("port", FieldKind::Int);
        let err = schema_err(schema.validate(&json!({ "port": "1521" })));
        match err {
            SchemaError::WrongType { field, expected } => {
                assert_eq!(field, "data.port");
                assert_eq!(expected, "integer");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_optional_field_may_be_absent() {
        let schema = Schema::new()
            .field("ip", FieldKind::Str)
            .optional("note", FieldKind::Str);
        let normalized = schema.validate(&json!({ "ip": "10.0.0.1" })).unwrap();
        assert_eq!(normalized, json!({ "ip": "10.0.0.1" }));
    }

    #[test]
    fn test_escape_hatch_accepts_any_list_and_map() {
        let schema = Schema::new()
            .field("config", FieldKind::RawMap)
            .field("hosts", FieldKind::RawList);
        let raw = json!({
            "config": { "arbitrarily": { "nested": [1, 2, 3] } },
            "hosts": ["a", { "b": true }, null],
        });
        let normalized = schema.validate(&raw).unwrap();
        assert_eq!(normalized, raw);
    }

    #[test]
    fn test_conforming_input_round_trips() {
        let raw = json!({
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
        });
        let normalized = find_host().validate(&raw).unwrap();
        assert_eq!(normalized, raw);
    }

    #[test]
    fn test_disconnected_host_fails_the_check() {
        let raw = json!({
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
        });
        let err = schema_err(find_host().validate(&raw));
        match err {
            SchemaError::CheckFailed { field, .. } => {
                assert_eq!(field, "data.hosts[0].connected");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_many_mode_validates_every_element() {
        let raw = json!([
            { "db_name": "orcl", "service_name": ["orcl_svc"] },
            { "db_name": "hr", "service_name": "not-a-list" },
        ]);
        let err = schema_err(service_name().validate_many(&raw));
        match err {
            SchemaError::WrongType { field, expected } => {
                assert_eq!(field, "data[1].service_name");
                assert_eq!(expected, "array");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_many_mode_rejects_non_array() {
        let err = schema_err(resource_pool().validate_many(&json!({ "pool_name": "p1" })));
        assert!(matches!(err, SchemaError::ExpectedArray { .. }));
    }

    #[test]
    fn test_object_expected_at_top_level() {
        let err = schema_err(database().validate(&json!([1, 2])));
        assert!(matches!(err, SchemaError::ExpectedObject { .. }));
    }

    #[test]
    fn test_unknown_fields_are_dropped_from_normalized_output() {
        let schema = Schema::new().field("db_name", FieldKind::Str);
        let normalized = schema
            .validate(&json!({ "db_name": "orcl", "undeclared": 42 }))
            .unwrap();
        assert_eq!(normalized, json!({ "db_name": "orcl" }));
    }
}
