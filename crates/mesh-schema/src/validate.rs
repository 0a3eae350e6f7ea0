//! # Config Schema Validation
//!
//! Validates `config.json` payloads against the gateway's JSON Schema
//! (Draft 2020-12).
//!
//! ## Lifecycle
//!
//! [`ConfigSchema::load`] parses and compiles the schema exactly once; the
//! resulting value is immutable and `Send + Sync`, so one instance serves
//! every validation for the life of the process. Nothing is recompiled per
//! call.
//!
//! An empty schema is tolerated: `load` returns a no-op schema and logs a
//! warning, and every payload then validates. A schema that is present but
//! does not parse or compile is an error the host should treat as fatal.
//!
//! ## Reporting
//!
//! Malformed JSON is reported on its own and stops validation. Otherwise
//! every structural violation is collected, never just the first, in the
//! validator's depth-first order. Object members are kept in declaration
//! order (`serde_json/preserve_order`), so the same payload always renders
//! the same report, byte for byte.
//!
//! An `anyOf` or `oneOf` failure carries the failures of each branch as
//! [`Violation::causes`], taken from the validator's basic output and
//! listed depth-first in branch order.
//!
//! ## Schema Resolution
//!
//! The schema is registered under several identifiers: its file name, the
//! canonical and legacy schema URLs, and its own `$id`. A `$ref` through any
//! of them resolves locally; anything else fails compilation instead of
//! reaching the network.

use std::collections::HashMap;
use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{BasicOutput, Retrieve, Uri, Validator};
use mesh_core::{DEFAULT_SCHEMA_URL, LEGACY_SCHEMA_URL};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Resource name the embedded schema is registered under.
pub const CONFIG_SCHEMA_NAME: &str = "config.schema.json";

/// The config schema bundled with the binary.
pub const EMBEDDED_CONFIG_SCHEMA: &[u8] = include_bytes!("../schemas/config.schema.json");

/// Resolves `$ref` URIs against the schema's registered identifiers.
struct LocalSchemaRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let uri_str = uri_str.split('#').next().unwrap_or(uri_str);

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Relative refs against an id-less schema arrive as `json-schema:///<file>`.
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        Err(format!("schema reference '{uri_str}' is not registered locally").into())
    }
}

/// Error during schema loading or payload validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The payload did not conform to the schema.
    #[error("schema validation failed against '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// Every violation, in report order.
        violations: ValidationViolations,
    },

    /// The payload is not syntactically valid JSON.
    #[error("invalid JSON: {reason}")]
    MalformedPayload {
        /// Parser detail, including line and column.
        reason: String,
    },

    /// The schema bytes could not be parsed.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Schema identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The schema parsed but could not be compiled.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema identifier.
        schema_name: String,
        /// Compiler detail.
        reason: String,
    },
}

impl SchemaValidationError {
    /// The structural violations, when this is a validation failure.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::ValidationFailed { violations, .. } => Some(violations),
            _ => None,
        }
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the payload.
    pub instance_path: String,
    /// JSON Pointer path of the schema keyword that rejected it.
    pub schema_path: String,
    /// Human-readable description of expected vs. actual.
    pub message: String,
    /// Branch failures beneath an `anyOf`/`oneOf` violation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<Violation>,
}

impl Violation {
    fn write_line(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let path: &str = if self.instance_path.is_empty() {
            "(root)"
        } else {
            &self.instance_path
        };
        write!(f, "{:indent$}{path}: {}", "", self.message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_line(f, 2)?;
        for cause in &self.causes {
            writeln!(f)?;
            cause.write_line(f, 4)?;
        }
        Ok(())
    }
}

/// Ordered collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled config schema.
///
/// Built once with [`ConfigSchema::load`] and shared by reference; all
/// methods take `&self`.
pub struct ConfigSchema {
    name: String,
    compiled: Option<Validator>,
}

impl ConfigSchema {
    /// Load and compile the embedded config schema.
    ///
    /// # Errors
    ///
    /// See [`ConfigSchema::load`].
    pub fn embedded() -> Result<Self, SchemaValidationError> {
        Self::load(EMBEDDED_CONFIG_SCHEMA)
    }

    /// Load and compile a config schema from raw bytes.
    ///
    /// Empty or whitespace-only input yields a no-op schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaLoadError` if the bytes are not JSON and
    /// `ValidatorBuildError` if the schema does not compile.
    pub fn load(raw: &[u8]) -> Result<Self, SchemaValidationError> {
        Self::load_named(CONFIG_SCHEMA_NAME, raw)
    }

    /// Like [`ConfigSchema::load`], registering the schema under `name`.
    ///
    /// # Errors
    ///
    /// See [`ConfigSchema::load`].
    pub fn load_named(name: &str, raw: &[u8]) -> Result<Self, SchemaValidationError> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            tracing::warn!(
                schema = name,
                "config schema is empty; running without config.json schema validation"
            );
            return Ok(Self::noop(name));
        }

        let schema: Value =
            serde_json::from_slice(raw).map_err(|e| SchemaValidationError::SchemaLoadError {
                schema_name: name.to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;

        let compiled = build_options(name, &schema).build(&schema).map_err(|e| {
            SchemaValidationError::ValidatorBuildError {
                schema_name: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        tracing::debug!(schema = name, "compiled config schema");

        Ok(Self {
            name: name.to_string(),
            compiled: Some(compiled),
        })
    }

    /// A schema that accepts every payload.
    pub fn noop(name: &str) -> Self {
        Self {
            name: name.to_string(),
            compiled: None,
        }
    }

    /// The identifier the schema was loaded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// False for the no-op schema.
    pub fn is_enforcing(&self) -> bool {
        self.compiled.is_some()
    }

    /// Validate raw payload bytes.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPayload` if the bytes are not JSON, or
    /// `ValidationFailed` listing every structural violation.
    pub fn validate(&self, payload: &[u8]) -> Result<(), SchemaValidationError> {
        if self.compiled.is_none() {
            return Ok(());
        }
        let instance: Value = serde_json::from_slice(payload).map_err(|e| {
            SchemaValidationError::MalformedPayload {
                reason: e.to_string(),
            }
        })?;
        self.validate_value(&instance)
    }

    /// Validate an already-parsed payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` listing every structural violation.
    pub fn validate_value(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        let violations = self.violations(instance);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_name: self.name.clone(),
                violations: ValidationViolations { violations },
            })
        }
    }

    /// Collect every violation in `instance`, in report order.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        let Some(compiled) = &self.compiled else {
            return Vec::new();
        };
        let mut branch_failures: Option<BasicOutput<'_>> = None;
        compiled
            .iter_errors(instance)
            .map(|e| {
                let instance_path = e.instance_path.to_string();
                let schema_path = e.schema_path.to_string();
                let causes = match e.kind {
                    ValidationErrorKind::AnyOf | ValidationErrorKind::OneOfNotValid => {
                        let output = branch_failures
                            .get_or_insert_with(|| compiled.apply(instance).basic());
                        causes_under(output, &schema_path, &instance_path)
                    }
                    _ => Vec::new(),
                };
                Violation {
                    message: e.to_string(),
                    instance_path,
                    schema_path,
                    causes,
                }
            })
            .collect()
    }
}

/// Failures reported inside the combinator at `schema_path`, for the value
/// at `instance_path` or below it.
fn causes_under(output: &BasicOutput<'_>, schema_path: &str, instance_path: &str) -> Vec<Violation> {
    let BasicOutput::Invalid(units) = output else {
        return Vec::new();
    };
    let keyword_prefix = format!("{schema_path}/");
    let instance_prefix = format!("{instance_path}/");
    units
        .iter()
        .filter(|unit| unit.keyword_location().as_str().starts_with(&keyword_prefix))
        .filter(|unit| {
            let at = unit.instance_location().as_str();
            instance_path.is_empty() || at == instance_path || at.starts_with(&instance_prefix)
        })
        .map(|unit| Violation {
            instance_path: unit.instance_location().to_string(),
            schema_path: unit.keyword_location().to_string(),
            message: unit.error_description().to_string(),
            causes: Vec::new(),
        })
        .collect()
}

impl fmt::Debug for ConfigSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSchema")
            .field("name", &self.name)
            .field("enforcing", &self.is_enforcing())
            .finish()
    }
}

/// Build compiler options with the schema registered under every known
/// identifier.
fn build_options(name: &str, schema: &Value) -> jsonschema::ValidationOptions {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);

    let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();
    for uri in [name, DEFAULT_SCHEMA_URL, LEGACY_SCHEMA_URL] {
        schemas_by_uri.insert(uri.to_string(), schema.clone());
    }
    if let Some(id) = schema.get("$id").and_then(Value::as_str) {
        schemas_by_uri.insert(id.to_string(), schema.clone());
    }

    opts.with_retriever(LocalSchemaRetriever { schemas_by_uri });
    opts
}
