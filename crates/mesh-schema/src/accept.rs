//! # Schema URL Acceptance
//!
//! A config file may declare which schema it was written against via a
//! top-level `$schema` member. Two URLs are recognized: the canonical one
//! (overridable through `MESH_GATEWAY_SCHEMA_URL`) and the fixed legacy
//! Bifrost URL. This is plain string equality and is independent of
//! structural validation; the host uses it for migration messaging.

use mesh_core::{Branding, DEFAULT_SCHEMA_URL, LEGACY_SCHEMA_URL};
use serde_json::Value;

/// How a payload's `$schema` declaration relates to the accepted URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaDeclaration {
    /// Declares the canonical URL.
    Canonical,
    /// Declares the legacy Bifrost URL.
    Legacy,
    /// Declares something else.
    Unrecognized(String),
    /// No `$schema` member, or the payload is not an object.
    Absent,
}

impl SchemaDeclaration {
    /// True for the canonical and legacy URLs.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Canonical | Self::Legacy)
    }
}

/// The set of accepted `$schema` URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaUrlPolicy {
    canonical: String,
}

impl SchemaUrlPolicy {
    /// Accept `canonical` alongside the legacy URL.
    pub fn new(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
        }
    }

    /// Accept the schema URL resolved into `branding`.
    pub fn from_branding(branding: &Branding) -> Self {
        Self::new(branding.schema_url.clone())
    }

    /// The canonical schema URL.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The legacy schema URL.
    pub fn legacy(&self) -> &'static str {
        LEGACY_SCHEMA_URL
    }

    /// True iff `url` is non-empty and equals the canonical or legacy URL.
    pub fn is_accepted(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }
        url == self.canonical || url == LEGACY_SCHEMA_URL
    }

    /// Classify the `$schema` member of a parsed payload.
    pub fn classify(&self, payload: &Value) -> SchemaDeclaration {
        match payload.get("$schema") {
            None => SchemaDeclaration::Absent,
            Some(Value::String(url)) if !url.is_empty() && *url == self.canonical => {
                SchemaDeclaration::Canonical
            }
            Some(Value::String(url)) if url == LEGACY_SCHEMA_URL => SchemaDeclaration::Legacy,
            Some(Value::String(url)) => SchemaDeclaration::Unrecognized(url.clone()),
            Some(other) => SchemaDeclaration::Unrecognized(other.to_string()),
        }
    }
}

impl Default for SchemaUrlPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_URL)
    }
}
