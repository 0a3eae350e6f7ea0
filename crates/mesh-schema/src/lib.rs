//! # mesh-schema — Config Schema Validation
//!
//! Checks a gateway `config.json` against the JSON Schema bundled with the
//! binary and reports every violation in one deterministic diagnostic.
//!
//! ## Runtime Validation (`validate`)
//!
//! - [`ConfigSchema::load`] — parse and compile a schema once at startup.
//!   Empty schema bytes degrade to a no-op schema with a warning.
//! - [`ConfigSchema::validate`] — reject malformed JSON, then collect every
//!   structural violation with its JSON Pointer location.
//!
//! ## `$schema` Acceptance (`accept`)
//!
//! - [`SchemaUrlPolicy::is_accepted`] — canonical or legacy URL, nothing else.
//! - [`SchemaUrlPolicy::classify`] — what a payload's `$schema` declares.
//!
//! ## Crate Policy
//!
//! - Depends only on `mesh-core` internally.
//! - Never fetches schemas over the network.

pub mod accept;
pub mod validate;

pub use accept::{SchemaDeclaration, SchemaUrlPolicy};
pub use validate::{
    ConfigSchema, SchemaValidationError, ValidationViolations, Violation, CONFIG_SCHEMA_NAME,
    EMBEDDED_CONFIG_SCHEMA,
};
