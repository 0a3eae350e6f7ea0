//! # mesh-core — Foundational Primitives for the Mesh AI Gateway
//!
//! The gateway ships under a new product identity while still honoring
//! installations made under the legacy Bifrost name. This crate holds the
//! pieces every other crate needs to reason about that rename:
//!
//! - [`branding`] — product names, URLs, and directory names for both
//!   identities, plus the environment-overridable [`Branding`] snapshot.
//! - [`env`] — the [`EnvSource`] seam. Components are handed an
//!   environment instead of reading `std::env` at arbitrary call sites.
//! - [`precedence`] — the ordered "first non-blank wins" rule shared by
//!   directory resolution and branding lookups.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mesh-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod branding;
pub mod env;
pub mod precedence;

pub use branding::{
    Branding, DEFAULT_CONFIG_DIR_NAME, DEFAULT_DOCS_URL, DEFAULT_PRODUCT_NAME,
    DEFAULT_PROJECT_URL, DEFAULT_SCHEMA_URL, LEGACY_CONFIG_DIR_NAME, LEGACY_PRODUCT_NAME,
    LEGACY_SCHEMA_URL,
};
pub use env::{EnvSource, ProcessEnv};
pub use precedence::{first_non_blank, is_blank, parse_toggle, Precedence, Resolved};
