//! # Environment Lookup
//!
//! Every environment-derived setting is read through [`EnvSource`]. The
//! process environment is captured by [`ProcessEnv`]; tests hand in a
//! `BTreeMap` so no test ever mutates the real process environment.

use std::collections::BTreeMap;

/// Environment variable names recognized by the gateway.
pub mod vars {
    /// Full config-directory path override.
    pub const CONFIG_DIR: &str = "MESH_GATEWAY_CONFIG_DIR";
    /// Preferred config-directory name override.
    pub const CONFIG_DIR_NAME: &str = "MESH_GATEWAY_CONFIG_DIR_NAME";
    /// Legacy config-directory auto-detection toggle.
    pub const LEGACY_DIR_FALLBACK: &str = "MESH_GATEWAY_LEGACY_DIR_FALLBACK";
    /// Canonical schema URL override.
    pub const SCHEMA_URL: &str = "MESH_GATEWAY_SCHEMA_URL";
    /// Public product name override.
    pub const PRODUCT_NAME: &str = "MESH_GATEWAY_PRODUCT_NAME";
    /// Public project URL override.
    pub const PROJECT_URL: &str = "MESH_GATEWAY_PROJECT_URL";
    /// Docs base URL override.
    pub const DOCS_URL: &str = "MESH_GATEWAY_DOCS_URL";
    /// Per-user roaming application data root (Windows).
    pub const APPDATA: &str = "APPDATA";
    /// Home directory (Unix-likes).
    pub const HOME: &str = "HOME";
}

/// A read-only view of environment variables.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when unset or not valid Unicode.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}
