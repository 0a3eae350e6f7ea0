//! # Naming Policy
//!
//! Which directory names the resolver looks for, and whether it is allowed
//! to fall back to the legacy one. Built once per process and handed to the
//! resolver.

use mesh_core::env::{vars, EnvSource};
use mesh_core::{parse_toggle, Precedence, DEFAULT_CONFIG_DIR_NAME, LEGACY_CONFIG_DIR_NAME};

/// Directory naming policy for config resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPolicy {
    preferred_dir_name: String,
    legacy_fallback_enabled: bool,
}

impl NamingPolicy {
    /// Build a policy from explicit values.
    pub fn new(preferred_dir_name: impl Into<String>, legacy_fallback_enabled: bool) -> Self {
        Self {
            preferred_dir_name: preferred_dir_name.into(),
            legacy_fallback_enabled,
        }
    }

    /// Resolve the policy from `env`.
    ///
    /// Variables:
    /// - `MESH_GATEWAY_CONFIG_DIR_NAME` (default: `mesh-ai-gateway`)
    /// - `MESH_GATEWAY_LEGACY_DIR_FALLBACK` (default: enabled; only
    ///   `0`/`false`/`no`/`off` disable it)
    pub fn from_env(env: &impl EnvSource) -> Self {
        let preferred_dir_name = Precedence::new()
            .candidate(vars::CONFIG_DIR_NAME, || env.var(vars::CONFIG_DIR_NAME))
            .resolve()
            .map_or_else(|| DEFAULT_CONFIG_DIR_NAME.to_string(), |r| r.value);
        let legacy_fallback_enabled =
            parse_toggle(env.var(vars::LEGACY_DIR_FALLBACK).as_deref(), true);

        Self {
            preferred_dir_name,
            legacy_fallback_enabled,
        }
    }

    /// Directory name used for fresh installs.
    pub fn preferred_dir_name(&self) -> &str {
        &self.preferred_dir_name
    }

    /// Directory name left behind by Bifrost installations.
    pub fn legacy_dir_name(&self) -> &'static str {
        LEGACY_CONFIG_DIR_NAME
    }

    /// Whether an existing legacy directory may be used.
    pub fn legacy_fallback_enabled(&self) -> bool {
        self.legacy_fallback_enabled
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_DIR_NAME, true)
    }
}
