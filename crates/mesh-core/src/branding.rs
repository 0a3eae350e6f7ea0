//! # Branding
//!
//! Public identity of the distribution and of the legacy product it
//! replaces. Legacy values are fixed; current values can be overridden
//! through the environment so downstream distributions can rebrand without
//! a rebuild.

use crate::env::{vars, EnvSource};
use crate::precedence::Precedence;

/// Public-facing product name for this distribution.
pub const DEFAULT_PRODUCT_NAME: &str = "Mesh AI Gateway";

/// Product name of the upstream project, kept for migration messaging.
pub const LEGACY_PRODUCT_NAME: &str = "Bifrost";

/// Open-source project repository.
pub const DEFAULT_PROJECT_URL: &str = "https://github.com/mesh-ai-gateway/mesh-ai-gateway";

/// Documentation entry point.
pub const DEFAULT_DOCS_URL: &str = "https://docs.mesh-ai-gateway.io";

/// Preferred config directory name for fresh installs.
pub const DEFAULT_CONFIG_DIR_NAME: &str = "mesh-ai-gateway";

/// Config directory name used by upstream Bifrost installations.
pub const LEGACY_CONFIG_DIR_NAME: &str = "bifrost";

/// Canonical `$schema` reference for gateway configs.
pub const DEFAULT_SCHEMA_URL: &str = "https://schema.mesh-ai-gateway.io/config.schema.json";

/// Upstream `$schema` reference, still accepted.
pub const LEGACY_SCHEMA_URL: &str = "https://www.getbifrost.ai/schema";

/// Environment-resolved branding strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    /// Public product name.
    pub product_name: String,
    /// Project repository URL.
    pub project_url: String,
    /// Docs base URL.
    pub docs_url: String,
    /// Canonical schema URL used for `$schema` acceptance.
    pub schema_url: String,
}

impl Branding {
    /// Resolve branding from `env`, falling back to the compiled-in defaults.
    ///
    /// Variables:
    /// - `MESH_GATEWAY_PRODUCT_NAME` (default: `Mesh AI Gateway`)
    /// - `MESH_GATEWAY_PROJECT_URL`
    /// - `MESH_GATEWAY_DOCS_URL`
    /// - `MESH_GATEWAY_SCHEMA_URL`
    pub fn from_env(env: &impl EnvSource) -> Self {
        Self {
            product_name: env_or_default(env, vars::PRODUCT_NAME, DEFAULT_PRODUCT_NAME),
            project_url: env_or_default(env, vars::PROJECT_URL, DEFAULT_PROJECT_URL),
            docs_url: env_or_default(env, vars::DOCS_URL, DEFAULT_DOCS_URL),
            schema_url: env_or_default(env, vars::SCHEMA_URL, DEFAULT_SCHEMA_URL),
        }
    }
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            project_url: DEFAULT_PROJECT_URL.to_string(),
            docs_url: DEFAULT_DOCS_URL.to_string(),
            schema_url: DEFAULT_SCHEMA_URL.to_string(),
        }
    }
}

fn env_or_default(env: &impl EnvSource, var: &'static str, default: &str) -> String {
    Precedence::new()
        .candidate(var, || env.var(var))
        .value("default", Some(default))
        .resolve()
        .map_or_else(|| default.to_string(), |r| r.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        assert_eq!(Branding::from_env(&env(&[])), Branding::default());
    }

    #[test]
    fn test_schema_url_override_applies() {
        let custom = "https://example.org/custom.schema.json";
        let branding = Branding::from_env(&env(&[(vars::SCHEMA_URL, custom)]));
        assert_eq!(branding.schema_url, custom);
        assert_eq!(branding.product_name, DEFAULT_PRODUCT_NAME);
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let branding = Branding::from_env(&env(&[(vars::PRODUCT_NAME, "   ")]));
        assert_eq!(branding.product_name, DEFAULT_PRODUCT_NAME);
    }

    #[test]
    fn test_every_field_is_overridable() {
        let branding = Branding::from_env(&env(&[
            (vars::PRODUCT_NAME, "Acme Gateway"),
            (vars::PROJECT_URL, "https://acme.example/src"),
            (vars::DOCS_URL, "https://acme.example/docs"),
        ]));
        assert_eq!(branding.product_name, "Acme Gateway");
        assert_eq!(branding.project_url, "https://acme.example/src");
        assert_eq!(branding.docs_url, "https://acme.example/docs");
    }

    #[test]
    fn test_legacy_identity_differs_from_current() {
        assert_ne!(DEFAULT_CONFIG_DIR_NAME, LEGACY_CONFIG_DIR_NAME);
        assert_ne!(DEFAULT_SCHEMA_URL, LEGACY_SCHEMA_URL);
    }
}
