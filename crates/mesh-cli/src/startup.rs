//! # Startup Context
//!
//! Everything the host derives from the environment, built once in `main`
//! and passed by reference to each subcommand.
//!
//! The config schema is compiled on first use. `config-dir` never asks for
//! it, so a schema that fails to compile only fails `check`.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use mesh_config::ConfigDirResolver;
use mesh_core::{Branding, EnvSource};
use mesh_schema::{ConfigSchema, SchemaUrlPolicy};

/// Process-wide startup state.
#[derive(Debug)]
pub struct Startup {
    /// Product names and URLs.
    pub branding: Branding,
    /// Config directory resolver.
    pub resolver: ConfigDirResolver,
    /// Accepted `$schema` URLs.
    pub schema_urls: SchemaUrlPolicy,
    schema: OnceLock<ConfigSchema>,
}

impl Startup {
    /// Build startup state from `env`. The embedded schema is compiled
    /// later, by [`Startup::schema`].
    pub fn from_env(env: &impl EnvSource) -> Self {
        let branding = Branding::from_env(env);
        let schema_urls = SchemaUrlPolicy::from_branding(&branding);
        let resolver = ConfigDirResolver::from_env(env);

        tracing::debug!(
            product = %branding.product_name,
            config_root = %resolver.config_root().display(),
            preferred_dir = resolver.policy().preferred_dir_name(),
            legacy_fallback = resolver.policy().legacy_fallback_enabled(),
            "startup context ready"
        );

        Self {
            branding,
            resolver,
            schema_urls,
            schema: OnceLock::new(),
        }
    }

    /// Build startup state from `env` around an already compiled schema.
    pub fn with_schema(env: &impl EnvSource, schema: ConfigSchema) -> Self {
        let startup = Self::from_env(env);
        let _ = startup.schema.set(schema);
        startup
    }

    /// The config schema, compiling the embedded one on first call.
    ///
    /// # Errors
    ///
    /// Fails when the embedded schema does not parse or compile. A failed
    /// attempt is not cached.
    pub fn schema(&self) -> Result<&ConfigSchema> {
        if let Some(schema) = self.schema.get() {
            return Ok(schema);
        }
        let compiled = ConfigSchema::embedded().context("failed to load embedded config schema")?;
        tracing::debug!(schema_enforcing = compiled.is_enforcing(), "config schema loaded");
        Ok(self.schema.get_or_init(|| compiled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_dir::{run_config_dir, ConfigDirArgs};
    use mesh_core::env::vars;
    use std::collections::BTreeMap;

    fn env() -> BTreeMap<String, String> {
        BTreeMap::from([
            (vars::HOME.to_string(), "/home/mesh".to_string()),
            (vars::APPDATA.to_string(), "C:\\Users\\mesh\\AppData\\Roaming".to_string()),
        ])
    }

    #[test]
    fn test_config_dir_does_not_compile_schema() {
        let startup = Startup::from_env(&env());
        let mut out = Vec::new();
        run_config_dir(&ConfigDirArgs::default(), &startup, &mut out).unwrap();
        assert!(startup.schema.get().is_none());
    }

    #[test]
    fn test_schema_is_compiled_once_on_demand() {
        let startup = Startup::from_env(&env());
        let first: *const ConfigSchema = startup.schema().unwrap();
        let second: *const ConfigSchema = startup.schema().unwrap();
        assert_eq!(first, second);
        assert!(startup.schema().unwrap().is_enforcing());
    }

    #[test]
    fn test_supplied_schema_is_used() {
        let startup = Startup::with_schema(&env(), ConfigSchema::noop("custom.schema.json"));
        assert_eq!(startup.schema().unwrap().name(), "custom.schema.json");
    }
}
