//! # Config Directory Resolver
//!
//! Applies the override precedence and, when no override is present, picks
//! between the preferred and legacy directories under the per-user config
//! root.
//!
//! The per-user config root is `%APPDATA%` on Windows and `$HOME/.config`
//! everywhere else, including macOS, so that upstream Bifrost installs
//! (which always used `~/.config/bifrost`) are found.

use std::fmt;
use std::path::{Path, PathBuf};

use mesh_core::env::{vars, EnvSource};
use mesh_core::{is_blank, Precedence, LEGACY_PRODUCT_NAME};

use crate::naming::NamingPolicy;

const SOURCE_APP_DIR: &str = "app-dir";
const SOURCE_ENV_OVERRIDE: &str = vars::CONFIG_DIR;

/// Where a resolved config directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Caller-supplied directory.
    AppDir,
    /// `MESH_GATEWAY_CONFIG_DIR`.
    EnvOverride,
    /// Existing preferred directory.
    Preferred,
    /// Existing legacy directory, preferred one absent.
    Legacy,
    /// Preferred directory, not yet present on disk.
    FreshInstall,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AppDir => "app-dir",
            Self::EnvOverride => "env-override",
            Self::Preferred => "preferred",
            Self::Legacy => "legacy",
            Self::FreshInstall => "fresh-install",
        };
        f.write_str(label)
    }
}

/// A resolved config directory and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The directory to use.
    pub path: PathBuf,
    /// The precedence rule that selected it.
    pub source: ResolutionSource,
}

impl Resolution {
    /// True when the directory is the legacy Bifrost location.
    pub fn is_legacy(&self) -> bool {
        self.source == ResolutionSource::Legacy
    }
}

/// Resolves the gateway's config directory.
///
/// Holds everything read from the environment at construction; resolving
/// afterwards only probes the filesystem. `Send + Sync`, no interior state.
#[derive(Debug, Clone)]
pub struct ConfigDirResolver {
    policy: NamingPolicy,
    dir_override: Option<String>,
    config_root: PathBuf,
}

impl ConfigDirResolver {
    /// Create a resolver rooted at `config_root`, with no full-path override.
    pub fn new(policy: NamingPolicy, config_root: impl Into<PathBuf>) -> Self {
        Self {
            policy,
            dir_override: None,
            config_root: config_root.into(),
        }
    }

    /// Set the full-path override that ranks below a caller-supplied directory.
    #[must_use]
    pub fn with_dir_override(mut self, dir_override: Option<String>) -> Self {
        self.dir_override = dir_override;
        self
    }

    /// Build a resolver from `env`: naming policy, `MESH_GATEWAY_CONFIG_DIR`,
    /// and the platform config root.
    pub fn from_env(env: &impl EnvSource) -> Self {
        Self::new(NamingPolicy::from_env(env), user_config_root(env))
            .with_dir_override(env.var(vars::CONFIG_DIR))
    }

    /// The naming policy in effect.
    pub fn policy(&self) -> &NamingPolicy {
        &self.policy
    }

    /// The per-user config root the candidates are built under.
    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    /// Candidate directory for the preferred name.
    pub fn preferred_path(&self) -> PathBuf {
        self.config_root.join(self.policy.preferred_dir_name())
    }

    /// Candidate directory for the legacy name.
    pub fn legacy_path(&self) -> PathBuf {
        self.config_root.join(self.policy.legacy_dir_name())
    }

    /// Resolve the config directory.
    ///
    /// `explicit_app_dir` wins when non-blank and is returned verbatim,
    /// whether or not it exists.
    pub fn resolve(&self, explicit_app_dir: Option<&str>) -> PathBuf {
        self.resolve_detailed(explicit_app_dir).path
    }

    /// Resolve the config directory, reporting which rule applied.
    pub fn resolve_detailed(&self, explicit_app_dir: Option<&str>) -> Resolution {
        let overridden = Precedence::new()
            .value(SOURCE_APP_DIR, explicit_app_dir)
            .value(SOURCE_ENV_OVERRIDE, self.dir_override.as_deref())
            .resolve();

        if let Some(resolved) = overridden {
            let source = match resolved.source {
                SOURCE_APP_DIR => ResolutionSource::AppDir,
                _ => ResolutionSource::EnvOverride,
            };
            return Resolution {
                path: PathBuf::from(resolved.value),
                source,
            };
        }

        self.resolve_default()
    }

    fn resolve_default(&self) -> Resolution {
        let preferred = self.preferred_path();

        if !self.policy.legacy_fallback_enabled() {
            tracing::debug!(path = %preferred.display(), "legacy fallback disabled");
            return Resolution {
                path: preferred,
                source: ResolutionSource::Preferred,
            }
            .or_fresh_install();
        }

        if preferred.is_dir() {
            return Resolution {
                path: preferred,
                source: ResolutionSource::Preferred,
            };
        }

        let legacy = self.legacy_path();
        if legacy.is_dir() {
            tracing::info!(
                legacy = %legacy.display(),
                preferred = %preferred.display(),
                "using legacy {} config directory",
                LEGACY_PRODUCT_NAME
            );
            return Resolution {
                path: legacy,
                source: ResolutionSource::Legacy,
            };
        }

        Resolution {
            path: preferred,
            source: ResolutionSource::FreshInstall,
        }
    }
}

impl Resolution {
    fn or_fresh_install(mut self) -> Self {
        if !self.path.is_dir() {
            self.source = ResolutionSource::FreshInstall;
        }
        self
    }
}

/// Per-user configuration root for this platform.
///
/// Reads `APPDATA` (Windows) or `HOME` from `env`, then asks the OS via
/// `dirs`. Relative values are skipped. When nothing absolute is available
/// the current directory is used.
pub fn user_config_root(env: &impl EnvSource) -> PathBuf {
    platform_config_root(env).unwrap_or_else(|| {
        let fallback = std::env::current_dir()
            .ok()
            .filter(|dir| dir.is_absolute())
            .unwrap_or_else(std::env::temp_dir);
        tracing::warn!(
            root = %fallback.display(),
            "no per-user config root available; using working directory"
        );
        fallback
    })
}

fn absolute_var(env: &impl EnvSource, key: &str) -> Option<PathBuf> {
    let value = env.var(key).filter(|v| !is_blank(v))?;
    let path = PathBuf::from(value);
    if path.is_absolute() {
        Some(path)
    } else {
        tracing::warn!(var = key, path = %path.display(), "ignoring relative path");
        None
    }
}

#[cfg(windows)]
fn platform_config_root(env: &impl EnvSource) -> Option<PathBuf> {
    absolute_var(env, vars::APPDATA)
        .or_else(dirs::config_dir)
        .filter(|root| root.is_absolute())
}

#[cfg(not(windows))]
fn platform_config_root(env: &impl EnvSource) -> Option<PathBuf> {
    absolute_var(env, vars::HOME)
        .or_else(dirs::home_dir)
        .filter(|home| home.is_absolute())
        .map(|home| home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn resolver(root: &Path, fallback: bool) -> ConfigDirResolver {
        ConfigDirResolver::new(NamingPolicy::new("mesh-test-config", fallback), root)
    }

    #[test]
    fn test_app_dir_wins_even_when_missing() {
        let root = tempfile::tempdir().unwrap();
        let custom = root.path().join("custom");
        let resolved = resolver(root.path(), true)
            .with_dir_override(Some("/env/override".to_string()))
            .resolve_detailed(custom.to_str());
        assert_eq!(resolved.path, custom);
        assert_eq!(resolved.source, ResolutionSource::AppDir);
    }

    #[test]
    fn test_blank_app_dir_defers_to_env_override() {
        let root = tempfile::tempdir().unwrap();
        let resolved = resolver(root.path(), true)
            .with_dir_override(Some("/env/override".to_string()))
            .resolve_detailed(Some("   "));
        assert_eq!(resolved.path, PathBuf::from("/env/override"));
        assert_eq!(resolved.source, ResolutionSource::EnvOverride);
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        let root = tempfile::tempdir().unwrap();
        let r = resolver(root.path(), true).with_dir_override(Some(" ".to_string()));
        assert_eq!(r.resolve(None), r.preferred_path());
    }

    #[test]
    fn test_fresh_install_gets_preferred_path() {
        let root = tempfile::tempdir().unwrap();
        let r = resolver(root.path(), true);
        let resolved = r.resolve_detailed(None);
        assert_eq!(resolved.path, root.path().join("mesh-test-config"));
        assert_eq!(resolved.source, ResolutionSource::FreshInstall);
        assert!(!resolved.path.exists(), "resolver must not create directories");
    }

    #[test]
    fn test_legacy_file_is_not_a_directory() {
        let root = tempfile::tempdir().unwrap();
        let r = resolver(root.path(), true);
        std::fs::write(r.legacy_path(), b"not a dir").unwrap();
        assert_eq!(r.resolve_detailed(None).source, ResolutionSource::FreshInstall);
    }

    #[test]
    fn test_disabled_fallback_reports_existing_preferred() {
        let root = tempfile::tempdir().unwrap();
        let r = resolver(root.path(), false);
        std::fs::create_dir_all(r.preferred_path()).unwrap();
        assert_eq!(r.resolve_detailed(None).source, ResolutionSource::Preferred);
    }

    #[test]
    fn test_from_env_reads_override_and_root() {
        let root = tempfile::tempdir().unwrap();
        let root_str = root.path().to_string_lossy().into_owned();
        let env = BTreeMap::from([
            (vars::HOME.to_string(), root_str.clone()),
            (vars::APPDATA.to_string(), root_str),
            (vars::CONFIG_DIR.to_string(), "/explicit-config".to_string()),
        ]);
        let r = ConfigDirResolver::from_env(&env);
        assert_eq!(r.resolve(None), PathBuf::from("/explicit-config"));
        assert!(r.config_root().starts_with(root.path()));
    }

    #[test]
    fn test_relative_home_is_not_used_as_root() {
        let env = BTreeMap::from([
            (vars::HOME.to_string(), "relhome".to_string()),
            (vars::APPDATA.to_string(), "relhome".to_string()),
        ]);
        let r = ConfigDirResolver::from_env(&env);
        assert!(r.config_root().is_absolute(), "{}", r.config_root().display());
        assert!(!r.config_root().starts_with("relhome"));
        assert!(r.resolve(None).is_absolute());
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(ResolutionSource::Legacy.to_string(), "legacy");
        assert_eq!(ResolutionSource::FreshInstall.to_string(), "fresh-install");
    }
}
