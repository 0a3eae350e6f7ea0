//! Integration test: config directory resolution against a real filesystem.
//!
//! Each test builds a throwaway per-user config root with `tempfile`, points
//! `HOME`/`APPDATA` at it through an in-memory environment, and checks which
//! directory the resolver picks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mesh_config::{ConfigDirResolver, ResolutionSource};
use mesh_core::env::vars;
use mesh_core::LEGACY_CONFIG_DIR_NAME;
use proptest::prelude::*;

const TEST_DIR_NAME: &str = "mesh-test-config";

/// Preferred and legacy paths the resolver should compute under `root`.
fn expected_config_paths(root: &Path) -> (PathBuf, PathBuf) {
    let base = if cfg!(windows) {
        root.to_path_buf()
    } else {
        root.join(".config")
    };
    (base.join(TEST_DIR_NAME), base.join(LEGACY_CONFIG_DIR_NAME))
}

fn test_env(root: &Path, fallback: &str) -> BTreeMap<String, String> {
    let root = root.to_string_lossy().into_owned();
    BTreeMap::from([
        (vars::HOME.to_string(), root.clone()),
        (vars::APPDATA.to_string(), root),
        (vars::CONFIG_DIR.to_string(), String::new()),
        (vars::CONFIG_DIR_NAME.to_string(), TEST_DIR_NAME.to_string()),
        (vars::LEGACY_DIR_FALLBACK.to_string(), fallback.to_string()),
    ])
}

#[test]
fn test_uses_app_dir_when_provided() {
    let tmp = tempfile::tempdir().unwrap();
    let custom = tmp.path().join("custom");
    let resolver = ConfigDirResolver::from_env(&test_env(tmp.path(), "true"));
    assert_eq!(resolver.resolve(custom.to_str()), custom);
}

#[test]
fn test_uses_explicit_env_override() {
    let tmp = tempfile::tempdir().unwrap();
    let explicit = tmp.path().join("explicit-config");
    let mut env = test_env(tmp.path(), "true");
    env.insert(vars::CONFIG_DIR.to_string(), explicit.to_string_lossy().into_owned());

    let resolver = ConfigDirResolver::from_env(&env);
    assert_eq!(resolver.resolve(None), explicit);
    assert_eq!(resolver.resolve(Some("")), explicit);
}

#[test]
fn test_uses_legacy_fallback_when_only_legacy_exists() {
    let tmp = tempfile::tempdir().unwrap();
    let (preferred, legacy) = expected_config_paths(tmp.path());
    std::fs::create_dir_all(&legacy).unwrap();

    let resolved = ConfigDirResolver::from_env(&test_env(tmp.path(), "true")).resolve_detailed(None);
    assert_eq!(
        resolved.path, legacy,
        "expected legacy path when preferred path {} does not exist",
        preferred.display()
    );
    assert!(resolved.is_legacy());
}

#[test]
fn test_prefers_new_path_when_present() {
    let tmp = tempfile::tempdir().unwrap();
    let (preferred, legacy) = expected_config_paths(tmp.path());
    std::fs::create_dir_all(&preferred).unwrap();
    std::fs::create_dir_all(&legacy).unwrap();

    let resolved = ConfigDirResolver::from_env(&test_env(tmp.path(), "true")).resolve_detailed(None);
    assert_eq!(resolved.path, preferred);
    assert_eq!(resolved.source, ResolutionSource::Preferred);
}

#[test]
fn test_disables_legacy_fallback_when_requested() {
    let tmp = tempfile::tempdir().unwrap();
    let (preferred, legacy) = expected_config_paths(tmp.path());
    std::fs::create_dir_all(&legacy).unwrap();

    let resolver = ConfigDirResolver::from_env(&test_env(tmp.path(), "false"));
    assert_eq!(resolver.resolve(None), preferred);
    assert!(!preferred.exists());
}

#[test]
fn test_unrecognized_toggle_keeps_fallback_enabled() {
    let tmp = tempfile::tempdir().unwrap();
    let (_, legacy) = expected_config_paths(tmp.path());
    std::fs::create_dir_all(&legacy).unwrap();

    let resolver = ConfigDirResolver::from_env(&test_env(tmp.path(), "sometimes"));
    assert_eq!(resolver.resolve(None), legacy);
}

#[test]
fn test_neither_path_exists_yields_preferred() {
    let tmp = tempfile::tempdir().unwrap();
    let (preferred, _) = expected_config_paths(tmp.path());

    let resolved = ConfigDirResolver::from_env(&test_env(tmp.path(), "true")).resolve_detailed(None);
    assert_eq!(resolved.path, preferred);
    assert_eq!(resolved.source, ResolutionSource::FreshInstall);
    assert!(resolved.path.is_absolute());
}

#[test]
fn test_resolution_is_repeatable() {
    let tmp = tempfile::tempdir().unwrap();
    let (_, legacy) = expected_config_paths(tmp.path());
    std::fs::create_dir_all(&legacy).unwrap();

    let resolver = ConfigDirResolver::from_env(&test_env(tmp.path(), "true"));
    let first = resolver.resolve(None);
    for _ in 0..5 {
        assert_eq!(resolver.resolve(None), first);
    }
}

proptest! {
    /// Any non-blank caller directory is returned unchanged.
    #[test]
    fn test_non_blank_app_dir_is_verbatim(dir in "[ ]{0,2}[a-zA-Z0-9_/.-]{1,24}[ ]{0,2}") {
        let resolver = ConfigDirResolver::from_env(&test_env(Path::new("/nonexistent-root"), "true"));
        prop_assert_eq!(resolver.resolve(Some(dir.as_str())), PathBuf::from(&dir));
    }

    /// A non-blank env override wins whenever the caller directory is blank.
    #[test]
    fn test_env_override_beats_blank_app_dir(
        over in "[a-zA-Z0-9_/.-]{1,24}",
        blank in "[ \t]{0,4}",
    ) {
        let mut env = test_env(Path::new("/nonexistent-root"), "true");
        env.insert(vars::CONFIG_DIR.to_string(), over.clone());
        let resolver = ConfigDirResolver::from_env(&env);
        prop_assert_eq!(resolver.resolve(Some(blank.as_str())), PathBuf::from(&over));
    }
}
