//! # mesh-config — Config Directory Resolution
//!
//! Decides which on-disk directory holds the gateway configuration.
//!
//! ## Resolution Order
//!
//! 1. A non-blank directory supplied by the caller (e.g. `--app-dir`).
//! 2. A non-blank `MESH_GATEWAY_CONFIG_DIR`.
//! 3. The per-user config root joined with the preferred directory name,
//!    unless only the legacy `bifrost` directory exists and legacy fallback
//!    is enabled, in which case the legacy directory is used.
//!
//! The resolver only probes for existing directories. It never creates,
//! writes, or validates anything; a resolved path that does not exist is a
//! fresh install, not an error.
//!
//! ## Crate Policy
//!
//! - Depends only on `mesh-core` internally.
//! - Environment is read once, through [`mesh_core::EnvSource`], when the
//!   [`NamingPolicy`] and [`ConfigDirResolver`] are built.

pub mod naming;
pub mod resolve;

pub use naming::NamingPolicy;
pub use resolve::{user_config_root, ConfigDirResolver, Resolution, ResolutionSource};
