//! # mesh-cli — Gateway Config Host
//!
//! Runs the startup sequence the gateway server performs before applying
//! its configuration: resolve the config directory, read `config.json`,
//! validate it against the embedded schema, and report on its `$schema`
//! declaration.
//!
//! ## Subcommands
//!
//! - `config-dir` — print the resolved config directory.
//! - `check` — validate the config file and print an itemized report.
//!
//! Exit codes: 0 success, 1 validation failure, 2 operational error.

pub mod check;
pub mod config_dir;
pub mod startup;

pub use startup::Startup;

/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";
