//! # Config-Dir Subcommand
//!
//! Prints the resolved config directory on stdout, one line, for use in
//! scripts. How it was chosen goes to the log.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use mesh_config::ResolutionSource;
use mesh_core::LEGACY_PRODUCT_NAME;

use crate::startup::Startup;

/// Arguments for the `mesh-gateway config-dir` subcommand.
#[derive(Args, Debug, Default)]
pub struct ConfigDirArgs {
    /// Use this directory, ignoring environment overrides.
    #[arg(long, value_name = "DIR")]
    pub app_dir: Option<String>,
}

/// Execute the config-dir subcommand.
pub fn run_config_dir(args: &ConfigDirArgs, startup: &Startup, out: &mut dyn Write) -> Result<u8> {
    let resolution = startup.resolver.resolve_detailed(args.app_dir.as_deref());

    match resolution.source {
        ResolutionSource::Legacy => tracing::warn!(
            preferred = %startup.resolver.preferred_path().display(),
            "{} is reading the legacy {} config directory; move it to the preferred location to finish migrating",
            startup.branding.product_name,
            LEGACY_PRODUCT_NAME
        ),
        ResolutionSource::FreshInstall => {
            tracing::info!("config directory does not exist yet; defaults apply")
        }
        source => tracing::info!(%source, "config directory resolved"),
    }

    writeln!(out, "{}", resolution.path.display())?;
    Ok(0)
}
