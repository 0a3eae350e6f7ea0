//! # mesh-gateway entry point
//!
//! Parses command-line arguments, builds the startup context once, and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mesh_cli::check::{run_check, CheckArgs};
use mesh_cli::config_dir::{run_config_dir, ConfigDirArgs};
use mesh_cli::Startup;
use mesh_core::ProcessEnv;

/// Mesh AI Gateway config tooling.
///
/// Locates the gateway config directory (falling back to a legacy Bifrost
/// directory when present) and validates config.json against the schema
/// bundled with this binary.
#[derive(Parser, Debug)]
#[command(name = "mesh-gateway", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved config directory.
    ConfigDir(ConfigDirArgs),

    /// Validate config.json against the embedded schema.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, wins over -v.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let startup = Startup::from_env(&ProcessEnv);

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::ConfigDir(args) => run_config_dir(&args, &startup, &mut stdout),
        Commands::Check(args) => run_check(&args, &startup, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
