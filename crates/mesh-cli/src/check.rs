//! # Check Subcommand
//!
//! Validates the gateway config file against the embedded schema.
//!
//! A config directory without `config.json` is a fresh install and passes.
//! An explicit `--file` that does not exist, or a config path that is not a
//! regular file, is an operational error.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use mesh_core::LEGACY_PRODUCT_NAME;
use mesh_schema::{SchemaDeclaration, SchemaValidationError, Violation};
use serde::Serialize;
use serde_json::Value;

use crate::startup::Startup;
use crate::CONFIG_FILE_NAME;

/// Arguments for the `mesh-gateway check` subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Use this config directory, ignoring environment overrides.
    #[arg(long, value_name = "DIR")]
    pub app_dir: Option<String>,

    /// Validate this file instead of `<config-dir>/config.json`.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable check result.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// File that was checked.
    pub path: PathBuf,
    /// Whether the file exists.
    pub found: bool,
    /// Whether the file passed validation.
    pub valid: bool,
    /// Syntax error, when the file is not JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub malformed: Option<String>,
    /// Structural violations, in report order.
    pub violations: Vec<Violation>,
    /// `canonical`, `legacy`, `unrecognized`, or `absent`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_declaration: Option<&'static str>,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_check(args: &CheckArgs, startup: &Startup, out: &mut dyn Write) -> Result<u8> {
    let explicit_file = args.file.is_some();
    let path = match &args.file {
        Some(file) => file.clone(),
        None => startup
            .resolver
            .resolve(args.app_dir.as_deref())
            .join(CONFIG_FILE_NAME),
    };

    if !path.exists() {
        if explicit_file {
            anyhow::bail!("config file not found: {}", path.display());
        }
        tracing::info!(path = %path.display(), "no config file; fresh install");
        let report = CheckReport {
            path,
            found: false,
            valid: true,
            malformed: None,
            violations: Vec::new(),
            schema_declaration: None,
        };
        emit(args, &report, out, |out| {
            writeln!(out, "OK: no config file at {}; defaults apply", report.path.display())
        })?;
        return Ok(0);
    }

    if !path.is_file() {
        anyhow::bail!("config path is not a regular file: {}", path.display());
    }

    let schema = startup.schema()?;
    let raw = std::fs::read(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let (malformed, violations) = match schema.validate(&raw) {
        Ok(()) => (None, Vec::new()),
        Err(SchemaValidationError::MalformedPayload { reason }) => (Some(reason), Vec::new()),
        Err(SchemaValidationError::ValidationFailed { violations, .. }) => {
            (None, violations.into_inner())
        }
        Err(other) => return Err(other).context("schema validation could not run"),
    };

    // The no-op schema lets non-JSON through; there is no declaration to read then.
    let declaration = serde_json::from_slice::<Value>(&raw)
        .ok()
        .map(|value| startup.schema_urls.classify(&value));

    let report = CheckReport {
        valid: malformed.is_none() && violations.is_empty(),
        found: true,
        malformed,
        violations,
        schema_declaration: declaration.as_ref().map(declaration_label),
        path,
    };

    emit(args, &report, out, |out| {
        render_text(&report, declaration.as_ref(), startup, schema.name(), out)
    })?;

    Ok(if report.valid { 0 } else { 1 })
}

fn emit<F>(args: &CheckArgs, report: &CheckReport, out: &mut dyn Write, text: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    if args.json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
    } else {
        text(out)?;
    }
    Ok(())
}

fn render_text(
    report: &CheckReport,
    declaration: Option<&SchemaDeclaration>,
    startup: &Startup,
    schema_name: &str,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    let path = report.path.display();

    if let Some(reason) = &report.malformed {
        return writeln!(out, "FAIL: {path}: invalid JSON: {reason}");
    }

    if report.violations.is_empty() {
        writeln!(out, "OK: {path} conforms to {schema_name}")?;
    } else {
        writeln!(
            out,
            "FAIL: {path}: {} schema violation(s) against {schema_name}",
            report.violations.len()
        )?;
        for v in &report.violations {
            writeln!(out, "{v}")?;
        }
    }

    let canonical = startup.schema_urls.canonical();
    match declaration {
        Some(SchemaDeclaration::Legacy) => writeln!(
            out,
            "NOTE: $schema uses the legacy {LEGACY_PRODUCT_NAME} URL {}; update it to {canonical}",
            startup.schema_urls.legacy()
        ),
        Some(SchemaDeclaration::Unrecognized(url)) => writeln!(
            out,
            "WARN: $schema '{url}' is not recognized by {}; expected {canonical}",
            startup.branding.product_name
        ),
        _ => Ok(()),
    }
}

fn declaration_label(declaration: &SchemaDeclaration) -> &'static str {
    match declaration {
        SchemaDeclaration::Canonical => "canonical",
        SchemaDeclaration::Legacy => "legacy",
        SchemaDeclaration::Unrecognized(_) => "unrecognized",
        SchemaDeclaration::Absent => "absent",
    }
}
