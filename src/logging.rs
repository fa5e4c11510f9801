//! Logging setup for ContestHub.
//!
//! The configured level applies to this crate's own targets. Dependencies
//! log at `warn` unless `RUST_LOG` says otherwise, in which case `RUST_LOG`
//! replaces the defaults entirely.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{ContestHubError, Result};

/// Level used for dependencies when `RUST_LOG` is not set.
const DEPENDENCY_LEVEL: &str = "warn";

/// Parse a configured level into a filter directive level. Unknown values
/// fall back to `info`.
fn parse_level(level: &str) -> &'static str {
    match level.trim().to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        "off" => "off",
        _ => "info",
    }
}

/// Filter directives used when `RUST_LOG` is not set.
fn default_directives(level: &str) -> String {
    let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
    format!(
        "{},{}={}",
        DEPENDENCY_LEVEL,
        crate_name,
        parse_level(level)
    )
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Open the log file for appending, creating missing parent directories.
///
/// Earlier runs' output is kept.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Initialize the logging system with the given configuration.
///
/// Writes to both stdout and the configured log file.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let log_file = Arc::new(open_log_file(Path::new(&config.file))?);
    let writer = std::io::stdout.and(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(&config.level))
        .try_init()
        .map_err(|e| ContestHubError::Logging(e.to_string()))
}

/// Initialize console-only logging (for development/testing).
pub fn init_console_only(level: &str) {
    // A subscriber may already be installed (tests, embedding hosts)
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_target(true),
        )
        .with(build_filter(level))
        .try_init();
}
