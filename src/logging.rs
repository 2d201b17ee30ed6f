//! Tracing setup for the `bls` binary.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &["bls_explorer"];

/// File the TUI logs to, since stderr belongs to the alternate screen.
pub const TUI_LOG_FILE: &str = "bls-explorer.log";

/// Map CLI verbosity to a filter directive.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// `RUST_LOG` env var overrides the CLI flag if set.
fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Log to stderr (CLI commands).
pub fn init(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(std::io::stderr)
        .init();
}

/// Log to `path` (TUI), but only when logging was asked for.
pub fn init_to_file(verbosity: u8, path: &Path) -> Result<(), AppError> {
    if verbosity == 0 && std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create log file '{}': {e}", path.display())))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
