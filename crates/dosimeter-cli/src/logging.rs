//! tracing-subscriber setup shared by every subcommand.

use anyhow::Context;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Level used by one-shot subcommands when neither `RUST_LOG` nor `-v` is set.
pub const DEFAULT_LEVEL: &str = "warn";

/// Logging flags from the command line.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Number of `-v` flags.
    pub verbose: u8,
    /// `--log-file`.
    pub file: Option<PathBuf>,
}

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG`, then the `-v` count, then
/// `default_level`. Console output goes to stderr so command output on
/// stdout stays clean. A log file, from `--log-file` or `default_file`, is
/// appended to without ANSI colors.
pub fn init(
    options: &LogOptions,
    default_level: &str,
    default_file: Option<&Path>,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match options.verbose {
            0 => default_level,
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(level)
    });

    let file_layer = match options.file.as_deref().or(default_file) {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}
