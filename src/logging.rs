//! Diagnostics for the chat consoles.
//!
//! Stdout is the operator's screen, so each role logs to its own file under
//! `logging.dir`. If that file cannot be opened, logs go to stderr instead.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::console::RoleKind;

/// Where log output ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Level for a configured name. Unknown names log at `info`.
fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => LevelFilter::WARN,
        other => other.parse().unwrap_or(LevelFilter::INFO),
    }
}

/// `RUST_LOG` wins when set; otherwise the configured level applies.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_filter(level).into()))
}

fn open_log_file(config: &LoggingConfig, role: RoleKind) -> std::io::Result<(PathBuf, File)> {
    let path = config.log_path(role);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).append(true).open(&path)?;
    Ok((path, file))
}

fn install<W>(filter: EnvFilter, writer: W, ansi: bool)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true),
        )
        .with(filter)
        .init();
}

/// Install the global subscriber for one console role.
pub fn init(config: &LoggingConfig, role: RoleKind) -> LogTarget {
    let filter = build_filter(&config.level);

    match open_log_file(config, role) {
        Ok((path, file)) => {
            install(filter, Arc::new(file), false);
            LogTarget::File(path)
        }
        Err(e) => {
            install(filter, std::io::stderr, true);
            warn!(
                "Cannot open log file {}: {}",
                config.log_path(role).display(),
                e
            );
            LogTarget::Stderr
        }
    }
}
