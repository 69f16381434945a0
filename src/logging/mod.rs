//! Logging setup
//!
//! Installs a tracing subscriber with:
//! - a rotating log file in the resolved log directory
//! - a console echo on stderr when attached to a terminal
//! - the resolved log level as the filter, unless `RUST_LOG` sets directives

pub mod format;
pub mod rotate;

pub use format::{render_record, WrappedFormat};
pub use rotate::{Rotation, RotatingFile, RotatingFileWriter};

use crate::config::{LogLevel, ResolvedSettings};
use anyhow::{Context, Result};
use std::fs;
use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file handling for [`init`].
#[derive(Debug, Clone)]
pub struct LogOptions {
    pub rotation: Rotation,
    /// Rotated files to keep; zero keeps all of them
    pub backup_count: usize,
    /// Force the console echo on or off instead of following `system.isatty`
    pub console: Option<bool>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self { rotation: Rotation::Midnight, backup_count: 7, console: None }
    }
}

/// Build the subscriber without installing it.
pub fn build_subscriber(
    settings: &ResolvedSettings,
    file_name: &str,
    options: &LogOptions,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    let logger = &settings.settings().logger;
    let directory = settings.log_directory()?;
    fs::create_dir_all(&directory)
        .with_context(|| format!("Failed creating log directory: {}", directory.display()))?;

    let path = directory.join(file_name);
    let file = RotatingFile::open(&path, options.rotation, options.backup_count)
        .with_context(|| format!("Failed opening log file: {}", path.display()))?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(RotatingFileWriter::new(file))
        .event_format(WrappedFormat::file(logger.log_indent, logger.log_max_width));

    let console_layer = options.console.unwrap_or(settings.isatty()).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .event_format(WrappedFormat::console(logger.log_indent, logger.log_max_width))
    });

    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let filter = level_filter(settings.log_level(), &env_directives);

    Ok(tracing_subscriber::registry().with(file_layer).with(console_layer).with(filter))
}

/// Filter from `env_directives` (the `RUST_LOG` syntax), falling back to
/// `level` when they are empty.
pub fn level_filter(level: LogLevel, env_directives: &str) -> EnvFilter {
    let level: tracing::Level = level.into();
    EnvFilter::builder().with_default_directive(level.into()).parse_lossy(env_directives)
}

/// Install the global subscriber writing to `<log directory>/<file_name>`.
///
/// A subscriber that is already installed is left in place.
pub fn init(settings: &ResolvedSettings, file_name: &str, options: &LogOptions) -> Result<()> {
    let subscriber = build_subscriber(settings, file_name, options)?;
    let _ = subscriber.try_init();
    tracing::debug!(
        directory = %settings.log_directory()?.display(),
        level = %settings.log_level(),
        "File logging enabled"
    );
    Ok(())
}
