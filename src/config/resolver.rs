//! Layered settings resolution
//!
//! Sources are applied lowest rank first:
//! 1. Packaged defaults compiled into the library
//! 2. User settings file (platform config dir, or `--config-file`)
//! 3. System facts detected at runtime (`system.isatty`)
//! 4. Command-line overrides (`-v`/`-q`, `-l`)

use super::args::parse_known_args;
use super::error::Result;
use super::loader::{ConfigSource, SourceOrigin, SourceRecord};
use super::merge::{merge, RawConfig};
use super::overrides::CliOverrides;
use super::paths::{default_config_file, ensure_dir};
use super::resolved::ResolvedSettings;
use super::settings::SystemSettings;
use std::path::PathBuf;

/// Defaults shipped with the library.
pub const PACKAGED_DEFAULTS: &str = include_str!("../../data/settings.toml");

const PACKAGED_NAME: &str = "data/settings.toml";

pub const PACKAGED_RANK: u8 = 10;
pub const USER_RANK: u8 = 20;
pub const SYSTEM_RANK: u8 = 30;

/// Builds [`ResolvedSettings`] from the standard sources.
#[derive(Debug, Clone)]
pub struct Resolver {
    packaged_name: &'static str,
    packaged_text: &'static str,
    user_config_file: Option<PathBuf>,
    system: Option<SystemSettings>,
    create_config_dir: bool,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            packaged_name: PACKAGED_NAME,
            packaged_text: PACKAGED_DEFAULTS,
            user_config_file: None,
            system: None,
            create_config_dir: true,
        }
    }

    /// Replace the packaged defaults (applications layering their own).
    pub fn packaged_defaults(mut self, name: &'static str, text: &'static str) -> Self {
        self.packaged_name = name;
        self.packaged_text = text;
        self
    }

    /// Use this user settings file instead of the platform default.
    /// `--config-file` still takes precedence.
    pub fn user_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_config_file = Some(path.into());
        self
    }

    /// Use these system facts instead of detecting them.
    pub fn system_settings(mut self, system: SystemSettings) -> Self {
        self.system = Some(system);
        self
    }

    /// Set whether the directory holding the user settings file is created.
    pub fn create_config_dir(mut self, create: bool) -> Self {
        self.create_config_dir = create;
        self
    }

    /// Resolve using the current process arguments.
    pub fn from_env(&self) -> Result<ResolvedSettings> {
        self.resolve_args(std::env::args())
    }

    /// Resolve using `argv` (program name first). Unrecognized arguments
    /// are available from [`ResolvedSettings::remaining_args`].
    pub fn resolve_args<I, T>(&self, argv: I) -> Result<ResolvedSettings>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let parsed = parse_known_args(argv)?;
        let overrides = CliOverrides::from(&parsed.args);
        Ok(self.resolve(&overrides)?.with_remaining_args(parsed.remaining))
    }

    /// Resolve with explicit command-line overrides.
    pub fn resolve(&self, overrides: &CliOverrides) -> Result<ResolvedSettings> {
        let user_file = match overrides.config_file.as_ref().or(self.user_config_file.as_ref()) {
            Some(path) => path.clone(),
            None => default_config_file()?,
        };

        if self.create_config_dir {
            if let Some(parent) = user_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
        }

        let resolved = resolve_sources(self.sources(user_file.clone()), overrides)?;
        Ok(resolved.with_config_file(user_file))
    }

    /// The standard source chain for the given user settings file.
    pub fn sources(&self, user_file: PathBuf) -> Vec<ConfigSource> {
        let system = self.system.clone().unwrap_or_else(SystemSettings::detect);
        vec![
            ConfigSource::embedded(
                SourceOrigin::Packaged,
                PACKAGED_RANK,
                self.packaged_name,
                self.packaged_text,
            ),
            ConfigSource::file(SourceOrigin::User, USER_RANK, user_file),
            ConfigSource::table(SourceOrigin::System, SYSTEM_RANK, system.to_table()),
        ]
    }
}

/// Merge `sources` in ascending rank, then apply `overrides`.
///
/// Absent sources are skipped; any other load failure aborts resolution.
pub fn resolve_sources(
    mut sources: Vec<ConfigSource>,
    overrides: &CliOverrides,
) -> Result<ResolvedSettings> {
    sources.sort_by_key(|source| source.rank);

    let mut merged = RawConfig::new();
    let mut records = Vec::with_capacity(sources.len() + 1);

    for source in &sources {
        let layer = source.read()?;
        records.push(SourceRecord {
            origin: source.origin,
            location: source.describe(),
            rank: source.rank,
            present: layer.is_some(),
        });
        if let Some(layer) = layer {
            merge(&mut merged, layer);
        }
    }

    overrides.apply(&mut merged)?;
    if !overrides.is_empty() {
        records.push(SourceRecord {
            origin: SourceOrigin::Cli,
            location: "<command line>".to_string(),
            rank: u8::MAX,
            present: true,
        });
    }

    tracing::debug!(sources = records.len(), "Settings resolved");
    ResolvedSettings::from_merged(merged, records, overrides.show_version)
}
