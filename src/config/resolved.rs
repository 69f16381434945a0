//! Result of settings resolution

use super::error::{Result, SettingsError};
use super::loader::SourceRecord;
use super::merge::RawConfig;
use super::paths::user_log_dir;
use super::settings::{LogLevel, Settings};
use super::view::SettingsView;
use std::path::{Path, PathBuf};

/// Exit status used after printing the version banner.
pub const VERSION_EXIT_CODE: i32 = 2;

/// Settings for the session, built once at process entry and passed by
/// reference to whoever needs them.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    settings: Settings,
    view: SettingsView,
    sources: Vec<SourceRecord>,
    remaining_args: Vec<String>,
    config_file: Option<PathBuf>,
    show_version: bool,
}

impl ResolvedSettings {
    pub(crate) fn from_merged(
        merged: RawConfig,
        sources: Vec<SourceRecord>,
        show_version: bool,
    ) -> Result<Self> {
        let settings = typed_sections(&merged)?;
        Ok(Self {
            settings,
            view: SettingsView::new(merged),
            sources,
            remaining_args: Vec::new(),
            config_file: None,
            show_version,
        })
    }

    pub(crate) fn with_remaining_args(mut self, remaining: Vec<String>) -> Self {
        self.remaining_args = remaining;
        self
    }

    pub(crate) fn with_config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    /// Typed known sections.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace an existing leaf of the merged tree and re-derive the typed
    /// sections from it, returning the previous value. Meant for isolating
    /// tests from the user's settings.
    ///
    /// Nothing changes if the key is unknown or the new value does not fit
    /// the typed schema.
    pub fn override_leaf(
        &mut self,
        path: &str,
        value: impl Into<toml::Value>,
    ) -> Result<toml::Value> {
        let mut view = self.view.clone();
        let previous = view.override_leaf(path, value)?;
        self.settings = typed_sections(view.as_table())?;
        self.view = view;
        Ok(previous)
    }

    /// The merged tree, including application sections.
    pub fn view(&self) -> &SettingsView {
        &self.view
    }

    /// Sources in the order they were applied.
    pub fn sources(&self) -> &[SourceRecord] {
        &self.sources
    }

    /// User settings file consulted during resolution, whether or not it
    /// existed.
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Program name followed by the arguments the resolver did not consume.
    pub fn remaining_args(&self) -> &[String] {
        &self.remaining_args
    }

    pub fn log_level(&self) -> LogLevel {
        self.settings.logger.log_level
    }

    pub fn isatty(&self) -> bool {
        self.settings.system.isatty
    }

    /// Explicit log directory, or the platform default for the configured
    /// application name and author.
    pub fn log_directory(&self) -> Result<PathBuf> {
        let logger = &self.settings.logger;
        match &logger.log_directory {
            Some(dir) => Ok(dir.clone()),
            None => user_log_dir(&logger.log_app_name, &logger.log_author),
        }
    }

    /// Banner to print when `-V/--version` was given.
    pub fn version_banner(&self, name: &str, version: &str) -> Option<String> {
        self.show_version.then(|| format!("{name} - version {version}"))
    }

    /// Print the version banner and exit with status 2 if `-V/--version`
    /// was given; otherwise do nothing.
    pub fn show_version(&self, name: &str, version: &str) {
        if let Some(banner) = self.version_banner(name, version) {
            println!("{banner}");
            std::process::exit(VERSION_EXIT_CODE);
        }
    }
}

fn typed_sections(merged: &RawConfig) -> Result<Settings> {
    toml::Value::Table(merged.clone()).try_into().map_err(SettingsError::Schema)
}
