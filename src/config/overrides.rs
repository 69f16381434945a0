//! Command-line overrides applied on top of the merged settings

use super::args::SettingsArgs;
use super::error::{type_name, Result, SettingsError};
use super::merge::RawConfig;
use super::settings::LogLevel;
use std::path::PathBuf;
use toml::Value;

/// The fixed set of settings a command line can override.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub log_level: Option<LogLevel>,
    pub log_directory: Option<PathBuf>,
    /// Replaces the user settings file; consumed while choosing sources.
    pub config_file: Option<PathBuf>,
    pub show_version: bool,
    /// Flag that set `log_level`, for error reporting.
    pub level_flag: Option<&'static str>,
}

impl From<&SettingsArgs> for CliOverrides {
    fn from(args: &SettingsArgs) -> Self {
        let level_flag = if args.verbose {
            Some("--verbose")
        } else if args.quiet {
            Some("--quiet")
        } else {
            None
        };
        Self {
            log_level: args.log_level(),
            log_directory: args.log_directory.clone(),
            config_file: args.config_file.clone(),
            show_version: args.display_version,
            level_flag,
        }
    }
}

impl CliOverrides {
    /// True if nothing would be written into the settings tree.
    pub fn is_empty(&self) -> bool {
        self.log_level.is_none() && self.log_directory.is_none()
    }

    /// Assign the overridden fields directly into `settings`.
    pub fn apply(&self, settings: &mut RawConfig) -> Result<()> {
        if let Some(level) = self.log_level {
            let flag = self.level_flag.unwrap_or("--verbose");
            set_path(settings, &["logger", "log_level"], Value::String(level.to_string()), flag)?;
        }
        if let Some(dir) = &self.log_directory {
            let value = Value::String(dir.to_string_lossy().into_owned());
            set_path(settings, &["logger", "log_directory"], value, "--log-directory")?;
        }
        Ok(())
    }
}

/// Set `path` to `value`, creating intermediate tables as needed.
fn set_path(root: &mut RawConfig, path: &[&str], value: Value, argument: &str) -> Result<()> {
    let Some((leaf, parents)) = path.split_last() else {
        return Ok(());
    };

    let mut table = root;
    for (depth, key) in parents.iter().enumerate() {
        let entry = table
            .entry(key.to_string())
            .or_insert_with(|| Value::Table(RawConfig::new()));
        table = match entry {
            Value::Table(inner) => inner,
            other => {
                return Err(SettingsError::InvalidOverrideType {
                    argument: argument.to_string(),
                    key: parents[..=depth].join("."),
                    found: type_name(other),
                })
            }
        };
    }
    table.insert(leaf.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> RawConfig {
        toml::from_str(text).expect("valid toml")
    }

    #[test]
    fn test_apply_level_and_directory() {
        let mut settings = table("[logger]\nlog_level = 'INFO'\nlog_indent = 4\n");
        let overrides = CliOverrides {
            log_level: Some(LogLevel::Debug),
            log_directory: Some(PathBuf::from("/custom/logs")),
            ..Default::default()
        };
        overrides.apply(&mut settings).expect("apply");

        assert_eq!(settings["logger"]["log_level"].as_str(), Some("DEBUG"));
        assert_eq!(settings["logger"]["log_directory"].as_str(), Some("/custom/logs"));
        assert_eq!(settings["logger"]["log_indent"].as_integer(), Some(4));
    }

    #[test]
    fn test_apply_creates_missing_section() {
        let mut settings = RawConfig::new();
        let overrides = CliOverrides { log_level: Some(LogLevel::Warning), ..Default::default() };
        overrides.apply(&mut settings).expect("apply");
        assert_eq!(settings["logger"]["log_level"].as_str(), Some("WARNING"));
    }

    #[test]
    fn test_empty_overrides_do_nothing() {
        let original = table("[logger]\nlog_level = 'ERROR'\n");
        let mut settings = original.clone();
        let overrides = CliOverrides::default();
        assert!(overrides.is_empty());
        overrides.apply(&mut settings).expect("apply");
        assert_eq!(settings, original);
    }

    #[test]
    fn test_scalar_section_is_invalid_override() {
        let mut settings = table("logger = 'off'\n");
        let args = SettingsArgs { quiet: true, ..Default::default() };
        let err = CliOverrides::from(&args).apply(&mut settings).expect_err("type mismatch");
        match err {
            SettingsError::InvalidOverrideType { argument, key, found } => {
                assert_eq!(argument, "--quiet");
                assert_eq!(key, "logger");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
