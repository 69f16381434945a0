//! Settings source loading

use super::error::{Result, SettingsError};
use super::merge::RawConfig;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where a settings layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    Packaged,
    User,
    System,
    Cli,
}

impl SourceOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceOrigin::Packaged => "packaged",
            SourceOrigin::User => "user",
            SourceOrigin::System => "system",
            SourceOrigin::Cli => "cli",
        }
    }
}

/// Location of a settings layer.
#[derive(Debug, Clone)]
pub enum SourceLocation {
    /// TOML file on disk; may be absent.
    File(PathBuf),
    /// TOML text compiled into the binary.
    Embedded { name: &'static str, text: &'static str },
    /// Already-parsed table built in process.
    Table(RawConfig),
}

/// One ranked layer in the precedence chain. Higher rank wins.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub origin: SourceOrigin,
    pub location: SourceLocation,
    pub rank: u8,
}

impl ConfigSource {
    pub fn file(origin: SourceOrigin, rank: u8, path: impl Into<PathBuf>) -> Self {
        Self { origin, location: SourceLocation::File(path.into()), rank }
    }

    pub fn embedded(origin: SourceOrigin, rank: u8, name: &'static str, text: &'static str) -> Self {
        Self { origin, location: SourceLocation::Embedded { name, text }, rank }
    }

    pub fn table(origin: SourceOrigin, rank: u8, table: RawConfig) -> Self {
        Self { origin, location: SourceLocation::Table(table), rank }
    }

    /// Read this source. `Ok(None)` means the source is absent.
    pub fn read(&self) -> Result<Option<RawConfig>> {
        match &self.location {
            SourceLocation::File(path) => read_optional(path),
            SourceLocation::Embedded { name, text } => {
                parse_toml(text, Path::new(name)).map(Some)
            }
            SourceLocation::Table(table) => Ok(Some(table.clone())),
        }
    }

    /// Display form of the location, for provenance records.
    pub fn describe(&self) -> String {
        match &self.location {
            SourceLocation::File(path) => path.display().to_string(),
            SourceLocation::Embedded { name, .. } => format!("<embedded {name}>"),
            SourceLocation::Table(_) => "<in-process>".to_string(),
        }
    }
}

/// Record of a source that took part in resolution.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRecord {
    pub origin: SourceOrigin,
    pub location: String,
    pub rank: u8,
    pub present: bool,
}

/// Load a settings file. A missing file yields an empty table.
pub fn load(path: &Path) -> Result<RawConfig> {
    Ok(read_optional(path)?.unwrap_or_default())
}

/// Load a settings file, distinguishing an absent file (`None`) from an
/// empty one.
pub fn read_optional(path: &Path) -> Result<Option<RawConfig>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No settings file found at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(SettingsError::Read { path: path.to_path_buf(), source: e }),
    };

    tracing::debug!("Loading settings from {}", path.display());
    parse_toml(&content, path).map(Some)
}

fn parse_toml(content: &str, path: &Path) -> Result<RawConfig> {
    toml::from_str(content)
        .map_err(|e| SettingsError::Parse { path: path.to_path_buf(), source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("nope.toml");
        assert!(read_optional(&path).expect("no error").is_none());
        assert!(load(&path).expect("no error").is_empty());
    }

    #[test]
    fn test_load_toml_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("settings.toml");
        fs::write(&path, "[logger]\nlog_indent = 3\nlog_max_width = 120\n").expect("write");

        let cfg = load(&path).expect("config");
        assert_eq!(cfg["logger"]["log_indent"].as_integer(), Some(3));
        assert_eq!(cfg["logger"]["log_max_width"].as_integer(), Some(120));
    }

    #[test]
    fn test_empty_file_is_present_but_empty() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("settings.toml");
        fs::write(&path, "").expect("write");
        let cfg = read_optional(&path).expect("config");
        assert_eq!(cfg, Some(RawConfig::new()));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("broken.toml");
        fs::write(&path, "[logger\nlog_indent = = 3\n").expect("write");

        let err = load(&path).expect_err("parse error");
        match &err {
            SettingsError::Parse { path: reported, .. } => assert_eq!(reported, &path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_directory_is_read_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = load(tmp.path()).expect_err("directory is not a file");
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_embedded_parse_error_names_source() {
        let source = ConfigSource::embedded(SourceOrigin::Packaged, 0, "defaults.toml", "x = ");
        let err = source.read().expect_err("parse error");
        assert!(err.to_string().contains("defaults.toml"));
    }
}
