//! Typed settings schema for the known sections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use toml::Table;

/// Logging verbosity, written as `DEBUG`, `INFO`, `WARNING`... in settings files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warning),
            "ERROR" | "CRITICAL" => Ok(LogLevel::Error),
            other => Err(format!("Invalid log level '{other}'")),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// The `[logger]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Application name used for the platform log directory
    pub log_app_name: String,

    /// Author/vendor used for the platform log directory
    pub log_author: String,

    /// Indent applied to wrapped and continuation lines
    pub log_indent: usize,

    pub log_level: LogLevel,

    /// Width at which log lines are wrapped
    pub log_max_width: usize,

    /// Explicit log directory; the platform default is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_directory: Option<PathBuf>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            log_app_name: "net.dmlane".to_string(),
            log_author: "dave".to_string(),
            log_indent: 4,
            log_level: LogLevel::Info,
            log_max_width: 88,
            log_directory: None,
        }
    }
}

/// The `[system]` section: runtime facts rather than user preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettings {
    /// Whether output goes to an interactive terminal
    pub isatty: bool,
}

impl SystemSettings {
    /// Detect runtime facts for the current process.
    pub fn detect() -> Self {
        Self {
            isatty: console::Term::stdout().is_term()
                || std::env::var_os("PYCHARM_HOSTED").is_some(),
        }
    }

    /// Table form, for merging as a settings layer.
    pub fn to_table(&self) -> Table {
        let mut system = Table::new();
        system.insert("isatty".to_string(), toml::Value::Boolean(self.isatty));

        let mut root = Table::new();
        root.insert("system".to_string(), toml::Value::Table(system));
        root
    }
}

/// Typed projection of the merged settings tree.
///
/// Sections other than `logger` and `system` are kept untyped in `extra`;
/// use [`SettingsView`](super::SettingsView) to read them with key validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logger: LoggerSettings,
    pub system: SystemSettings,
    #[serde(flatten)]
    pub extra: Table,
}
