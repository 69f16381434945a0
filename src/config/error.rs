//! Settings error taxonomy

use std::path::PathBuf;

/// Errors raised while resolving, reading or writing settings.
///
/// A missing settings file is not represented here: absent sources are
/// reported as `None` by the loader and simply contribute nothing.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Error reading settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed reading settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot apply {argument}: '{key}' is a {found}, not a table")]
    InvalidOverrideType { argument: String, key: String, found: &'static str },

    #[error("Failed creating directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Arguments(#[from] clap::Error),

    #[error("Settings do not match the expected schema: {0}")]
    Schema(#[source] toml::de::Error),

    #[error("Unknown settings key '{path}'")]
    UnknownKey { path: String },

    #[error("Settings key '{path}' has the wrong type: {source}")]
    WrongType {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine the platform {0} directory")]
    PlatformDirectory(&'static str),

    #[error("Failed writing settings file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed serializing settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Human-readable name of a TOML value's type, for error messages.
pub(crate) fn type_name(value: &toml::Value) -> &'static str {
    match value {
        toml::Value::String(_) => "string",
        toml::Value::Integer(_) => "integer",
        toml::Value::Float(_) => "float",
        toml::Value::Boolean(_) => "boolean",
        toml::Value::Datetime(_) => "datetime",
        toml::Value::Array(_) => "array",
        toml::Value::Table(_) => "table",
    }
}
