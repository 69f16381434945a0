//! Writing default keys back into a user settings file

use super::error::{Result, SettingsError};
use super::loader::load;
use super::merge::{fill_missing, RawConfig};
use super::paths::ensure_dir;
use super::resolver::PACKAGED_DEFAULTS;
use std::fs;
use std::path::Path;

/// Parsed packaged defaults.
pub fn packaged_defaults() -> Result<RawConfig> {
    toml::from_str(PACKAGED_DEFAULTS).map_err(|e| SettingsError::Parse {
        path: Path::new("data/settings.toml").to_path_buf(),
        source: e,
    })
}

/// Add keys from `defaults` that are missing from the settings file at
/// `path`. Existing keys are never changed or removed, and the file is only
/// rewritten when something was added.
///
/// Returns `true` if the file was written.
pub fn write_missing_defaults(path: &Path, defaults: &RawConfig) -> Result<bool> {
    let mut current = load(path)?;
    if !fill_missing(&mut current, defaults) {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let text = toml::to_string_pretty(&current)?;
    fs::write(path, text)
        .map_err(|e| SettingsError::Write { path: path.to_path_buf(), source: e })?;

    tracing::debug!("Wrote missing defaults to {}", path.display());
    Ok(true)
}
