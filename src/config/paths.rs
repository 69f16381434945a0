//! Platform directory conventions for settings and logs

use super::error::{Result, SettingsError};
use std::fs;
use std::path::{Path, PathBuf};

/// Vendor directory under the platform config directory.
pub const CONFIG_VENDOR: &str = "dmlane";

/// File name of the user settings file.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// `<config dir>/dmlane`, e.g. `~/.config/dmlane` on Linux.
pub fn user_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_VENDOR))
        .ok_or(SettingsError::PlatformDirectory("config"))
}

/// Default location of the user settings file.
pub fn default_config_file() -> Result<PathBuf> {
    Ok(user_config_dir()?.join(SETTINGS_FILE_NAME))
}

/// Per-application log directory.
///
/// - macOS: `~/Library/Logs/<app>`
/// - Windows: `<local app data>/<author>/<app>/Logs`
/// - others: `<cache dir>/<app>/log`
pub fn user_log_dir(app_name: &str, author: &str) -> Result<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let _ = author;
        dirs::home_dir()
            .map(|home| home.join("Library").join("Logs").join(app_name))
            .ok_or(SettingsError::PlatformDirectory("log"))
    }
    #[cfg(target_os = "windows")]
    {
        dirs::data_local_dir()
            .map(|dir| dir.join(author).join(app_name).join("Logs"))
            .ok_or(SettingsError::PlatformDirectory("log"))
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let _ = author;
        dirs::cache_dir()
            .map(|dir| dir.join(app_name).join("log"))
            .ok_or(SettingsError::PlatformDirectory("log"))
    }
}

/// Create `path` and its parents if they do not exist.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| SettingsError::DirectoryCreate { path: path.to_path_buf(), source: e })
}
