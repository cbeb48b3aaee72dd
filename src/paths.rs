//! Platform paths for application data.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Directory name under the platform data dir, and the dotdir fallback stem.
pub const APP_DIR: &str = "linktray";

/// Fixed name of the database file inside the app data directory.
pub const DB_FILE: &str = "linktray.sqlite";

/// The per-user directory all application files live in. Falls back to a
/// dotdir in the home directory when the platform data dir is unknown.
pub fn app_data_dir() -> Result<PathBuf> {
    if let Some(base) = dirs::data_dir() {
        return Ok(base.join(APP_DIR));
    }
    dirs::home_dir()
        .map(|home| home.join(format!(".{APP_DIR}")))
        .ok_or(Error::DataDir)
}

/// Full path of a named file inside the app data directory. Pure; nothing is
/// created on disk.
pub fn app_data_path(file_name: &str) -> Result<PathBuf> {
    Ok(app_data_dir()?.join(file_name))
}
