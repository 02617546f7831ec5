use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::errors::ConfigError;
use super::types::AppSettings;
use crate::app_dirs;

/// File name of the settings file inside the app directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Path of an existing settings file, if one has been written.
///
/// Unlike [`config_path`] this never creates the app directory.
pub fn find_config_file() -> Result<Option<PathBuf>, ConfigError> {
    let path = app_dirs::app_root_path()?.join(CONFIG_FILE_NAME);
    Ok(path.is_file().then_some(path))
}

/// Load settings from the app directory.
///
/// A missing file is replaced by the defaults, which are also written out so
/// users have a file to edit.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    let path = config_path()?;
    if path.exists() {
        return load_settings_from(&path);
    }
    let settings = AppSettings::default();
    save_settings_to_path(&settings, &path)?;
    info!("Wrote default settings to {}", path.display());
    Ok(settings)
}

/// Parse a settings file.
pub fn load_settings_from(path: &Path) -> Result<AppSettings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppSettings>(&text)
        .map(AppSettings::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

/// Write the TOML settings file atomically to prevent partial writes on crash.
pub fn save_settings_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    let write_err = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(write_err)?;
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(data.as_bytes()).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}
