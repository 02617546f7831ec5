//! Application settings stored as TOML in the app directory.

mod errors;
mod io;
mod types;

pub use errors::ConfigError;
pub use io::{
    CONFIG_FILE_NAME, config_path, find_config_file, load_or_default, load_settings_from,
    save_settings_to_path,
};
pub use types::{AppSettings, DEFAULT_MODEL_PATH, UiSettings};
