//! Platform-specific paths for the pipeline configuration.
//!
//! - **User config**: `~/.config/dosimeter/` (Linux),
//!   `~/Library/Application Support/dosimeter/` (macOS),
//!   `%APPDATA%\dosimeter\` (Windows)
//!
//! # Example
//!
//! ```rust,no_run
//! use dosimeter_config::paths;
//!
//! // Explicit file first, then the user config directory
//! if let Some(path) = paths::find_config("campaign") {
//!     println!("Found config at: {:?}", path);
//! }
//! ```

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "dosimeter";

/// File name of the default configuration.
pub const CONFIG_FILE_NAME: &str = "dosimeter.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the default configuration file in the user config directory.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}

/// Find a configuration file.
///
/// Searches in the following order:
/// 1. `name` as a path, when it names an existing file
/// 2. The user config directory (`.toml` appended when missing)
pub fn find_config(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}.toml", name)
    };

    let user_path = user_config_dir().join(filename);
    user_path.is_file().then_some(user_path)
}
