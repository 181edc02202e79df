//! Settings persistence
//!
//! Saves and loads [`GameSettings`] to/from a JSON file.
//!
//! # File Location
//!
//! Settings are stored in `settings.json` in the platform configuration
//! directory, falling back to the working directory when none is available.
//!
//! # Error Handling
//!
//! [`load_settings`] never fails: a missing or unreadable file falls back to
//! defaults with a log line. [`read_settings`] and [`save_settings`] report
//! errors to the caller.

use crate::core::error::CoreResult;
use crate::core::resources::GameSettings;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Resolve the settings file path
///
/// E.g. `~/.config/llmchess/settings.json` on Linux.
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("org", "llmchess", "llmchess") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        // Fallback to current directory
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Read settings, propagating any error
pub fn read_settings(path: &Path) -> CoreResult<GameSettings> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load settings, falling back to defaults on any failure
pub fn load_settings(path: &Path) -> GameSettings {
    if !path.exists() {
        info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
        return GameSettings::default();
    }

    match read_settings(path) {
        Ok(settings) => {
            info!("[SETTINGS] Loaded settings from {:?}", path);
            settings
        }
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                path, e
            );
            GameSettings::default()
        }
    }
}

/// Write settings as pretty JSON, creating the parent directory if needed
pub fn save_settings(path: &Path, settings: &GameSettings) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", path);
    Ok(())
}
