//! Game settings and preferences
//!
//! Persisted as JSON. Nothing here changes the rules of the game.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to write settings to {path}: {source}")]
    Write { path: String, source: io::Error },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to encode settings for {path}: {source}")]
    Serialize {
        path: String,
        source: serde_json::Error,
    },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Silence all sound effects
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Ring the terminal bell for sound effects
    pub terminal_bell: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            terminal_bell: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; a missing file gives the defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let settings = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Serialize {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("paddle-pong-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(&temp_path("does-not-exist.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial.json");
        fs::write(&path, r#"{ "muted": true }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(settings.muted);
        assert_eq!(settings.master_volume, Settings::default().master_volume);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let path = temp_path("invalid.json");
        fs::write(&path, "{ not json").unwrap();

        let result = Settings::load(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn test_save_errors_are_write_side() {
        // A directory cannot be written as a file
        let path = std::env::temp_dir();
        let err = Settings::default().save(&path).unwrap_err();

        assert!(matches!(err, SettingsError::Write { .. }));
        assert!(err.to_string().starts_with("failed to write settings"));
    }

    #[test]
    fn test_encode_error_message() {
        let source = serde_json::from_str::<Settings>("[").unwrap_err();
        let err = SettingsError::Serialize {
            path: "prefs.json".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("failed to encode settings for prefs.json"));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved.json");
        let settings = Settings {
            show_fps: true,
            sfx_volume: 0.25,
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, settings);
    }
}
