//! Host settings
//!
//! Gameplay tuning is compiled into `consts`; this only covers how the host
//! drives the core. Persisted separately from the campaign save.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICK_MS;

/// Host settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Wall-clock length of one tick
    pub tick_period_ms: u64,
    /// Sleep between ticks; off for headless simulation
    pub realtime: bool,
    /// Indicator light brightness (0.0 - 1.0)
    pub led_brightness: f32,
    /// Fixed RNG seed; a fresh one per mode when unset
    pub seed: Option<u64>,
    /// Directory holding the save record and leaderboard
    pub save_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_period_ms: TICK_MS,
            realtime: true,
            led_brightness: 0.3,
            seed: None,
            save_dir: PathBuf::from("saves"),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(err) => log::warn!("Ignoring malformed settings {}: {err}", path.display()),
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => log::warn!("Cannot read settings {}: {err}", path.display()),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to `path` as JSON
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Brightness kept inside the valid range
    pub fn effective_brightness(&self) -> f32 {
        self.led_brightness.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tick_period_ms, 15);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"realtime": false, "seed": 7}"#).unwrap();
        let settings = Settings::load(&path);
        assert!(!settings.realtime);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.led_brightness, 0.3);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            led_brightness: 0.8,
            save_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }
}
