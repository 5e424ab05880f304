//! Game settings and preferences
//!
//! Persisted as JSON in the user's home directory, separately from
//! high scores.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute everything
    pub muted: bool,

    // === Visuals ===
    /// Particle effects (explosions, exhaust, debris)
    pub particles: bool,
    /// Parallax starfield background
    pub starfield: bool,

    // === HUD ===
    /// Show frames-per-second counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            particles: true,
            starfield: true,

            show_fps: false,
        }
    }
}

impl Settings {
    /// File name under `$HOME`
    const FILE_NAME: &'static str = ".typenaut_settings.json";

    fn storage_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(Self::FILE_NAME))
    }

    /// Effective sound effect gain, with mute and both sliders applied.
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings from disk; any failure yields defaults.
    pub fn load() -> Self {
        let Some(path) = Self::storage_path() else {
            log::warn!("HOME not set; using default settings");
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings file ({err}); using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to disk. Failures are logged, not fatal.
    pub fn save(&self) {
        let Some(path) = Self::storage_path() else {
            log::warn!("HOME not set; settings not saved");
            return;
        };
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = fs::write(&path, json) {
                    log::warn!("Failed to save settings to {}: {err}", path.display());
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(err) => log::warn!("Failed to serialize settings: {err}"),
        }
    }
}
