//! Game settings and preferences
//!
//! Persisted as a small JSON file next to the binary. Missing or unreadable
//! files fall back to defaults so a fresh checkout runs without setup.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Player-tunable preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Draw the red center markers on paddles and ball
    pub debug_markers: bool,
    /// Drain the physical-button bridge each tick
    pub gpio_buttons: bool,
    /// Display-mode preset selected at startup (index into the mode list)
    pub mode_index: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_markers: true,
            gpio_buttons: false,
            mode_index: 0,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is absent or
    /// malformed
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.as_ref().display());
                    settings
                }
                Err(err) => {
                    log::warn!("ignoring malformed settings file: {err}");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("using default settings");
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}
