//! Runtime settings
//!
//! Stored as pretty JSON next to the binary. Anything missing or unreadable
//! falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Viewport ===
    pub width: i32,
    pub height: i32,

    // === Pacing ===
    /// Delay between frames when running in real time
    pub frame_ms: u64,
    /// How long between-attempt and final messages stay up
    pub message_ms: u64,
    /// Sleep between frames and on messages; off for headless runs
    pub realtime: bool,

    // === Run ===
    /// Level file played on every attempt
    pub level: String,
    /// Seed for the simulation RNG
    pub seed: u64,
    /// Give up an attempt after this many frames (None = play to the end)
    pub max_ticks: Option<u64>,
    /// Frames between autopilot jumps
    pub autopilot_period: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 256,
            height: 240,

            frame_ms: 20,
            message_ms: 3000,
            realtime: false,

            level: "levels/1w".to_string(),
            seed: 0x5eed,
            max_ticks: Some(20_000),
            autopilot_period: 45,
        }
    }
}

impl Settings {
    /// Load from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("No settings at {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
