//! Game settings and tuning
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::body::Kinematics;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 200,
            QualityPreset::Medium => 1000,
            QualityPreset::High => 4000,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Simulation ===
    /// Run seed; `None` picks one from the clock
    pub seed: Option<u64>,
    /// Radial deceleration per tick
    pub gravity: f32,
    /// Velocity damping per tick
    pub damping: f32,
    /// Ticks of dwell needed to buy from a shop
    pub shopping_ticks: u32,
    /// Delay before a destroyed taxi is replaced
    pub respawn_delay_ticks: u64,

    // === Economy ===
    pub crash_fine: u64,
    pub starting_debt: u64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Assets ===
    /// Directory holding cached light tables
    pub light_cache_dir: PathBuf,

    /// Frames to run when no window is attached
    pub headless_frames: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            seed: None,
            gravity: GRAVITY,
            damping: DAMPING,
            shopping_ticks: SHOPPING_TICKS,
            respawn_delay_ticks: DEFAULT_DELAY_TICKS,

            crash_fine: CRASH_FINE,
            starting_debt: STARTING_DEBT,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            light_cache_dir: PathBuf::from("."),

            headless_frames: 10 * TICK_HZ as u64,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Integration parameters shared by every moving body
    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            gravity: self.gravity,
            damping: self.damping,
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        self.quality.max_particles()
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let settings = serde_json::from_str(&json).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|e| Error::io(path, e))?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "gravity": 0.05 }"#).unwrap();
        assert_eq!(settings.gravity, 0.05);
        assert_eq!(settings.damping, DAMPING);
        assert_eq!(settings.shopping_ticks, SHOPPING_TICKS);
        assert_eq!(settings.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::from_preset(QualityPreset::High);
        settings.seed = Some(42);
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.quality, QualityPreset::High);
        assert_eq!(loaded.seed, Some(42));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(&dir.path().join("absent.json"));
        assert_eq!(settings.crash_fine, CRASH_FINE);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(Error::Json { .. })));
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert!(QualityPreset::Low.max_particles() < QualityPreset::High.max_particles());
    }
}
