//! Engine settings
//!
//! Loaded from a JSON file. Every field has a default, so a settings file
//! only needs the values it changes. Out-of-range values are clamped when
//! the engine is built, not rejected here.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::sim::body::ColorMode;
use crate::consts::*;
use crate::sim::{Bounds, SpawnerConfig, Vector2};

/// Failure to read or write a settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Domain edges (pixels)
    pub bounds: Bounds,
    /// Pixels/s²
    pub gravity: Vector2,
    /// Nominal frames per second (30 - 240)
    pub framerate: u32,
    /// Substeps per frame (1 - 16)
    pub substeps: u32,
    /// Spawners stop emitting at this many bodies
    pub max_bodies: usize,
    /// Default seconds between spawner emissions
    pub spawn_interval: f32,
    pub min_radius: u32,
    pub max_radius: u32,
    /// Restitution given to spawned bodies
    pub restitution: f32,
    /// Collision worker threads
    pub thread_count: usize,
    pub auto_spawn: bool,
    pub color_mode: ColorMode,
    /// RNG seed for body radius and colour
    pub seed: u64,
    /// Spawners created at startup
    pub spawners: Vec<SpawnerConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            gravity: Vector2::new(DEFAULT_GRAVITY.0, DEFAULT_GRAVITY.1),
            framerate: DEFAULT_FRAMERATE,
            substeps: DEFAULT_SUBSTEPS,
            max_bodies: DEFAULT_MAX_BODIES,
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            restitution: DEFAULT_RESTITUTION,
            thread_count: DEFAULT_THREAD_COUNT,
            auto_spawn: true,
            color_mode: ColorMode::Random,
            seed: 0,
            spawners: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from `path`, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }
}
