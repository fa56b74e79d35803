//! Thread-safe control surface
//!
//! The thread that calls [`Engine::advance`](super::Engine::advance) owns the
//! engine. Any other thread (a control panel, a script) talks to it through a
//! [`ControlHandle`]:
//! - mutations are queued as [`Command`]s and applied at the start of the
//!   next `advance`, before any substep runs;
//! - queries read an [`EngineSnapshot`] published at the end of every
//!   `advance`, so they reflect the last completed frame.
//!
//! Handle calls never block on a running frame.

use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::body::ColorMode;
use super::bounds::Bounds;
use super::spawner::SpawnerConfig;
use super::vector::Vector2;

/// A queued engine mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetGravity(Vector2),
    SetBounds(Bounds),
    SetFramerate(u32),
    SetSubsteps(u32),
    SetMaxBodies(usize),
    SetSpawnInterval(f32),
    SetRadiusRange { min: u32, max: u32 },
    SetColorMode(ColorMode),
    SetAutoSpawn(bool),
    TogglePause,
    Restart,
    AddSpawner(SpawnerConfig),
    UpdateSpawner { id: String, config: SpawnerConfig },
    RemoveSpawner(String),
}

/// Read-only view of engine parameters as of the last frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub bounds: Bounds,
    pub gravity: Vector2,
    pub framerate: u32,
    pub substeps: u32,
    pub max_bodies: usize,
    pub spawn_interval: f32,
    pub body_count: usize,
    pub paused: bool,
    pub auto_spawn: bool,
    /// Simulated seconds
    pub time: f64,
    pub spawners: Vec<SpawnerConfig>,
}

/// Cloneable, `Send + Sync` handle to a running engine
#[derive(Debug, Clone)]
pub struct ControlHandle {
    commands: Sender<Command>,
    snapshot: Arc<RwLock<EngineSnapshot>>,
}

impl ControlHandle {
    pub(crate) fn new(commands: Sender<Command>, snapshot: Arc<RwLock<EngineSnapshot>>) -> Self {
        Self { commands, snapshot }
    }

    /// Queue a command; false if the engine has been dropped
    pub fn send(&self, command: Command) -> bool {
        match self.commands.send(command) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Engine gone, dropping command {:?}", e.into_inner());
                false
            }
        }
    }

    pub fn set_gravity(&self, gravity: Vector2) -> bool {
        self.send(Command::SetGravity(gravity))
    }

    pub fn set_gravity_components(&self, x: f32, y: f32) -> bool {
        self.set_gravity(Vector2::new(x, y))
    }

    pub fn set_bounds(&self, bounds: Bounds) -> bool {
        self.send(Command::SetBounds(bounds))
    }

    pub fn set_framerate(&self, framerate: u32) -> bool {
        self.send(Command::SetFramerate(framerate))
    }

    pub fn set_substeps(&self, substeps: u32) -> bool {
        self.send(Command::SetSubsteps(substeps))
    }

    pub fn set_max_bodies(&self, max_bodies: usize) -> bool {
        self.send(Command::SetMaxBodies(max_bodies))
    }

    pub fn set_spawn_interval(&self, interval: f32) -> bool {
        self.send(Command::SetSpawnInterval(interval))
    }

    pub fn set_radius_range(&self, min: u32, max: u32) -> bool {
        self.send(Command::SetRadiusRange { min, max })
    }

    pub fn set_color_mode(&self, mode: ColorMode) -> bool {
        self.send(Command::SetColorMode(mode))
    }

    pub fn set_auto_spawn(&self, enabled: bool) -> bool {
        self.send(Command::SetAutoSpawn(enabled))
    }

    pub fn toggle_pause(&self) -> bool {
        self.send(Command::TogglePause)
    }

    pub fn restart(&self) -> bool {
        self.send(Command::Restart)
    }

    /// Queue a new spawner; duplicate or invalid ids are rejected (and
    /// logged) when the command is applied
    pub fn add_spawner(&self, config: SpawnerConfig) -> bool {
        self.send(Command::AddSpawner(config))
    }

    pub fn update_spawner(&self, id: impl Into<String>, config: SpawnerConfig) -> bool {
        self.send(Command::UpdateSpawner {
            id: id.into(),
            config,
        })
    }

    pub fn remove_spawner(&self, id: impl Into<String>) -> bool {
        self.send(Command::RemoveSpawner(id.into()))
    }

    /// Copy of the last published snapshot
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot.read().clone()
    }

    pub fn body_count(&self) -> usize {
        self.snapshot.read().body_count
    }

    pub fn is_paused(&self) -> bool {
        self.snapshot.read().paused
    }

    pub fn spawner(&self, id: &str) -> Option<SpawnerConfig> {
        self.snapshot
            .read()
            .spawners
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn spawner_ids(&self) -> Vec<String> {
        self.snapshot
            .read()
            .spawners
            .iter()
            .map(|s| s.id.clone())
            .collect()
    }
}
