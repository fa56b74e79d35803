//! Circle Sim - real-time 2D rigid-circle simulation
//!
//! Core modules:
//! - `sim`: Simulation engine (integration, bounds, spatial grid, collisions, spawners)
//! - `settings`: Serializable engine configuration
//! - `render`: Draw-ready instance extraction for an external renderer

pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{ColorMode, Settings};
pub use sim::{
    Body, Bounds, ControlHandle, Engine, EngineError, EngineSnapshot, Rgb, SpatialGrid, Spawner,
    SpawnerConfig, Vector2,
};

/// Engine defaults and clamp limits
pub mod consts {
    /// Default domain edges (pixels, downward-positive Y)
    pub const DEFAULT_BOUNDS: (i32, i32, i32, i32) = (0, 700, 0, 700);
    /// Default gravity (pixels/s², pointing down the screen)
    pub const DEFAULT_GRAVITY: (f32, f32) = (0.0, 3000.0);

    /// Nominal frames per second
    pub const DEFAULT_FRAMERATE: u32 = 60;
    pub const MIN_FRAMERATE: u32 = 30;
    pub const MAX_FRAMERATE: u32 = 240;

    /// Substeps per frame
    pub const DEFAULT_SUBSTEPS: u32 = 1;
    pub const MIN_SUBSTEPS: u32 = 1;
    pub const MAX_SUBSTEPS: u32 = 16;

    /// Body cap enforced at spawn time
    pub const DEFAULT_MAX_BODIES: usize = 100;

    /// Spawner emission interval (seconds)
    pub const DEFAULT_SPAWN_INTERVAL: f32 = 1.0;
    pub const MIN_SPAWN_INTERVAL: f32 = 0.001;

    /// Body radius range (pixels)
    pub const DEFAULT_MIN_RADIUS: u32 = 10;
    pub const DEFAULT_MAX_RADIUS: u32 = 20;
    pub const RADIUS_FLOOR: u32 = 1;
    pub const RADIUS_CEILING: u32 = 300;

    /// Fraction of velocity kept after a bounce or collision
    pub const DEFAULT_RESTITUTION: f32 = 0.95;

    /// Collision worker threads
    pub const DEFAULT_THREAD_COUNT: usize = 4;
    pub const MAX_THREAD_COUNT: usize = 64;

    /// Below this center distance two bodies are treated as coincident
    pub const COINCIDENT_EPSILON: f32 = 1e-4;
}
