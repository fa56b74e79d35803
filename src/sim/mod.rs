//! Simulation module
//!
//! Everything that moves bodies lives here. Each substep runs, in order:
//! gravity, bounds reflection, grid partition + collision resolution,
//! restitution, integration. Spawners tick once per frame afterwards.
//! No rendering or windowing dependencies.

pub mod body;
pub mod bounds;
pub mod collision;
pub mod control;
pub mod engine;
pub mod error;
pub mod grid;
pub mod spawner;
pub mod vector;

pub use body::{Body, RadiusRange, Rgb};
pub use bounds::{Bounds, apply_bounds};
pub use collision::{Band, CollisionResolver, plan_bands, resolve_pair};
pub use control::{Command, ControlHandle, EngineSnapshot};
pub use engine::{Engine, RunState};
pub use error::EngineError;
pub use grid::SpatialGrid;
pub use spawner::{Spawner, SpawnerConfig};
pub use vector::{Mirror, Vector2};
