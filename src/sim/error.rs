//! Engine error types
//!
//! Out-of-range parameters are clamped and never reach this type; only
//! spawner management can fail.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A spawner with this id already exists
    #[error("spawner '{0}' already exists")]
    DuplicateSpawner(String),

    /// No spawner with this id
    #[error("spawner '{0}' not found")]
    SpawnerNotFound(String),

    /// Id is empty or contains characters outside `[A-Za-z0-9_]`
    #[error("invalid spawner id '{0}'")]
    InvalidSpawnerId(String),
}
