//! Simulation engine
//!
//! Owns bodies, spawners, the spatial grid and every global parameter, and
//! runs the frame pipeline. Each `advance(dt)` call:
//! 1. applies queued control commands,
//! 2. runs `substeps` slices of gravity -> bounds -> collisions ->
//!    restitution -> integration,
//! 3. ticks spawners once with the full frame `dt`,
//! 4. publishes a snapshot for control handles.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::{Body, ColorMode, RadiusRange};
use super::bounds::{Bounds, apply_bounds};
use super::collision::CollisionResolver;
use super::control::{Command, ControlHandle, EngineSnapshot};
use super::error::EngineError;
use super::grid::SpatialGrid;
use super::spawner::{Spawner, SpawnerConfig, is_valid_id};
use super::vector::Vector2;
use crate::consts::*;
use crate::settings::Settings;

/// Whether `advance` does any work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// Cell size for a largest radius: two overlapping circles are at most
/// one cell apart, so the pair lands in adjacent cells
fn cell_size_for(largest_radius: u32) -> u32 {
    largest_radius.saturating_mul(2)
}

pub struct Engine {
    gravity: Vector2,
    bounds: Bounds,
    framerate: u32,
    substeps: u32,
    max_bodies: usize,
    spawn_interval: f32,
    radii: RadiusRange,
    /// Largest radius among live bodies (0 when empty)
    largest_body_radius: u32,
    restitution: f32,
    color_mode: ColorMode,
    state: RunState,
    auto_spawn: bool,
    /// Simulated seconds
    time: f64,
    bodies: Vec<Body>,
    spawners: Vec<Spawner>,
    grid: SpatialGrid,
    resolver: CollisionResolver,
    rng: Pcg32,
    commands_tx: Sender<Command>,
    commands_rx: Receiver<Command>,
    snapshot: Arc<RwLock<EngineSnapshot>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with default settings
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    /// Build an engine, clamping every value through the public setters
    pub fn from_settings(settings: &Settings) -> Self {
        let radii = RadiusRange::new(settings.min_radius, settings.max_radius);
        let bounds = Bounds::new(
            settings.bounds.left,
            settings.bounds.right,
            settings.bounds.top,
            settings.bounds.bottom,
        );
        let (commands_tx, commands_rx) = crossbeam_channel::unbounded();

        let mut engine = Self {
            gravity: settings.gravity,
            bounds,
            framerate: DEFAULT_FRAMERATE,
            substeps: DEFAULT_SUBSTEPS,
            max_bodies: DEFAULT_MAX_BODIES,
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            radii,
            largest_body_radius: 0,
            restitution: DEFAULT_RESTITUTION,
            color_mode: settings.color_mode,
            state: RunState::Running,
            auto_spawn: settings.auto_spawn,
            time: 0.0,
            bodies: Vec::with_capacity(settings.max_bodies),
            spawners: Vec::new(),
            grid: SpatialGrid::new(cell_size_for(radii.max()), &bounds),
            resolver: CollisionResolver::new(settings.thread_count.clamp(1, MAX_THREAD_COUNT)),
            rng: Pcg32::seed_from_u64(settings.seed),
            commands_tx,
            commands_rx,
            snapshot: Arc::new(RwLock::new(EngineSnapshot::default())),
        };
        engine.set_framerate(settings.framerate);
        engine.set_substeps(settings.substeps);
        engine.set_max_bodies(settings.max_bodies);
        engine.set_spawn_interval(settings.spawn_interval);
        engine.set_restitution(settings.restitution);

        for config in &settings.spawners {
            if let Err(e) = engine.add_spawner(config.clone()) {
                log::warn!("Skipping configured spawner: {}", e);
            }
        }

        engine.publish_snapshot();
        engine
    }

    // === Queries ===

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn gravity(&self) -> Vector2 {
        self.gravity
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    /// Nominal frame length in seconds
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.framerate as f32
    }

    pub fn substeps(&self) -> u32 {
        self.substeps
    }

    pub fn max_bodies(&self) -> usize {
        self.max_bodies
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    pub fn radius_range(&self) -> RadiusRange {
        self.radii
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn thread_count(&self) -> usize {
        self.resolver.thread_count()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    pub fn auto_spawn(&self) -> bool {
        self.auto_spawn
    }

    /// Total simulated seconds while running
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Read-only view for drawing
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn spawners(&self) -> &[Spawner] {
        &self.spawners
    }

    pub fn spawner(&self, id: &str) -> Option<&Spawner> {
        self.spawners.iter().find(|s| s.id == id)
    }

    pub fn spawner_ids(&self) -> impl Iterator<Item = &str> {
        self.spawners.iter().map(|s| s.id.as_str())
    }

    pub fn total_kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    // === Parameter setters (silently clamped) ===

    pub fn set_gravity(&mut self, gravity: Vector2) {
        if gravity.is_finite() {
            self.gravity = gravity;
        }
    }

    pub fn set_gravity_components(&mut self, x: f32, y: f32) {
        self.set_gravity(Vector2::new(x, y));
    }

    /// Replace the domain and resize the grid to cover it
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = Bounds::new(bounds.left, bounds.right, bounds.top, bounds.bottom);
        self.grid.resize(&self.bounds);
        log::debug!("Bounds set to {:?}, grid {}", self.bounds, self.grid.info());
    }

    pub fn set_framerate(&mut self, framerate: u32) {
        self.framerate = framerate.clamp(MIN_FRAMERATE, MAX_FRAMERATE);
    }

    pub fn set_substeps(&mut self, substeps: u32) {
        self.substeps = substeps.clamp(MIN_SUBSTEPS, MAX_SUBSTEPS);
    }

    /// Cap checked at spawn time only; existing bodies are kept
    pub fn set_max_bodies(&mut self, max_bodies: usize) {
        self.max_bodies = max_bodies;
        self.bodies.reserve(max_bodies.saturating_sub(self.bodies.len()));
    }

    pub fn set_spawn_interval(&mut self, interval: f32) {
        if interval.is_finite() {
            self.spawn_interval = interval.max(MIN_SPAWN_INTERVAL);
        }
    }

    /// Radius range for generated bodies
    ///
    /// Grid cells follow the larger of the range maximum and the largest
    /// live body, so shrinking the range keeps existing big bodies covered.
    pub fn set_radius_range(&mut self, min: u32, max: u32) {
        self.radii = RadiusRange::new(min, max);
        self.refresh_cell_size();
    }

    /// Rebuild the grid if the covering cell size changed
    fn refresh_cell_size(&mut self) {
        let cell_size = cell_size_for(self.radii.max().max(self.largest_body_radius));
        if cell_size != self.grid.cell_size() {
            self.grid.set_cell_size(cell_size, &self.bounds);
            log::debug!("Grid rebuilt: {}", self.grid.info());
        }
    }

    fn push_body(&mut self, body: Body) {
        let grows = body.radius > self.largest_body_radius;
        self.largest_body_radius = self.largest_body_radius.max(body.radius);
        self.bodies.push(body);
        if grows {
            self.refresh_cell_size();
        }
    }

    pub fn set_restitution(&mut self, restitution: f32) {
        if restitution.is_finite() {
            self.restitution = restitution.clamp(0.0, 1.0);
        }
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    /// Rebuild the collision worker pool
    pub fn set_thread_count(&mut self, thread_count: usize) {
        let thread_count = thread_count.clamp(1, MAX_THREAD_COUNT);
        if thread_count != self.resolver.thread_count() {
            self.resolver = CollisionResolver::new(thread_count);
        }
    }

    pub fn set_auto_spawn(&mut self, enabled: bool) {
        self.auto_spawn = enabled;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.state = if paused {
            RunState::Paused
        } else {
            RunState::Running
        };
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.is_paused());
    }

    /// Remove every body; spawners and parameters persist
    pub fn restart(&mut self) {
        log::info!("Restart: clearing {} bodies", self.bodies.len());
        self.bodies.clear();
        self.largest_body_radius = 0;
        self.refresh_cell_size();
        self.grid.reset_cells();
    }

    // === Bodies ===

    /// Insert a body directly (not subject to the body cap)
    pub fn add_body(&mut self, body: Body) {
        self.push_body(body);
    }

    /// Insert a randomly sized and coloured body (not subject to the body cap)
    pub fn spawn_random_at(&mut self, position: Vector2, velocity: Vector2) {
        let body = Body::random(
            &mut self.rng,
            position,
            velocity,
            self.radii,
            self.restitution,
            self.color_mode,
        );
        self.push_body(body);
    }

    // === Spawners ===

    /// Add a spawner; ids must be valid and unique
    pub fn add_spawner(&mut self, config: SpawnerConfig) -> Result<(), EngineError> {
        if !is_valid_id(&config.id) {
            log::warn!("Rejected spawner with invalid id '{}'", config.id);
            return Err(EngineError::InvalidSpawnerId(config.id));
        }
        if self.spawner(&config.id).is_some() {
            log::warn!("Rejected duplicate spawner '{}'", config.id);
            return Err(EngineError::DuplicateSpawner(config.id));
        }
        log::info!("Added spawner '{}'", config.id);
        self.spawners.push(Spawner::from_config(config, self.spawn_interval));
        Ok(())
    }

    /// Replace a spawner's settings; returns false (no-op) if `id` is unknown
    pub fn update_spawner(&mut self, id: &str, config: SpawnerConfig) -> bool {
        let fallback = self.spawn_interval;
        match self.spawners.iter_mut().find(|s| s.id == id) {
            Some(spawner) => {
                spawner.apply(config, fallback);
                true
            }
            None => {
                log::debug!("Update for unknown spawner '{}' ignored", id);
                false
            }
        }
    }

    pub fn remove_spawner(&mut self, id: &str) -> Result<Spawner, EngineError> {
        let pos = self
            .spawners
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| EngineError::SpawnerNotFound(id.to_string()))?;
        log::info!("Removed spawner '{}'", id);
        Ok(self.spawners.remove(pos))
    }

    // === Cross-thread control ===

    /// Handle for other threads; commands apply at the next frame boundary
    pub fn handle(&self) -> ControlHandle {
        ControlHandle::new(self.commands_tx.clone(), Arc::clone(&self.snapshot))
    }

    /// Apply every queued command
    pub fn drain_commands(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.commands_rx.try_recv() {
            self.apply_command(command);
            applied += 1;
        }
        applied
    }

    pub fn apply_command(&mut self, command: Command) {
        log::trace!("Applying {:?}", command);
        match command {
            Command::SetGravity(gravity) => self.set_gravity(gravity),
            Command::SetBounds(bounds) => self.set_bounds(bounds),
            Command::SetFramerate(framerate) => self.set_framerate(framerate),
            Command::SetSubsteps(substeps) => self.set_substeps(substeps),
            Command::SetMaxBodies(max_bodies) => self.set_max_bodies(max_bodies),
            Command::SetSpawnInterval(interval) => self.set_spawn_interval(interval),
            Command::SetRadiusRange { min, max } => self.set_radius_range(min, max),
            Command::SetColorMode(mode) => self.set_color_mode(mode),
            Command::SetAutoSpawn(enabled) => self.set_auto_spawn(enabled),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => self.restart(),
            Command::AddSpawner(config) => {
                if let Err(e) = self.add_spawner(config) {
                    log::debug!("Queued spawner dropped: {}", e);
                }
            }
            Command::UpdateSpawner { id, config } => {
                self.update_spawner(&id, config);
            }
            Command::RemoveSpawner(id) => {
                if let Err(e) = self.remove_spawner(&id) {
                    log::warn!("{}", e);
                }
            }
        }
    }

    /// Publish current parameters to control handles
    pub fn publish_snapshot(&self) {
        let snapshot = EngineSnapshot {
            bounds: self.bounds,
            gravity: self.gravity,
            framerate: self.framerate,
            substeps: self.substeps,
            max_bodies: self.max_bodies,
            spawn_interval: self.spawn_interval,
            body_count: self.bodies.len(),
            paused: self.is_paused(),
            auto_spawn: self.auto_spawn,
            time: self.time,
            spawners: self.spawners.iter().map(Spawner::to_config).collect(),
        };
        *self.snapshot.write() = snapshot;
    }

    // === Frame pipeline ===

    /// Advance one display frame of `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.drain_commands();

        if self.state == RunState::Running && dt.is_finite() && dt > 0.0 {
            let sub_dt = dt / self.substeps as f32;
            for _ in 0..self.substeps {
                self.apply_gravity();
                apply_bounds(&mut self.bodies, &self.bounds);
                self.apply_collisions();
                self.apply_restitution();
                self.integrate(sub_dt);
            }

            if self.auto_spawn {
                self.tick_spawners(dt);
            }
            self.time += dt as f64;
        }

        self.publish_snapshot();
    }

    /// Advance by the nominal frame length
    pub fn step(&mut self) {
        self.advance(self.frame_dt());
    }

    fn apply_gravity(&mut self) {
        let gravity = self.gravity;
        for body in &mut self.bodies {
            body.acceleration = gravity;
        }
    }

    fn apply_collisions(&mut self) {
        self.grid.partition(&self.bodies);
        self.resolver.resolve(&self.grid, &mut self.bodies);
    }

    /// Scale each collided body once, however many contacts it had
    fn apply_restitution(&mut self) {
        for body in &mut self.bodies {
            if body.collided {
                body.velocity *= body.restitution;
                body.collided = false;
            }
        }
    }

    fn integrate(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.integrate(dt);
        }
    }

    /// Run spawner timers and emit until the body cap is reached
    fn tick_spawners(&mut self, dt: f32) {
        for spawner in &mut self.spawners {
            spawner.advance(dt);
        }

        let before = self.largest_body_radius;
        for spawner in &mut self.spawners {
            if self.bodies.len() >= self.max_bodies {
                break;
            }
            if spawner.is_ready() {
                let body = spawner.emit(
                    &mut self.rng,
                    self.radii,
                    self.restitution,
                    self.color_mode,
                );
                log::trace!("Spawner '{}' emitted radius {}", spawner.id, body.radius);
                self.largest_body_radius = self.largest_body_radius.max(body.radius);
                self.bodies.push(body);
            }
        }
        if self.largest_body_radius > before {
            self.refresh_cell_size();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Rgb;

    fn zero_gravity_engine() -> Engine {
        let mut engine = Engine::new();
        engine.set_gravity(Vector2::ZERO);
        engine.set_auto_spawn(false);
        engine
    }

    fn elastic(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        Body::new(
            Vector2::new(x, y),
            Vector2::new(vx, vy),
            10,
            10.0,
            1.0,
            Rgb::RED,
        )
    }

    fn ready_spawner(id: &str, y: f32) -> SpawnerConfig {
        SpawnerConfig::new(id, Vector2::new(350.0, y), Vector2::ZERO, 0.001)
    }

    #[test]
    fn test_defaults() {
        let engine = Engine::new();
        assert_eq!(engine.framerate(), DEFAULT_FRAMERATE);
        assert_eq!(engine.substeps(), DEFAULT_SUBSTEPS);
        assert_eq!(engine.max_bodies(), DEFAULT_MAX_BODIES);
        assert_eq!(engine.gravity(), Vector2::new(0.0, 3000.0));
        assert_eq!(engine.thread_count(), DEFAULT_THREAD_COUNT);
        assert_eq!(engine.state(), RunState::Running);
        assert_eq!(engine.body_count(), 0);
    }

    #[test]
    fn test_setters_clamp() {
        let mut engine = Engine::new();
        engine.set_framerate(10);
        assert_eq!(engine.framerate(), MIN_FRAMERATE);
        engine.set_framerate(1000);
        assert_eq!(engine.framerate(), MAX_FRAMERATE);
        engine.set_substeps(0);
        assert_eq!(engine.substeps(), 1);
        engine.set_substeps(99);
        assert_eq!(engine.substeps(), 16);
        engine.set_spawn_interval(0.0);
        assert_eq!(engine.spawn_interval(), MIN_SPAWN_INTERVAL);
        engine.set_spawn_interval(f32::NAN);
        assert_eq!(engine.spawn_interval(), MIN_SPAWN_INTERVAL);
        engine.set_max_bodies(0);
        assert_eq!(engine.max_bodies(), 0);
    }

    #[test]
    fn test_radius_range_resizes_grid() {
        let mut engine = Engine::new();
        assert_eq!(engine.grid().cell_size(), 40);
        engine.set_radius_range(5, 50);
        assert_eq!(engine.grid().cell_size(), 100);
        assert_eq!(engine.grid().width_cells(), 7);
    }

    fn big(x: f32, vx: f32, radius: u32) -> Body {
        Body::new(
            Vector2::new(x, 350.0),
            Vector2::new(vx, 0.0),
            radius,
            radius as f32,
            1.0,
            Rgb::RED,
        )
    }

    #[test]
    fn test_injected_body_larger_than_range_still_collides() {
        let mut engine = zero_gravity_engine();
        assert_eq!(engine.grid().cell_size(), 40);
        engine.add_body(big(275.0, 100.0, 100));
        engine.add_body(big(425.0, -100.0, 100));
        assert_eq!(engine.grid().cell_size(), 200);

        engine.advance(1.0 / 60.0);
        let (a, b) = (&engine.bodies()[0], &engine.bodies()[1]);
        assert!(a.velocity.x < 0.0 && b.velocity.x > 0.0);
        assert!((b.position - a.position).length() >= 199.0);
    }

    #[test]
    fn test_shrinking_range_keeps_live_bodies_covered() {
        let mut engine = zero_gravity_engine();
        engine.add_body(big(310.0, 50.0, 50));
        engine.add_body(big(390.0, -50.0, 50));
        engine.set_radius_range(5, 5);
        assert_eq!(engine.grid().cell_size(), 100);

        engine.advance(1.0 / 60.0);
        let (a, b) = (&engine.bodies()[0], &engine.bodies()[1]);
        assert!(a.velocity.x < 0.0 && b.velocity.x > 0.0);
        assert!((b.position - a.position).length() >= 99.0);

        // Cells shrink back once the big bodies are gone
        engine.restart();
        assert_eq!(engine.grid().cell_size(), 10);
    }

    #[test]
    fn test_rejected_queued_spawner_leaves_original() {
        let mut engine = zero_gravity_engine();
        engine.add_spawner(ready_spawner("dup", 100.0)).unwrap();
        let handle = engine.handle();
        handle.add_spawner(ready_spawner("dup", 500.0));
        handle.add_spawner(ready_spawner("", 500.0));

        engine.advance(1.0 / 60.0);
        assert_eq!(engine.spawners().len(), 1);
        assert_eq!(engine.spawner("dup").unwrap().position.y, 100.0);
    }

    #[test]
    fn test_set_bounds_resizes_grid() {
        let mut engine = Engine::new();
        engine.set_bounds(Bounds::from_size(1200, 400));
        assert_eq!(engine.grid().width_cells(), 30);
        assert_eq!(engine.grid().height_cells(), 10);
    }

    #[test]
    fn test_paused_advance_is_noop() {
        let mut engine = Engine::new();
        engine.add_body(elastic(350.0, 350.0, 10.0, 0.0));
        engine.toggle_pause();
        assert!(engine.is_paused());

        engine.advance(1.0 / 60.0);
        assert_eq!(engine.bodies()[0].position, Vector2::new(350.0, 350.0));
        assert_eq!(engine.time(), 0.0);

        engine.toggle_pause();
        engine.advance(1.0 / 60.0);
        assert_ne!(engine.bodies()[0].position, Vector2::new(350.0, 350.0));
    }

    #[test]
    fn test_free_fall_matches_closed_form() {
        let mut engine = Engine::new();
        engine.set_auto_spawn(false);
        engine.set_substeps(4);
        engine.add_body(elastic(350.0, 100.0, 0.0, 0.0));

        let dt = 1.0 / 60.0;
        for _ in 0..6 {
            engine.advance(dt);
        }
        let t = 6.0 * dt;
        let expected = 100.0 + 0.5 * 3000.0 * t * t;
        assert!((engine.bodies()[0].position.y - expected).abs() < 0.01);
    }

    #[test]
    fn test_collided_flag_never_leaks() {
        let mut engine = zero_gravity_engine();
        engine.add_body(elastic(300.0, 350.0, 100.0, 0.0));
        engine.add_body(elastic(318.0, 350.0, -100.0, 0.0));
        engine.advance(1.0 / 60.0);
        assert!(engine.bodies().iter().all(|b| !b.collided));
        // They bounced apart
        assert!(engine.bodies()[0].velocity.x < 0.0);
        assert!(engine.bodies()[1].velocity.x > 0.0);
    }

    #[test]
    fn test_elastic_energy_conserved_without_walls() {
        let mut engine = zero_gravity_engine();
        engine.set_substeps(8);
        engine.add_body(elastic(250.0, 350.0, 200.0, 10.0));
        engine.add_body(elastic(450.0, 355.0, -200.0, 0.0));
        engine.add_body(elastic(350.0, 250.0, 0.0, 150.0));
        let before = engine.total_kinetic_energy();

        for _ in 0..30 {
            engine.advance(1.0 / 60.0);
        }
        let after = engine.total_kinetic_energy();
        assert!((after - before).abs() / before < 1e-3);
    }

    #[test]
    fn test_inelastic_energy_non_increasing() {
        let mut engine = zero_gravity_engine();
        engine.set_substeps(4);
        let mut a = elastic(300.0, 350.0, 150.0, 0.0);
        let mut b = elastic(400.0, 350.0, -150.0, 0.0);
        a.restitution = 0.8;
        b.restitution = 0.8;
        engine.add_body(a);
        engine.add_body(b);

        let mut last = engine.total_kinetic_energy();
        for _ in 0..40 {
            engine.advance(1.0 / 60.0);
            let now = engine.total_kinetic_energy();
            assert!(now <= last * (1.0 + 1e-5));
            last = now;
        }
        assert!(last < 0.5 * 10.0 * 150.0 * 150.0 * 2.0);
    }

    #[test]
    fn test_spawn_cap_three_spawners() {
        let mut engine = zero_gravity_engine();
        engine.set_auto_spawn(true);
        engine.set_max_bodies(3);
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            engine.add_spawner(ready_spawner(id, 100.0 + i as f32 * 100.0)).unwrap();
        }

        engine.advance(1.0 / 60.0);
        assert_eq!(engine.body_count(), 3);
        engine.advance(1.0 / 60.0);
        assert_eq!(engine.body_count(), 3);
    }

    #[test]
    fn test_cap_stops_scan_in_insertion_order() {
        let mut engine = zero_gravity_engine();
        engine.set_auto_spawn(true);
        engine.set_max_bodies(2);
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            engine.add_spawner(ready_spawner(id, 100.0 + i as f32 * 100.0)).unwrap();
        }

        engine.advance(1.0 / 60.0);
        assert_eq!(engine.body_count(), 2);
        let ys: Vec<f32> = engine.bodies().iter().map(|b| b.position.y).collect();
        assert_eq!(ys, vec![100.0, 200.0]);
        // "c" was skipped, not reset
        assert!(engine.spawner("c").unwrap().is_ready());
        assert_eq!(engine.spawner("a").unwrap().elapsed(), 0.0);
    }

    #[test]
    fn test_auto_spawn_disabled() {
        let mut engine = zero_gravity_engine();
        engine.add_spawner(ready_spawner("a", 100.0)).unwrap();
        engine.advance(1.0 / 60.0);
        assert_eq!(engine.body_count(), 0);
    }

    #[test]
    fn test_direct_injection_ignores_cap() {
        let mut engine = zero_gravity_engine();
        engine.set_max_bodies(1);
        engine.spawn_random_at(Vector2::new(100.0, 100.0), Vector2::ZERO);
        engine.spawn_random_at(Vector2::new(200.0, 100.0), Vector2::ZERO);
        assert_eq!(engine.body_count(), 2);
        assert!(engine.bodies().iter().all(|b| engine.radius_range().contains(b.radius)));
    }

    #[test]
    fn test_restart_idempotent() {
        let mut engine = zero_gravity_engine();
        engine.add_spawner(ready_spawner("keep", 100.0)).unwrap();
        engine.add_body(elastic(100.0, 100.0, 0.0, 0.0));
        let spawners_before = engine.spawners().to_vec();

        engine.restart();
        assert_eq!(engine.body_count(), 0);
        engine.restart();
        assert_eq!(engine.body_count(), 0);
        assert_eq!(engine.spawners(), spawners_before.as_slice());
    }

    #[test]
    fn test_spawner_management() {
        let mut engine = Engine::new();
        engine.add_spawner(ready_spawner("one", 100.0)).unwrap();
        assert_eq!(
            engine.add_spawner(ready_spawner("one", 200.0)),
            Err(EngineError::DuplicateSpawner("one".to_string()))
        );
        assert_eq!(
            engine.add_spawner(ready_spawner("bad id", 200.0)),
            Err(EngineError::InvalidSpawnerId("bad id".to_string()))
        );
        assert_eq!(engine.spawner("one").unwrap().position.y, 100.0);

        assert!(engine.update_spawner("one", ready_spawner("one", 250.0)));
        assert_eq!(engine.spawner("one").unwrap().position.y, 250.0);
        assert!(!engine.update_spawner("missing", ready_spawner("missing", 0.0)));
        assert!(engine.spawner("missing").is_none());

        engine.add_spawner(ready_spawner("two", 100.0)).unwrap();
        assert_eq!(engine.spawner_ids().collect::<Vec<_>>(), vec!["one", "two"]);

        let removed = engine.remove_spawner("one").unwrap();
        assert_eq!(removed.id, "one");
        assert_eq!(
            engine.remove_spawner("one"),
            Err(EngineError::SpawnerNotFound("one".to_string()))
        );
    }

    #[test]
    fn test_spawner_interval_falls_back_to_engine_default() {
        let mut engine = Engine::new();
        engine.set_spawn_interval(0.75);
        engine
            .add_spawner(SpawnerConfig::new("s", Vector2::ZERO, Vector2::ZERO, 0.0))
            .unwrap();
        assert_eq!(engine.spawner("s").unwrap().interval, 0.75);
    }

    #[test]
    fn test_time_accumulates() {
        let mut engine = zero_gravity_engine();
        engine.set_framerate(120);
        engine.step();
        engine.step();
        assert!((engine.time() - 2.0 / 120.0).abs() < 1e-6);
    }
}
