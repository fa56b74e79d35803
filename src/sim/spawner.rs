//! Timed body spawners
//!
//! A spawner is a named point that emits one body at a fixed position and
//! velocity whenever its timer reaches its interval. The timer runs on
//! simulated time (frame `dt`), not wall-clock time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, ColorMode, RadiusRange, Rgb};
use super::vector::Vector2;
use crate::consts::MIN_SPAWN_INTERVAL;

fn default_marker_color() -> Rgb {
    Rgb::WHITE
}

fn default_true() -> bool {
    true
}

/// Plain value object used to add or replace a spawner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerConfig {
    pub id: String,
    pub position: Vector2,
    pub velocity: Vector2,
    /// Seconds between emissions; non-positive means "use the engine default"
    #[serde(default)]
    pub interval: f32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Marker colour for display
    #[serde(default = "default_marker_color")]
    pub color: Rgb,
}

impl SpawnerConfig {
    pub fn new(id: impl Into<String>, position: Vector2, velocity: Vector2, interval: f32) -> Self {
        Self {
            id: id.into(),
            position,
            velocity,
            interval,
            active: true,
            visible: true,
            color: default_marker_color(),
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Non-empty and only `[A-Za-z0-9_]`
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Sanitize an emission interval, falling back when unset or invalid
fn effective_interval(interval: f32, fallback: f32) -> f32 {
    let interval = if interval.is_finite() && interval > 0.0 {
        interval
    } else {
        fallback
    };
    interval.max(MIN_SPAWN_INTERVAL)
}

/// A live spawner owned by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub id: String,
    pub position: Vector2,
    pub velocity: Vector2,
    pub interval: f32,
    pub active: bool,
    pub visible: bool,
    pub color: Rgb,
    /// Seconds since the last emission
    #[serde(skip)]
    elapsed: f32,
}

impl Spawner {
    pub fn from_config(config: SpawnerConfig, fallback_interval: f32) -> Self {
        Self {
            interval: effective_interval(config.interval, fallback_interval),
            id: config.id,
            position: config.position,
            velocity: config.velocity,
            active: config.active,
            visible: config.visible,
            color: config.color,
            elapsed: 0.0,
        }
    }

    /// Replace every field except the id and the running timer
    pub fn apply(&mut self, config: SpawnerConfig, fallback_interval: f32) {
        self.position = config.position;
        self.velocity = config.velocity;
        self.interval = effective_interval(config.interval, fallback_interval);
        self.active = config.active;
        self.visible = config.visible;
        self.color = config.color;
    }

    pub fn to_config(&self) -> SpawnerConfig {
        SpawnerConfig {
            id: self.id.clone(),
            position: self.position,
            velocity: self.velocity,
            interval: self.interval,
            active: self.active,
            visible: self.visible,
            color: self.color,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Run the timer for one frame; inactive spawners do not accumulate time
    pub fn advance(&mut self, dt: f32) {
        if self.active {
            self.elapsed += dt;
        }
    }

    pub fn is_ready(&self) -> bool {
        self.active && self.elapsed >= self.interval
    }

    pub fn reset_timer(&mut self) {
        self.elapsed = 0.0;
    }

    /// Build a body at this spawner and restart its timer
    pub fn emit<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        radii: RadiusRange,
        restitution: f32,
        colors: ColorMode,
    ) -> Body {
        self.reset_timer();
        Body::random(rng, self.position, self.velocity, radii, restitution, colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn config(interval: f32) -> SpawnerConfig {
        SpawnerConfig::new(
            "spawner_1",
            Vector2::new(200.0, 200.0),
            Vector2::new(1000.0, -1000.0),
            interval,
        )
    }

    #[test]
    fn test_id_validation() {
        assert!(is_valid_id("spawner1"));
        assert!(is_valid_id("left_corner_2"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("has space"));
        assert!(!is_valid_id("dash-ed"));
    }

    #[test]
    fn test_interval_fallback_and_floor() {
        assert_eq!(Spawner::from_config(config(0.0), 0.5).interval, 0.5);
        assert_eq!(Spawner::from_config(config(f32::NAN), 0.5).interval, 0.5);
        assert_eq!(
            Spawner::from_config(config(1e-6), 0.5).interval,
            MIN_SPAWN_INTERVAL
        );
        assert_eq!(Spawner::from_config(config(0.2), 0.5).interval, 0.2);
    }

    #[test]
    fn test_timer_fires_at_interval() {
        let mut spawner = Spawner::from_config(config(0.1), 1.0);
        spawner.advance(0.05);
        assert!(!spawner.is_ready());
        spawner.advance(0.05);
        assert!(spawner.is_ready());

        let mut rng = Pcg32::seed_from_u64(3);
        let body = spawner.emit(&mut rng, RadiusRange::default(), 0.9, ColorMode::Random);
        assert_eq!(body.position, spawner.position);
        assert_eq!(body.velocity, spawner.velocity);
        assert_eq!(spawner.elapsed(), 0.0);
        assert!(!spawner.is_ready());
    }

    #[test]
    fn test_inactive_spawner_never_ready() {
        let mut spawner = Spawner::from_config(config(0.1).with_active(false), 1.0);
        spawner.advance(5.0);
        assert!(!spawner.is_ready());
        assert_eq!(spawner.elapsed(), 0.0);
    }

    #[test]
    fn test_apply_keeps_id_and_timer() {
        let mut spawner = Spawner::from_config(config(1.0), 1.0);
        spawner.advance(0.4);

        let mut replacement = config(2.0).with_visible(false);
        replacement.id = "ignored".to_string();
        replacement.position = Vector2::new(10.0, 20.0);
        spawner.apply(replacement, 1.0);

        assert_eq!(spawner.id, "spawner_1");
        assert_eq!(spawner.position, Vector2::new(10.0, 20.0));
        assert_eq!(spawner.interval, 2.0);
        assert!(!spawner.visible);
        assert!((spawner.elapsed() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_config_json_defaults() {
        let json = r#"{"id":"s","position":[1.0,2.0],"velocity":[0.0,0.0]}"#;
        let parsed: SpawnerConfig = serde_json::from_str(json).unwrap();
        assert!(parsed.active && parsed.visible);
        assert_eq!(parsed.interval, 0.0);
        assert_eq!(parsed.color, Rgb::WHITE);
    }
}
