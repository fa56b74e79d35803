//! Simulated circle bodies
//!
//! A single concrete body type: kinematics, mass, restitution, colour and
//! radius. Radius limits are an explicit `RadiusRange` value owned by the
//! engine rather than process-wide state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::vector::Vector2;
use crate::consts::*;

/// Smallest mass a body may carry (keeps the impulse denominator positive)
pub const MIN_MASS: f32 = 1e-3;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uniformly random colour
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random(), rng.random(), rng.random())
    }

    /// Normalized RGBA for GPU buffers
    pub fn to_rgba(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

/// How spawned bodies are coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// Uniform random RGB per body
    #[default]
    Random,
    /// Every body gets the same colour
    Fixed(Rgb),
}

impl ColorMode {
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        match self {
            ColorMode::Random => Rgb::random(rng),
            ColorMode::Fixed(color) => *color,
        }
    }
}

/// Inclusive radius bounds for generated bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusRange {
    min: u32,
    max: u32,
}

impl Default for RadiusRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_RADIUS,
            max: DEFAULT_MAX_RADIUS,
        }
    }
}

impl RadiusRange {
    /// Clamp to `[RADIUS_FLOOR, RADIUS_CEILING]` with `max >= min`
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.clamp(RADIUS_FLOOR, RADIUS_CEILING);
        let max = max.clamp(min, RADIUS_CEILING);
        Self { min, max }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, radius: u32) -> bool {
        (self.min..=self.max).contains(&radius)
    }

    /// Uniform draw from `[min, max]`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.random_range(self.min..=self.max)
    }
}

/// A simulated circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vector2,
    pub velocity: Vector2,
    /// Recomputed from gravity every substep
    pub acceleration: Vector2,
    pub mass: f32,
    /// 0 = fully inelastic, 1 = fully elastic
    pub restitution: f32,
    pub color: Rgb,
    pub radius: u32,
    /// Set by collision resolution, cleared by restitution in the same substep
    #[serde(skip)]
    pub collided: bool,
}

impl Body {
    pub fn new(
        position: Vector2,
        velocity: Vector2,
        radius: u32,
        mass: f32,
        restitution: f32,
        color: Rgb,
    ) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2::ZERO,
            mass: mass.max(MIN_MASS),
            restitution: restitution.clamp(0.0, 1.0),
            color,
            radius,
            collided: false,
        }
    }

    /// Random radius from `radii`, mass equal to the radius, colour per `colors`
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        position: Vector2,
        velocity: Vector2,
        radii: RadiusRange,
        restitution: f32,
        colors: ColorMode,
    ) -> Self {
        let radius = radii.sample(rng);
        let color = colors.pick(rng);
        Self::new(position, velocity, radius, radius as f32, restitution, color)
    }

    #[inline]
    pub fn radius_f(&self) -> f32 {
        self.radius as f32
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// Velocity-Verlet step with acceleration held constant over `dt`
    pub fn integrate(&mut self, dt: f32) {
        let half_kick = self.acceleration * (0.5 * dt);
        let half_velocity = self.velocity + half_kick;
        self.position += half_velocity * dt;
        self.velocity = half_velocity + half_kick;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn resting_body() -> Body {
        Body::new(Vector2::ZERO, Vector2::ZERO, 10, 10.0, 1.0, Rgb::RED)
    }

    #[test]
    fn test_integrate_matches_projectile_motion() {
        let mut body = resting_body();
        body.velocity = Vector2::new(100.0, -200.0);
        body.acceleration = Vector2::new(0.0, 3000.0);

        let dt = 1.0 / 240.0;
        let steps = 240;
        for _ in 0..steps {
            body.integrate(dt);
        }

        // Constant acceleration makes velocity-Verlet exact up to rounding
        let t = dt * steps as f32;
        let expected_pos = Vector2::new(100.0 * t, -200.0 * t + 0.5 * 3000.0 * t * t);
        let expected_vel = Vector2::new(100.0, -200.0 + 3000.0 * t);
        assert!((body.position - expected_pos).length() < 0.5);
        assert!((body.velocity - expected_vel).length() < 0.1);
    }

    #[test]
    fn test_integrate_without_acceleration_is_linear() {
        let mut body = resting_body();
        body.velocity = Vector2::new(10.0, 5.0);
        body.integrate(0.5);
        assert_eq!(body.position, Vector2::new(5.0, 2.5));
        assert_eq!(body.velocity, Vector2::new(10.0, 5.0));
    }

    #[test]
    fn test_new_clamps_mass_and_restitution() {
        let body = Body::new(Vector2::ZERO, Vector2::ZERO, 5, -3.0, 1.5, Rgb::WHITE);
        assert_eq!(body.mass, MIN_MASS);
        assert_eq!(body.restitution, 1.0);
        assert!(!body.collided);
    }

    #[test]
    fn test_radius_range_clamps() {
        let range = RadiusRange::new(0, 1000);
        assert_eq!(range.min(), RADIUS_FLOOR);
        assert_eq!(range.max(), RADIUS_CEILING);

        let inverted = RadiusRange::new(30, 10);
        assert_eq!(inverted.min(), 30);
        assert_eq!(inverted.max(), 30);
    }

    #[test]
    fn test_random_body_within_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let radii = RadiusRange::new(10, 20);
        for _ in 0..200 {
            let body = Body::random(
                &mut rng,
                Vector2::new(1.0, 2.0),
                Vector2::ZERO,
                radii,
                0.9,
                ColorMode::Random,
            );
            assert!(radii.contains(body.radius));
            assert_eq!(body.mass, body.radius as f32);
            assert_eq!(body.position, Vector2::new(1.0, 2.0));
        }
    }

    #[test]
    fn test_fixed_color_mode() {
        let mut rng = Pcg32::seed_from_u64(1);
        let teal = Rgb::new(0, 128, 128);
        let body = Body::random(
            &mut rng,
            Vector2::ZERO,
            Vector2::ZERO,
            RadiusRange::default(),
            0.9,
            ColorMode::Fixed(teal),
        );
        assert_eq!(body.color, teal);
    }
}
