//! 2D vector type
//!
//! `glam::Vec2` already provides componentwise arithmetic, `dot`, and an
//! uncached `length()`. This module only adds the wall-reflection helpers.

use glam::Vec2;

/// Simulation vector (pixels, pixels/s, pixels/s²)
pub type Vector2 = Vec2;

/// Component flips used by wall reflection
pub trait Mirror {
    /// Negate the x component (bounce off a vertical wall)
    fn flip_x(self) -> Self;
    /// Negate the y component (bounce off a horizontal wall)
    fn flip_y(self) -> Self;
}

impl Mirror for Vec2 {
    #[inline]
    fn flip_x(self) -> Self {
        Vec2::new(-self.x, self.y)
    }

    #[inline]
    fn flip_y(self) -> Self {
        Vec2::new(self.x, -self.y)
    }
}
