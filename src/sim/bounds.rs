//! Rectangular domain and wall reflection
//!
//! Screen convention: Y grows downward, so `top < bottom`.

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::vector::{Mirror, Vector2};
use crate::consts::DEFAULT_BOUNDS;

/// Axis-aligned domain edges (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Default for Bounds {
    fn default() -> Self {
        let (left, right, top, bottom) = DEFAULT_BOUNDS;
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

impl Bounds {
    /// Build bounds, widening degenerate spans so `right > left` and `bottom > top`
    pub fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self {
            left,
            right: right.max(left.saturating_add(1)),
            top,
            bottom: bottom.max(top.saturating_add(1)),
        }
    }

    /// Bounds anchored at the origin, e.g. after a window resize
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(
            0,
            i32::try_from(width).unwrap_or(i32::MAX),
            0,
            i32::try_from(height).unwrap_or(i32::MAX),
        )
    }

    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }

    pub fn origin(&self) -> Vector2 {
        Vector2::new(self.left as f32, self.top as f32)
    }

    /// True if the whole circle lies inside (touching an edge counts as inside)
    pub fn contains_circle(&self, center: Vector2, radius: f32) -> bool {
        center.x - radius >= self.left as f32
            && center.x + radius <= self.right as f32
            && center.y - radius >= self.top as f32
            && center.y + radius <= self.bottom as f32
    }

    /// Reflect one body off any wall it crosses
    ///
    /// The horizontal pair (right, else left) and the vertical pair (top,
    /// else bottom) are checked independently, so a body in a corner gets
    /// both corrections and its restitution is applied twice in one call.
    pub fn reflect(&self, body: &mut Body) {
        let radius = body.radius_f();

        if body.position.x + radius > self.right as f32 {
            body.position.x = self.right as f32 - radius;
            body.velocity = body.velocity.flip_x() * body.restitution;
        } else if body.position.x - radius < self.left as f32 {
            body.position.x = self.left as f32 + radius;
            body.velocity = body.velocity.flip_x() * body.restitution;
        }

        if body.position.y - radius < self.top as f32 {
            body.position.y = self.top as f32 + radius;
            body.velocity = body.velocity.flip_y() * body.restitution;
        } else if body.position.y + radius > self.bottom as f32 {
            body.position.y = self.bottom as f32 - radius;
            body.velocity = body.velocity.flip_y() * body.restitution;
        }
    }
}

/// Apply wall reflection to every body
pub fn apply_bounds(bodies: &mut [Body], bounds: &Bounds) {
    for body in bodies.iter_mut() {
        bounds.reflect(body);
    }
}
