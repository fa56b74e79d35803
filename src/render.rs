//! Draw-ready instance data for an external renderer
//!
//! The engine never draws. A renderer asks for one flat buffer per frame and
//! uploads it as-is: every type here is `Pod`, so `bytemuck::cast_slice`
//! turns a `Vec<CircleInstance>` into vertex-buffer bytes.

use bytemuck::{Pod, Zeroable};

use crate::sim::{Body, Spawner};

/// Radius used for spawner markers (pixels)
pub const MARKER_RADIUS: f32 = 6.0;

/// One filled circle
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub position: [f32; 2],
    pub radius: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub const fn new(x: f32, y: f32, radius: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            radius,
            color,
        }
    }

    /// Size of one instance in a GPU buffer
    pub const STRIDE: usize = std::mem::size_of::<Self>();
}

impl From<&Body> for CircleInstance {
    fn from(body: &Body) -> Self {
        Self::new(
            body.position.x,
            body.position.y,
            body.radius_f(),
            body.color.to_rgba(),
        )
    }
}

/// One instance per body, in body order
pub fn instances(bodies: &[Body]) -> Vec<CircleInstance> {
    bodies.iter().map(CircleInstance::from).collect()
}

/// Markers for visible spawners only
pub fn spawner_markers(spawners: &[Spawner]) -> Vec<CircleInstance> {
    spawners
        .iter()
        .filter(|s| s.visible)
        .map(|s| {
            CircleInstance::new(
                s.position.x,
                s.position.y,
                MARKER_RADIUS,
                s.color.to_rgba(),
            )
        })
        .collect()
}

/// Raw bytes for upload
pub fn as_bytes(instances: &[CircleInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
