//! Vertex types for 3D line rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// World-space line vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    /// Byte stride of one vertex in a vertex buffer
    pub const STRIDE: usize = std::mem::size_of::<LineVertex>();
    /// Byte offset of `color` within a vertex
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 3]>();

    pub const fn new(x: f32, y: f32, z: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y, z],
            color,
        }
    }

    pub fn at(pos: Vec3, color: [f32; 4]) -> Self {
        Self::new(pos.x, pos.y, pos.z, color)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Raw bytes of a vertex list, ready for upload
pub fn as_bytes(vertices: &[LineVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Colors for arena elements
pub mod colors {
    pub const BLUE_TEAM: [f32; 4] = [0.2, 0.45, 1.0, 1.0];
    pub const ORANGE_TEAM: [f32; 4] = [1.0, 0.55, 0.1, 1.0];
    pub const DEMOED: [f32; 4] = [0.4, 0.4, 0.4, 0.6];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const AXIS_FORWARD: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
    pub const AXIS_RIGHT: [f32; 4] = [0.2, 1.0, 0.2, 1.0];
    pub const AXIS_UP: [f32; 4] = [0.3, 0.3, 1.0, 1.0];
    pub const PAD_ACTIVE: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
    pub const PAD_INACTIVE: [f32; 4] = [0.35, 0.3, 0.2, 0.5];
    pub const DEBUG_LINE: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
}
