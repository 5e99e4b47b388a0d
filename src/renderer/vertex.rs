//! Scene vertex layout and fixed palette

use bytemuck::{Pod, Zeroable};

/// Position in playfield pixels (clip space once uploaded) and linear RGBA
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Fixed colors for elements that don't follow the level theme
pub mod colors {
    use crate::sim::Oklch;

    /// Player body gradient, top to bottom
    pub const PLAYER_TOP: Oklch = Oklch::new(0.65, 0.15, 40.0);
    pub const PLAYER_BOTTOM: Oklch = Oklch::new(0.55, 0.15, 40.0);
    pub const PLAYER_HIGHLIGHT: Oklch = Oklch::new(0.75, 0.15, 40.0);
    pub const PLAYER_HIGHLIGHT_ALPHA: f32 = 0.5;

    pub const SHIELD_RING: Oklch = Oklch::new(0.70, 0.15, 200.0);
    pub const SHIELD_RING_ALPHA: f32 = 0.6;

    /// Obstacle drop shadow
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.2];

    /// Power-up badges
    pub const SPEED_BOOST: Oklch = Oklch::new(0.75, 0.16, 85.0);
    pub const SHIELD: Oklch = Oklch::new(0.65, 0.14, 230.0);
    pub const SLOW_MOTION: Oklch = Oklch::new(0.60, 0.15, 300.0);
    pub const ICON_GLYPH: [f32; 4] = [1.0, 1.0, 1.0, 0.95];
}
