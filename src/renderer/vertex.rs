//! Vertex types for tessellated 2D output

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position (surface pixels) and straight RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Bytes per vertex in an uploaded buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    /// Byte offset of `color` within a vertex
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 2]>();

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for board elements
pub mod colors {
    pub const SHINE: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const OUTLINE: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const BARREL: [f32; 4] = [0.4, 0.4, 0.45, 1.0];
    pub const HALO: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
}

/// Same color with alpha multiplied by `alpha`
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 24);
        assert_eq!(Vertex::COLOR_OFFSET, 8);
        let vertex = Vertex::new(1.0, 2.0, [0.0; 4]);
        let bytes = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), Vertex::STRIDE);
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(with_alpha([1.0, 0.5, 0.0, 0.8], 0.5), [1.0, 0.5, 0.0, 0.4]);
        assert_eq!(with_alpha(colors::HALO, 3.0), colors::HALO);
    }
}
