//! CPU-side vertex batch
//!
//! Tessellates every draw call into one triangle list that can be uploaded
//! as-is (`as_bytes`). Used headless by the native binary and by tests.

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use super::{LineStyle, Rgba, Surface, SurfaceHost};

#[derive(Debug, Clone, Default)]
pub struct VertexBatch {
    width: f32,
    height: f32,
    vertices: Vec<Vertex>,
    /// Draw calls since the last clear
    pub draw_calls: usize,
}

impl VertexBatch {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Raw bytes for a GPU vertex buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl Surface for VertexBatch {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.draw_calls = 0;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.draw_calls += 1;
        self.vertices.extend(shapes::circle(center, radius, color));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Rgba) {
        self.draw_calls += 1;
        self.vertices.extend(shapes::ring(center, radius, line_width, color));
    }

    fn polyline(&mut self, points: &[Vec2], line_width: f32, color: Rgba, style: LineStyle) {
        self.draw_calls += 1;
        match style {
            LineStyle::Solid => {
                for pair in points.windows(2) {
                    self.vertices
                        .extend(shapes::segment(pair[0], pair[1], line_width, color));
                }
            }
            LineStyle::Dashed { dash, gap } => {
                for (from, to) in shapes::dash_pieces(points, dash, gap) {
                    self.vertices.extend(shapes::segment(from, to, line_width, color));
                }
            }
        }
    }
}

/// Offscreen host handing out vertex batches
#[derive(Debug, Clone)]
pub struct BatchCanvas {
    pub width: f32,
    pub height: f32,
    /// When false, behaves like a canvas whose 2D context is unavailable
    pub context_available: bool,
}

impl BatchCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            context_available: true,
        }
    }
}

impl SurfaceHost for BatchCanvas {
    type Surface = VertexBatch;

    fn drawing_context(&mut self) -> Option<VertexBatch> {
        self.context_available
            .then(|| VertexBatch::new(self.width, self.height))
    }
}
