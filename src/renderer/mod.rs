//! Rendering module
//!
//! The engine never talks to a graphics API directly. It paints each frame
//! through the small [`Surface`] trait, which the browser canvas and the
//! vertex batch both implement.

pub mod batch;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::consts::{BARREL_LENGTH, PREVIEW_OFFSET};
use crate::settings::Settings;
use crate::sim::collision::trace_aim_guide;
use crate::sim::state::{Bubble, BubbleColor, BubbleState, GameState, Particle};
use vertex::{colors, with_alpha};

pub use batch::{BatchCanvas, VertexBatch};
pub use vertex::Vertex;

/// Straight (non-premultiplied) RGBA in 0..=1
pub type Rgba = [f32; 4];

/// Stroke pattern for polylines
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineStyle {
    Solid,
    Dashed { dash: f32, gap: f32 },
}

/// 2D drawing primitives the engine paints with
pub trait Surface {
    /// Current size in pixels
    fn size(&self) -> (f32, f32);
    /// Resize the backing store
    fn resize(&mut self, width: f32, height: f32);
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Rgba);
    fn polyline(&mut self, points: &[Vec2], line_width: f32, color: Rgba, style: LineStyle);
}

/// Something that can hand out a drawing surface, like a canvas element
pub trait SurfaceHost {
    type Surface: Surface;

    /// The 2D context, or `None` if the host cannot provide one
    fn drawing_context(&mut self) -> Option<Self::Surface>;
}

const GUIDE_DASH: LineStyle = LineStyle::Dashed { dash: 5.0, gap: 5.0 };

/// Paint one frame of `state`
pub fn render<S: Surface + ?Sized>(state: &GameState, settings: &Settings, surface: &mut S) {
    surface.clear();
    let shooter = state.shooter_pos();

    let guide_color = state.loaded.filter(|_| settings.guide_line && state.projectile.is_none());
    if let Some(color) = guide_color {
        let path = trace_aim_guide(
            shooter,
            state.launch_angle(),
            state.viewport.radius,
            state.viewport.width,
            &state.grid,
        );
        surface.polyline(&path, 2.0, with_alpha(color.rgba(), 0.5), GUIDE_DASH);
    }

    for bubble in state.grid.iter() {
        draw_bubble(surface, bubble.pos, bubble.radius, bubble.color);
    }

    // Pops still waiting on their stagger look like ordinary bubbles
    for bubble in state.exploding.iter().filter(|b| b.explosion_progress().is_none()) {
        draw_bubble(surface, bubble.pos, bubble.radius, bubble.color);
    }

    for particle in &state.particles {
        draw_particle(surface, particle);
    }

    for bubble in &state.falling {
        draw_falling(surface, bubble);
    }

    for bubble in &state.exploding {
        if let Some(progress) = bubble.explosion_progress() {
            draw_explosion(surface, bubble, progress);
        }
    }

    if let Some(projectile) = &state.projectile {
        draw_bubble(surface, projectile.pos, projectile.radius, projectile.color);
    }

    let radius = state.viewport.radius;
    if let Some(color) = state.loaded {
        draw_bubble(surface, shooter, radius, color);
    }
    if let Some(color) = state.next {
        draw_bubble(surface, shooter + Vec2::new(PREVIEW_OFFSET, 0.0), radius * 0.8, color);
    }

    let launch = state.launch_angle();
    let aim = Vec2::new(launch.cos(), -launch.sin());
    surface.polyline(
        &[shooter, shooter + aim * BARREL_LENGTH],
        6.0,
        colors::BARREL,
        LineStyle::Solid,
    );
}

fn draw_bubble<S: Surface + ?Sized>(surface: &mut S, center: Vec2, radius: f32, color: BubbleColor) {
    surface.fill_circle(center, radius, color.rgba());
    surface.fill_circle(center - Vec2::splat(radius * 0.3), radius * 0.3, colors::SHINE);
    surface.stroke_circle(center, radius, 1.0, colors::OUTLINE);
}

fn draw_particle<S: Surface + ?Sized>(surface: &mut S, particle: &Particle) {
    let radius = particle.radius * particle.scale;
    if radius <= 0.0 || particle.alpha <= 0.0 {
        return;
    }
    surface.fill_circle(particle.pos, radius, with_alpha(particle.tint.rgba(), particle.alpha));
}

/// Falling debris with a faint motion ghost above it
fn draw_falling<S: Surface + ?Sized>(surface: &mut S, bubble: &Bubble) {
    if let BubbleState::Falling { velocity } = bubble.state {
        let ghost = bubble.pos - velocity.normalize_or_zero() * bubble.radius * 0.6;
        surface.fill_circle(ghost, bubble.radius, with_alpha(bubble.color.rgba(), 0.3));
    }
    draw_bubble(surface, bubble.pos, bubble.radius, bubble.color);
}

fn draw_explosion<S: Surface + ?Sized>(surface: &mut S, bubble: &Bubble, progress: f32) {
    let scale = 1.0 + progress * 1.5;
    let alpha = (1.0 - progress * 1.2).max(0.0);
    if alpha == 0.0 {
        return;
    }
    let radius = bubble.radius * scale;

    surface.fill_circle(bubble.pos, radius, with_alpha(bubble.color.rgba(), alpha));
    surface.stroke_circle(bubble.pos, radius * 1.2, 3.0, with_alpha(colors::HALO, alpha));
    surface.stroke_circle(bubble.pos, radius * 1.5, 2.0, with_alpha(bubble.color.rgba(), alpha * 0.5));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hex::GridCoord;
    use crate::tuning::Tuning;

    /// Records draw calls by name
    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        dashed: usize,
    }

    impl Surface for Recorder {
        fn size(&self) -> (f32, f32) {
            (340.0, 700.0)
        }
        fn resize(&mut self, _: f32, _: f32) {}
        fn clear(&mut self) {
            self.calls.push("clear");
        }
        fn fill_circle(&mut self, _: Vec2, _: f32, _: Rgba) {
            self.calls.push("fill");
        }
        fn stroke_circle(&mut self, _: Vec2, _: f32, _: f32, _: Rgba) {
            self.calls.push("stroke");
        }
        fn polyline(&mut self, _: &[Vec2], _: f32, _: Rgba, style: LineStyle) {
            if matches!(style, LineStyle::Dashed { .. }) {
                self.dashed += 1;
            }
            self.calls.push("line");
        }
    }

    fn state() -> GameState {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 340.0, 700.0, 5);
        state.start();
        state
    }

    #[test]
    fn test_frame_starts_with_clear_and_draws_guide() {
        let state = state();
        let mut surface = Recorder::default();
        render(&state, &Settings::default(), &mut surface);

        assert_eq!(surface.calls[0], "clear");
        assert_eq!(surface.dashed, 1);
        // Board bubbles, loaded and preview each take fill + shine + outline
        let fills = surface.calls.iter().filter(|c| **c == "fill").count();
        assert_eq!(fills, (state.grid.len() + 2) * 2);
    }

    #[test]
    fn test_guide_hidden_when_disabled_or_in_flight() {
        let mut state = state();
        let settings = Settings {
            guide_line: false,
            ..Settings::default()
        };
        let mut surface = Recorder::default();
        render(&state, &settings, &mut surface);
        assert_eq!(surface.dashed, 0);

        state.shoot();
        let mut surface = Recorder::default();
        render(&state, &Settings::default(), &mut surface);
        assert_eq!(surface.dashed, 0);
    }

    #[test]
    fn test_finished_explosion_draws_nothing() {
        let mut state = state();
        state.grid.clear();
        state.loaded = None;
        state.next = None;
        let mut done = Bubble::anchored(1, BubbleColor::Red, GridCoord::new(0, 0), 20.0).into_ignited();
        if let BubbleState::Exploding { progress, .. } = &mut done.state {
            *progress = 0.9;
        }
        state.exploding.push(done);

        let mut surface = Recorder::default();
        render(&state, &Settings::default(), &mut surface);
        // clear + barrel only
        assert_eq!(surface.calls, vec!["clear", "line"]);
    }
}
