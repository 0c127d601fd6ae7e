//! Board sizing from the host surface
//!
//! The column count and bubble radius are derived from the surface width
//! every time the surface is (re)sized.

use glam::Vec2;

use super::grid::BubbleGrid;
use super::state::GameState;
use crate::tuning::Tuning;

/// Surface dimensions plus the board layout fitted to them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub cols: usize,
    pub rows: usize,
}

impl Viewport {
    /// Fit the board into a `width`×`height` surface.
    ///
    /// Columns are chosen for the largest allowed radius, then the radius is
    /// grown to fill the usable width with that many columns.
    pub fn fit(width: f32, height: f32, tuning: &Tuning) -> Self {
        let usable = (width * tuning.width_fill).max(0.0);
        let cols = ((usable / (2.0 * tuning.max_radius)).floor() as usize).clamp(tuning.min_cols, tuning.max_cols);
        let radius = (usable / (2.0 * cols as f32))
            .floor()
            .clamp(tuning.min_radius, tuning.max_radius);

        Self {
            width,
            height,
            radius,
            cols,
            rows: tuning.rows,
        }
    }

    pub fn shooter_pos(&self, offset: f32) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - offset)
    }

    /// True if the board layout (not just the surface) differs
    pub fn layout_differs(&self, other: &Viewport) -> bool {
        self.cols != other.cols || self.radius != other.radius || self.rows != other.rows
    }
}

/// Refit a running session to a new surface size.
///
/// Anchored bubbles keep their cells and snap to the new canonical centers;
/// bubbles in columns that no longer exist are dropped. Bubbles in flight keep
/// their positions and only pick up the new radius. Returns how many anchored
/// bubbles were dropped.
pub fn apply_resize(state: &mut GameState, width: f32, height: f32) -> usize {
    let old = state.viewport;
    let new = Viewport::fit(width, height, &state.tuning);
    state.viewport = new;

    if !new.layout_differs(&old) {
        log::debug!("Surface resized to {width}x{height}, layout unchanged");
        return 0;
    }

    let old_grid = std::mem::replace(&mut state.grid, BubbleGrid::new(new.rows, new.cols));
    let mut dropped = 0;
    for mut bubble in old_grid.into_bubbles() {
        bubble.radius = new.radius;
        bubble.pos = bubble.coord.to_pixel(new.radius);
        if state.grid.insert(bubble).is_err() {
            dropped += 1;
        }
    }

    if let Some(projectile) = state.projectile.as_mut() {
        projectile.radius = new.radius;
    }
    for bubble in state.falling.iter_mut().chain(state.exploding.iter_mut()) {
        bubble.radius = new.radius;
    }

    log::info!(
        "Board refit to {}x{} (radius {} -> {}, cols {} -> {}), {} bubbles dropped",
        width,
        height,
        old.radius,
        new.radius,
        old.cols,
        new.cols,
        dropped
    );
    dropped
}
