//! Snapping a stopped projectile onto the grid

use glam::Vec2;

use super::grid::BubbleGrid;
use super::hex::GridCoord;
use crate::distance;

/// Pick the cell a projectile at `pos` settles into.
///
/// Prefers the nearest empty cell that touches at least one anchored bubble.
/// When no such cell exists (an empty board, for instance) it falls back to
/// the nearest empty cell of row 0. Returns `None` only if row 0 is full and
/// nothing else qualifies.
pub fn resolve_snap(grid: &BubbleGrid, pos: Vec2, radius: f32) -> Option<GridCoord> {
    nearest(
        grid.all_coords()
            .filter(|c| !grid.is_occupied(*c) && grid.has_support(*c)),
        pos,
        radius,
    )
    .or_else(|| {
        log::debug!("No supported cell near {pos}, falling back to row 0");
        nearest(
            grid.all_coords().filter(|c| c.row == 0 && !grid.is_occupied(*c)),
            pos,
            radius,
        )
    })
}

/// Candidate whose canonical center is closest to `pos`; ties go to the
/// first candidate in row-major order
fn nearest(candidates: impl Iterator<Item = GridCoord>, pos: Vec2, radius: f32) -> Option<GridCoord> {
    let mut best: Option<(GridCoord, f32)> = None;
    for coord in candidates {
        let d = distance(coord.to_pixel(radius), pos);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((coord, d));
        }
    }
    best.map(|(coord, _)| coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bubble, BubbleColor};

    const R: f32 = 20.0;

    fn grid_with(rows: usize, cols: usize, cells: &[(i32, i32)]) -> BubbleGrid {
        let mut grid = BubbleGrid::new(rows, cols);
        for &(row, col) in cells {
            grid.insert(Bubble::anchored(0, BubbleColor::Blue, GridCoord::new(row, col), R))
                .unwrap();
        }
        grid
    }

    #[test]
    fn test_snaps_to_nearest_supported_cell() {
        let grid = grid_with(12, 8, &[(0, 3)]);
        // Just below and right of (0, 3): (1, 3) is the closest supported cell
        let pos = GridCoord::new(1, 3).to_pixel(R) + Vec2::new(2.0, 3.0);
        assert_eq!(resolve_snap(&grid, pos, R), Some(GridCoord::new(1, 3)));
    }

    #[test]
    fn test_ignores_unsupported_cells() {
        let grid = grid_with(12, 8, &[(0, 0)]);
        // Nearest empty cell to this point is far from any bubble
        let pos = GridCoord::new(5, 6).to_pixel(R);
        let snapped = resolve_snap(&grid, pos, R).unwrap();
        assert!(grid.has_support(snapped));
        assert!(!grid.is_occupied(snapped));
    }

    #[test]
    fn test_empty_board_falls_back_to_row_zero() {
        let grid = grid_with(12, 8, &[]);
        let pos = Vec2::new(GridCoord::new(0, 5).to_pixel(R).x + 3.0, 20.0);
        assert_eq!(resolve_snap(&grid, pos, R), Some(GridCoord::new(0, 5)));
    }

    #[test]
    fn test_full_board_has_no_cell() {
        let cells: Vec<_> = (0..2).flat_map(|r| (0..3).map(move |c| (r, c))).collect();
        let grid = grid_with(2, 3, &cells);
        assert_eq!(resolve_snap(&grid, Vec2::new(30.0, 30.0), R), None);
    }
}
