//! Hex offset coordinates.
//!
//! Rows run top to bottom, columns left to right. Odd rows are shifted right
//! by one radius, so the diagonal neighbors of a cell depend on its row
//! parity. Getting the parity table wrong breaks both matching and
//! detachment without any visible error, so both tables live here and
//! nowhere else.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ROW_SPACING;

/// Neighbor offsets `(d_row, d_col)` for even rows
pub const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(0, 1), (0, -1), (-1, -1), (-1, 0), (1, -1), (1, 0)];

/// Neighbor offsets `(d_row, d_col)` for odd rows
pub const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(0, 1), (0, -1), (-1, 0), (-1, 1), (1, 0), (1, 1)];

/// A cell address in the offset grid.
///
/// Coordinates are signed so neighbor arithmetic can step off the board;
/// the grid rejects anything outside its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: i32,
    pub col: i32,
}

impl GridCoord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn is_odd_row(&self) -> bool {
        self.row.rem_euclid(2) == 1
    }

    /// Offset table for this cell's row parity
    #[inline]
    pub fn neighbor_offsets(&self) -> &'static [(i32, i32); 6] {
        if self.is_odd_row() {
            &ODD_ROW_OFFSETS
        } else {
            &EVEN_ROW_OFFSETS
        }
    }

    /// All six neighbors, including ones that fall off the board
    pub fn neighbors(&self) -> [GridCoord; 6] {
        let offsets = self.neighbor_offsets();
        std::array::from_fn(|i| {
            let (dr, dc) = offsets[i];
            GridCoord::new(self.row + dr, self.col + dc)
        })
    }

    pub fn is_neighbor_of(&self, other: GridCoord) -> bool {
        self.neighbors().contains(&other)
    }

    /// Canonical render-space center of this cell
    pub fn to_pixel(&self, radius: f32) -> Vec2 {
        let shift = if self.is_odd_row() { radius } else { 0.0 };
        Vec2::new(
            self.col as f32 * 2.0 * radius + radius + shift,
            self.row as f32 * ROW_SPACING * radius + radius,
        )
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_even_row_neighbors() {
        let n = GridCoord::new(2, 3).neighbors();
        for expected in [(2, 4), (2, 2), (1, 2), (1, 3), (3, 2), (3, 3)] {
            assert!(n.contains(&GridCoord::new(expected.0, expected.1)), "missing {expected:?}");
        }
    }

    #[test]
    fn test_odd_row_neighbors() {
        let n = GridCoord::new(1, 3).neighbors();
        for expected in [(1, 4), (1, 2), (0, 3), (0, 4), (2, 3), (2, 4)] {
            assert!(n.contains(&GridCoord::new(expected.0, expected.1)), "missing {expected:?}");
        }
    }

    #[test]
    fn test_to_pixel() {
        let r = 20.0;
        assert_eq!(GridCoord::new(0, 0).to_pixel(r), Vec2::new(20.0, 20.0));
        // Odd rows shift right by one radius
        assert_eq!(GridCoord::new(1, 0).to_pixel(r), Vec2::new(40.0, 56.0));
        assert_eq!(GridCoord::new(2, 3).to_pixel(r), Vec2::new(140.0, 92.0));
    }

    #[test]
    fn test_neighbor_centers_are_two_radii_apart() {
        let r = 20.0;
        for coord in [GridCoord::new(4, 4), GridCoord::new(5, 4)] {
            let center = coord.to_pixel(r);
            for n in coord.neighbors() {
                let d = center.distance(n.to_pixel(r));
                // Same-row neighbors sit at 2r, diagonal ones at sqrt(1 + 1.8²)·r
                assert!(d > 1.9 * r && d < 2.1 * r, "{coord} -> {n}: {d}");
            }
        }
    }

    proptest! {
        #[test]
        fn prop_adjacency_is_symmetric(row in -50i32..50, col in -50i32..50, i in 0usize..6) {
            let a = GridCoord::new(row, col);
            let b = a.neighbors()[i];
            prop_assert!(b.is_neighbor_of(a), "{} is a neighbor of {} but not vice versa", b, a);
        }

        #[test]
        fn prop_neighbors_are_distinct(row in -50i32..50, col in -50i32..50) {
            let a = GridCoord::new(row, col);
            let n = a.neighbors();
            for i in 0..6 {
                prop_assert_ne!(n[i], a);
                for j in (i + 1)..6 {
                    prop_assert_ne!(n[i], n[j]);
                }
            }
        }
    }
}
