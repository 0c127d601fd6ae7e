//! Cluster detection - matching groups and unsupported debris.
//!
//! Both searches are breadth-first with an explicit queue and visited set,
//! so termination does not depend on recursion depth.

use std::collections::{HashSet, VecDeque};

use super::grid::BubbleGrid;
use super::hex::GridCoord;

/// Minimum same-color group size that pops (match-3)
pub const MIN_MATCH: usize = 3;

/// Find the same-color group containing `start`.
///
/// Returns the whole connected group (in discovery order, `start` first) if it
/// has at least [`MIN_MATCH`] bubbles, otherwise an empty vec.
pub fn find_match(grid: &BubbleGrid, start: GridCoord) -> Vec<GridCoord> {
    let Some(color) = grid.color_at(start) else {
        return Vec::new();
    };

    let mut group = Vec::new();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(coord) = queue.pop_front() {
        group.push(coord);
        for neighbor in coord.neighbors() {
            if grid.color_at(neighbor) == Some(color) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    if group.len() >= MIN_MATCH {
        group
    } else {
        Vec::new()
    }
}

/// Find anchored bubbles with no path to row 0.
///
/// The search is seeded from every occupied row-0 cell and walks through
/// occupied cells only. Cells in `excluded` (bubbles already chosen for
/// removal but possibly still on the grid) neither seed nor conduct support.
/// Results are in row-major order.
pub fn find_detached(grid: &BubbleGrid, excluded: &HashSet<GridCoord>) -> Vec<GridCoord> {
    let conducts = |c: GridCoord| grid.is_occupied(c) && !excluded.contains(&c);

    let mut supported: HashSet<GridCoord> = grid.occupied_in_row(0).into_iter().filter(|c| conducts(*c)).collect();
    let mut queue: VecDeque<GridCoord> = supported.iter().copied().collect();

    while let Some(coord) = queue.pop_front() {
        for neighbor in coord.neighbors() {
            if conducts(neighbor) && supported.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    grid.all_coords()
        .filter(|c| conducts(*c) && !supported.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bubble, BubbleColor};
    use proptest::prelude::*;

    fn grid_with(cells: &[(i32, i32, BubbleColor)]) -> BubbleGrid {
        let mut grid = BubbleGrid::new(12, 8);
        for &(row, col, color) in cells {
            grid.insert(Bubble::anchored(0, color, GridCoord::new(row, col), 20.0))
                .unwrap();
        }
        grid
    }

    use BubbleColor::*;

    #[test]
    fn test_pair_does_not_match() {
        let grid = grid_with(&[(0, 0, Red), (0, 1, Red), (0, 2, Blue)]);
        assert!(find_match(&grid, GridCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn test_triple_matches_whole_component() {
        let grid = grid_with(&[(0, 0, Red), (0, 1, Red), (0, 2, Red), (1, 1, Red), (0, 3, Blue)]);
        let group = find_match(&grid, GridCoord::new(1, 1));
        assert_eq!(group.len(), 4);
        assert_eq!(group[0], GridCoord::new(1, 1));
        assert!(!group.contains(&GridCoord::new(0, 3)));
    }

    #[test]
    fn test_match_follows_odd_row_diagonals() {
        // (1, 2) on an odd row touches (0, 2) and (0, 3), not (0, 1)
        let grid = grid_with(&[(1, 2, Green), (0, 3, Green), (0, 1, Green)]);
        assert!(find_match(&grid, GridCoord::new(1, 2)).is_empty());

        let grid = grid_with(&[(1, 2, Green), (0, 3, Green), (0, 2, Green)]);
        assert_eq!(find_match(&grid, GridCoord::new(1, 2)).len(), 3);
    }

    #[test]
    fn test_match_on_empty_cell_is_empty() {
        let grid = grid_with(&[]);
        assert!(find_match(&grid, GridCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn test_bridge_removal_detaches_hanging_pair() {
        // (0, 2) holds up (1, 2), which alone holds (2, 2) and (2, 3)
        let grid = grid_with(&[(0, 2, Green), (1, 2, Red), (2, 2, Yellow), (2, 3, Yellow), (0, 6, Blue)]);
        assert!(find_detached(&grid, &HashSet::new()).is_empty());

        let removed = HashSet::from([GridCoord::new(1, 2)]);
        assert_eq!(
            find_detached(&grid, &removed),
            vec![GridCoord::new(2, 2), GridCoord::new(2, 3)]
        );
    }

    #[test]
    fn test_removed_top_row_does_not_seed_support() {
        let grid = grid_with(&[(0, 0, Red), (1, 0, Blue)]);
        let removed = HashSet::from([GridCoord::new(0, 0)]);
        assert_eq!(find_detached(&grid, &removed), vec![GridCoord::new(1, 0)]);
    }

    proptest! {
        #[test]
        fn prop_detached_and_supported_partition_the_board(
            cells in proptest::collection::hash_set((0i32..12, 0i32..8), 0..60),
            cut in proptest::collection::hash_set((0i32..12, 0i32..8), 0..10),
        ) {
            let mut grid = BubbleGrid::new(12, 8);
            for (row, col) in &cells {
                grid.insert(Bubble::anchored(0, Red, GridCoord::new(*row, *col), 20.0)).unwrap();
            }
            let excluded: HashSet<GridCoord> = cut.iter().map(|&(r, c)| GridCoord::new(r, c)).collect();
            let detached = find_detached(&grid, &excluded);

            let unique: HashSet<_> = detached.iter().copied().collect();
            prop_assert_eq!(unique.len(), detached.len());
            for coord in &detached {
                prop_assert!(grid.is_occupied(*coord));
                prop_assert!(!excluded.contains(coord));
                prop_assert!(coord.row > 0, "row 0 bubbles are always supported");
                // No detached bubble touches a supported one
                for n in coord.neighbors() {
                    let supported = grid.is_occupied(n) && !excluded.contains(&n) && !unique.contains(&n);
                    prop_assert!(!supported, "{} touches supported {}", coord, n);
                }
            }
        }
    }
}
