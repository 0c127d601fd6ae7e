//! The bubble grid.
//!
//! A dense rows×cols table of optional bubbles. Every lookup goes through
//! `index`, so out-of-range coordinates read as `None` instead of panicking
//! or wrapping into a neighboring row.

use super::hex::GridCoord;
use super::state::{Bubble, BubbleColor};

#[derive(Debug, Clone)]
pub struct BubbleGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Bubble>>,
}

impl BubbleGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        self.index(coord).is_some()
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        let row = usize::try_from(coord.row).ok()?;
        let col = usize::try_from(coord.col).ok()?;
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    /// The bubble at `coord`, or `None` for empty and out-of-range cells
    pub fn get(&self, coord: GridCoord) -> Option<&Bubble> {
        self.index(coord).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut Bubble> {
        self.index(coord).and_then(|i| self.cells[i].as_mut())
    }

    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.get(coord).is_some()
    }

    pub fn color_at(&self, coord: GridCoord) -> Option<BubbleColor> {
        self.get(coord).map(|b| b.color)
    }

    /// Store a bubble at its own coordinate.
    ///
    /// Hands the bubble back if the coordinate is off the board or the cell
    /// is already taken; a cell never holds two bubbles.
    pub fn insert(&mut self, bubble: Bubble) -> Result<(), Bubble> {
        match self.index(bubble.coord) {
            Some(i) if self.cells[i].is_none() => {
                self.cells[i] = Some(bubble);
                Ok(())
            }
            _ => Err(bubble),
        }
    }

    /// Take the bubble out of a cell
    pub fn remove(&mut self, coord: GridCoord) -> Option<Bubble> {
        self.index(coord).and_then(|i| self.cells[i].take())
    }

    /// Consume the grid, yielding its bubbles in row-major order
    pub fn into_bubbles(self) -> impl Iterator<Item = Bubble> {
        self.cells.into_iter().flatten()
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Occupied cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.cells.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bubble> {
        self.cells.iter_mut().flatten()
    }

    /// Every coordinate on the board, occupied or not, in row-major order
    pub fn all_coords(&self) -> impl Iterator<Item = GridCoord> + use<> {
        let cols = self.cols as i32;
        (0..self.rows as i32).flat_map(move |row| (0..cols).map(move |col| GridCoord::new(row, col)))
    }

    /// Occupied coordinates in one row
    pub fn occupied_in_row(&self, row: i32) -> Vec<GridCoord> {
        (0..self.cols as i32)
            .map(|col| GridCoord::new(row, col))
            .filter(|c| self.is_occupied(*c))
            .collect()
    }

    /// True if at least one neighbor of `coord` holds a bubble
    pub fn has_support(&self, coord: GridCoord) -> bool {
        coord.neighbors().iter().any(|n| self.is_occupied(*n))
    }
}
