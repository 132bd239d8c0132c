//! Grid cells and the distance metrics every rule is built on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid coordinate. `x` is the column, `y` the row (row 0 is the baseline edge).
///
/// Signed so neighbour offsets can step off the grid before bounds filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: one step covers any of the 8 surrounding cells.
    #[inline]
    pub fn chebyshev(self, other: Cell) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Manhattan distance: only edge-sharing neighbours are one step apart.
    #[inline]
    pub fn manhattan(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Within one step, diagonals included.
    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.chebyshev(other) == 1
    }

    /// Shares an edge.
    #[inline]
    pub fn is_orthogonal_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Cell {
        Cell { x: self.x + dx, y: self.y + dy }
    }

    /// Cell halfway between two cells, rounding halves up on both axes.
    #[inline]
    pub fn midpoint(self, other: Cell) -> Cell {
        Cell { x: (self.x + other.x + 1).div_euclid(2), y: (self.y + other.y + 1).div_euclid(2) }
    }

    /// The 8 surrounding cells, column offset outer, row offset inner.
    ///
    /// The order is part of the defense tie-break and must not change.
    pub fn neighbours(self) -> impl Iterator<Item = Cell> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).filter(move |&dy| dx != 0 || dy != 0).map(move |dy| self.offset(dx, dy))
        })
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
