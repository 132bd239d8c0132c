//! Court geometry: grid bounds and the static scoring zones.
//!
//! One `CourtConfig` value is built up front and passed by reference into every
//! rule, so no zone table lives in a global.

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRect {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl CellRect {
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.x_min && cell.x <= self.x_max && cell.y >= self.y_min && cell.y <= self.y_max
    }

    /// Cells of the rectangle, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.y_min..=self.y_max).flat_map(move |y| (self.x_min..=self.x_max).map(move |x| Cell::new(x, y)))
    }
}

/// Bounds of the derived "beyond the arc" region.
///
/// A cell is outer territory when it lies on a row past `apex_row`, or on a row between
/// the first playable row and `apex_row - 1` with a column outside `min_x..=max_x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OuterBounds {
    pub apex_row: i32,
    pub min_x: i32,
    pub max_x: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtConfig {
    /// Width and height of the square grid.
    pub grid_size: i32,
    /// Row that is never occupiable (decoration only).
    pub reserved_row: i32,
    pub basket: Cell,
    pub paint: CellRect,
    /// Three-point boundary, in perimeter order. Order matters for arc denial.
    pub arc: Vec<Cell>,
    pub layup: Vec<Cell>,
    pub outer: OuterBounds,
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl CourtConfig {
    /// The 9x9 half court.
    pub fn standard() -> Self {
        let arc = [
            (1, 1),
            (1, 2),
            (1, 3),
            (1, 4),
            (2, 5),
            (3, 5),
            (4, 5),
            (5, 5),
            (6, 5),
            (7, 4),
            (7, 3),
            (7, 2),
            (7, 1),
        ];
        let layup = [(3, 1), (3, 2), (3, 3), (4, 2), (4, 3), (5, 1), (5, 2), (5, 3)];

        Self {
            grid_size: 9,
            reserved_row: 0,
            basket: Cell::new(4, 1),
            paint: CellRect { x_min: 3, x_max: 5, y_min: 1, y_max: 3 },
            arc: arc.into_iter().map(Cell::from).collect(),
            layup: layup.into_iter().map(Cell::from).collect(),
            outer: OuterBounds { apex_row: 5, min_x: 1, max_x: 7 },
        }
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.grid_size && cell.y >= 0 && cell.y < self.grid_size
    }

    /// In bounds and off the reserved row.
    #[inline]
    pub fn is_playable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && cell.y != self.reserved_row
    }

    #[inline]
    pub fn is_basket(&self, cell: Cell) -> bool {
        cell == self.basket
    }

    #[inline]
    pub fn is_in_paint(&self, cell: Cell) -> bool {
        self.paint.contains(cell)
    }

    #[inline]
    pub fn is_on_arc(&self, cell: Cell) -> bool {
        self.arc.contains(&cell)
    }

    #[inline]
    pub fn is_layup_cell(&self, cell: Cell) -> bool {
        self.layup.contains(&cell)
    }

    /// Arc cells plus everything beyond them.
    pub fn is_three_point_area(&self, cell: Cell) -> bool {
        if self.is_on_arc(cell) {
            return true;
        }
        if cell.y > self.outer.apex_row {
            return true;
        }
        let first_row = self.reserved_row + 1;
        cell.y >= first_row
            && cell.y < self.outer.apex_row
            && (cell.x < self.outer.min_x || cell.x > self.outer.max_x)
    }

    /// Every playable cell, row by row from the top.
    pub fn playable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.grid_size)
            .flat_map(move |y| (0..self.grid_size).map(move |x| Cell::new(x, y)))
            .filter(move |&c| self.is_playable(c))
    }
}
