//! Snapping user-picked points onto the nearest passable cell.
//!
//! Clicks rarely land exactly on a one-cell-wide skeleton corridor, so
//! before searching, each endpoint is moved to the closest passable cell
//! within a square window around it.

use crate::types::{Cell, Grid};

/// Nearest passable cell to `point` within the search window, if any.
///
/// Returns `point` itself when it is passable. Otherwise scans rows
/// `row - radius .. row + radius` and columns `col - radius .. col +
/// radius` (upper bounds exclusive), clipped to the grid, in row-major
/// order, and returns the passable cell with the smallest squared
/// distance. Ties go to the cell scanned first.
#[must_use]
pub fn try_snap(grid: &Grid, point: Cell, radius: u32) -> Option<Cell> {
    if grid.is_passable(point) {
        return Some(point);
    }

    let top = point.row.saturating_sub(radius);
    let bottom = point.row.saturating_add(radius).min(grid.height());
    let left = point.col.saturating_sub(radius);
    let right = point.col.saturating_add(radius).min(grid.width());

    let mut best: Option<(u64, Cell)> = None;
    for row in top..bottom {
        for col in left..right {
            let cell = Cell::new(row, col);
            if !grid.is_passable(cell) {
                continue;
            }
            let d = cell.distance_squared(point);
            if best.is_none_or(|(best_d, _)| d < best_d) {
                best = Some((d, cell));
            }
        }
    }
    best.map(|(_, cell)| cell)
}

/// Snap `point` to the nearest passable cell, or return it unchanged
/// when the window holds none.
///
/// An unchanged non-passable result means the endpoint is unreachable;
/// the search from or to it will simply find no path.
#[must_use]
pub fn snap(grid: &Grid, point: Cell, radius: u32) -> Cell {
    try_snap(grid, point, radius).unwrap_or(point)
}
