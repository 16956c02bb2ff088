//! Breadth-first search over the 8-connected traversability grid.
//!
//! Every passable cell is a node and every one of the 8 neighboring
//! offsets is an edge of cost 1, so the first path found is minimal in
//! hop count (not in Euclidean length).
//!
//! Neighbors are expanded in the fixed order of [`NEIGHBOR_OFFSETS`].
//! That order decides the exact visitation order and which of several
//! equally short paths is returned, making both reproducible.
//!
//! Instead of carrying a copy of the path with every queued cell, the
//! search records one parent index per cell in a dense arena and walks
//! it back from the goal once.

use std::collections::VecDeque;

use crate::types::{Cell, CellPath, Grid};

/// Neighbor expansion order as `(drow, dcol)`: orthogonal first, then
/// diagonal.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Parent marker for cells the search has not reached.
const UNVISITED: usize = usize::MAX;

/// Output of [`search`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Path from start to end, or empty if the end is unreachable.
    pub path: CellPath,
    /// Cells in the order they were discovered, starting with `start`.
    pub visited: Vec<Cell>,
}

impl SearchResult {
    /// Whether a path was found.
    #[must_use]
    pub const fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Breadth-first search from `start` to `end`.
///
/// `start` is always expanded, even when blocked; only passable cells
/// are entered after it. When `start` lies outside the grid the result
/// is empty.
#[must_use]
pub fn search(grid: &Grid, start: Cell, end: Cell) -> SearchResult {
    if !grid.contains(start) {
        return SearchResult::default();
    }

    let cell_count = grid.width() as usize * grid.height() as usize;
    let mut parent = vec![UNVISITED; cell_count];
    let mut frontier = VecDeque::new();
    let mut visited = Vec::new();

    let start_index = grid.index(start);
    parent[start_index] = start_index;
    frontier.push_back(start_index);
    visited.push(start);

    while let Some(current_index) = frontier.pop_front() {
        let current = grid.cell_at(current_index);
        if current == end {
            let path = reconstruct(grid, &parent, current_index);
            log::debug!(
                "search reached {end:?} after visiting {} cells, path {} cells",
                visited.len(),
                path.len(),
            );
            return SearchResult { path, visited };
        }

        for (dr, dc) in NEIGHBOR_OFFSETS {
            let Some(next) = current.offset(dr, dc, grid.width(), grid.height()) else {
                continue;
            };
            let next_index = grid.index(next);
            if parent[next_index] != UNVISITED || !grid.is_passable(next) {
                continue;
            }
            parent[next_index] = current_index;
            visited.push(next);
            frontier.push_back(next_index);
        }
    }

    log::debug!(
        "search exhausted frontier after visiting {} cells without reaching {end:?}",
        visited.len(),
    );
    SearchResult {
        path: CellPath::default(),
        visited,
    }
}

/// Walk parent links from `goal` back to the root (its own parent).
fn reconstruct(grid: &Grid, parent: &[usize], goal: usize) -> CellPath {
    let mut cells = vec![grid.cell_at(goal)];
    let mut index = goal;
    while parent[index] != index {
        index = parent[index];
        cells.push(grid.cell_at(index));
    }
    cells.reverse();
    CellPath::new(cells)
}
