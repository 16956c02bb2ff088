//! Topology-preserving thinning of the passable region.
//!
//! Zhang–Suen thinning: each iteration runs two sub-passes that peel
//! boundary cells off the south-east and then the north-west side of
//! every corridor, until an iteration removes nothing. The result is a
//! corridor network roughly one cell wide along the middle of each
//! passage, which gives the search a single unambiguous lane to follow.
//!
//! Ring notation, clockwise from north:
//!
//! ```text
//! P9 P2 P3
//! P8 P1 P4
//! P7 P6 P5
//! ```
//!
//! A cell is a candidate when it has between 2 and 6 passable ring
//! neighbors (`B`), is a simple point, is not a corridor end, and meets
//! the sub-pass's directional condition.
//!
//! - Simple: exactly one 8-connected run of passable cells around the
//!   ring (the crossing number `C`). Zhang–Suen's `A == 1` test is
//!   stricter and refuses the inner corners of two-cell-thick diagonal
//!   staircases, so those corridors would never thin.
//! - End: fewer than two passable sides counting diagonal pairs
//!   (Guo–Hall's `N`). A dead end of a thick diagonal corridor looks
//!   like an ordinary boundary cell to `B` alone and gets eaten away
//!   one cell at a time.
//!
//! Candidates are collected from the pass snapshot but removed one at a
//! time, re-checking both tests against the cells that are still
//! present. Removing a simple non-end point can neither split a
//! component nor delete one outright, which also keeps the 2x2 blocks
//! that plain parallel Zhang–Suen erases.

use crate::types::{Cell, Grid};

/// Ring offsets `(drow, dcol)` in P2..P9 order.
const RING: [(i32, i32); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

// Indices into the ring array. Even indices are the four sides.
const P2: usize = 0;
const P4: usize = 2;
const P6: usize = 4;
const P8: usize = 6;
const SIDES: [usize; 4] = [P2, P4, P6, P8];

/// Output of [`thin`].
#[derive(Debug, Clone)]
pub struct Thinning {
    /// The thinned grid.
    pub grid: Grid,
    /// Full iterations run, including the final one that removed nothing.
    pub iterations: usize,
    /// Total cells removed.
    pub removed: usize,
}

#[derive(Debug, Clone, Copy)]
enum SubPass {
    /// Removes south-east boundary cells and north-west corners.
    First,
    /// Removes north-west boundary cells and south-east corners.
    Second,
}

impl SubPass {
    const fn allows(self, ring: &[bool; 8]) -> bool {
        match self {
            Self::First => !(ring[P2] && ring[P4] && ring[P6]) && !(ring[P4] && ring[P6] && ring[P8]),
            Self::Second => {
                !(ring[P2] && ring[P4] && ring[P8]) && !(ring[P2] && ring[P6] && ring[P8])
            }
        }
    }
}

fn ring(grid: &Grid, cell: Cell) -> [bool; 8] {
    RING.map(|(dr, dc)| {
        cell.offset(dr, dc, grid.width(), grid.height())
            .is_some_and(|n| grid.is_passable(n))
    })
}

fn neighbor_count(ring: &[bool; 8]) -> usize {
    ring.iter().filter(|&&p| p).count()
}

/// Number of separate 8-connected runs of passable ring cells.
///
/// A blocked side starts a run when either of the next two cells
/// clockwise is passable.
fn crossing_number(ring: &[bool; 8]) -> usize {
    SIDES
        .iter()
        .filter(|&&i| !ring[i] && (ring[i + 1] || ring[(i + 2) % 8]))
        .count()
}

/// Whether the cell is the tip of a corridor.
fn is_end(ring: &[bool; 8]) -> bool {
    let pairs = |offset: usize| {
        SIDES
            .iter()
            .filter(|&&i| ring[(i + offset) % 8] || ring[(i + offset + 1) % 8])
            .count()
    };
    pairs(0).min(pairs(1)) < 2
}

fn is_removable(ring: &[bool; 8]) -> bool {
    crossing_number(ring) == 1 && !is_end(ring)
}

fn is_candidate(ring: &[bool; 8]) -> bool {
    neighbor_count(ring) <= 6 && is_removable(ring)
}

/// Thin the passable region to one-cell-wide corridors.
///
/// Every connected component of the input keeps at least one cell and
/// stays connected; no blocked cell ever becomes passable.
#[must_use]
pub fn thin(grid: &Grid) -> Thinning {
    let mut out = grid.clone();
    let mut iterations = 0;
    let mut removed = 0;

    loop {
        iterations += 1;
        let mut removed_this_iteration = 0;

        for pass in [SubPass::First, SubPass::Second] {
            let candidates: Vec<Cell> = out
                .passable_cells()
                .filter(|&cell| {
                    let r = ring(&out, cell);
                    is_candidate(&r) && pass.allows(&r)
                })
                .collect();

            for cell in candidates {
                if is_removable(&ring(&out, cell)) {
                    out.set(cell, false);
                    removed_this_iteration += 1;
                }
            }
        }

        removed += removed_this_iteration;
        if removed_this_iteration == 0 {
            break;
        }
    }

    log::debug!(
        "thinned {}x{} grid in {iterations} iterations, removed {removed} of {} cells",
        grid.width(),
        grid.height(),
        grid.passable_count(),
    );

    Thinning {
        grid: out,
        iterations,
        removed,
    }
}
