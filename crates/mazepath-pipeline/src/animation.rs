//! Frame sequencing for animating a search and its result.
//!
//! [`Animation`] is a resumable state machine over a finished search:
//! the caller pulls one [`Frame`] at a time, renders it, and schedules
//! the next pull however its event loop likes (timer, idle callback,
//! plain loop). Nothing here sleeps or renders.
//!
//! # Phases
//!
//! 1. **Visitation**: the visited cells in discovery order, split into
//!    chunks of `chunk_size`. Each chunk is one [`Frame::Visit`]; every
//!    cell is tinted by the gradient at its global index, so the trail
//!    fades from the start color to the end color.
//! 2. **Path**: one [`Frame::Segment`] per consecutive pair of path
//!    cells. Skipped entirely when no path was found.
//!
//! ```rust
//! # use mazepath_pipeline::{Animation, AnimationStyle, Cell, CellPath, Status};
//! let visited = vec![Cell::new(0, 0), Cell::new(0, 1)];
//! let path = CellPath::new(visited.clone());
//! let style = AnimationStyle::default();
//! let mut animation = Animation::new(&visited, &path, &style);
//! while let Some(frame) = animation.advance() {
//!     // draw `frame`, then wait for the next tick
//! #   let _ = frame;
//! }
//! assert_eq!(animation.status(), Status::Success);
//! ```

use serde::{Deserialize, Serialize};

use crate::gradient::{ColorGradient, progress};
use crate::types::{AnimationStyle, Cell, CellPath, Rgb, Status};

/// A visited cell and the color to paint it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintedCell {
    /// Cell to paint.
    pub cell: Cell,
    /// Paint color.
    pub color: Rgb,
}

/// A stroked line between two consecutive path cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment start; draw at its screen coordinates `(col, row)`.
    pub from: Cell,
    /// Segment end.
    pub to: Cell,
    /// Stroke color.
    pub color: Rgb,
    /// Stroke width in pixels.
    pub width: f32,
}

/// One render update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Frame {
    /// Paint a chunk of visited cells onto the maze layer.
    Visit(Vec<PaintedCell>),
    /// Stroke one path segment onto the display layer.
    Segment(Segment),
}

/// Where the animation will resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// Next visited index to paint.
    Visiting(usize),
    /// Index of the next segment's first path cell.
    Drawing(usize),
    Finished,
}

/// Resumable frame generator over a search result.
#[derive(Debug, Clone)]
pub struct Animation<'a> {
    visited: &'a [Cell],
    path: &'a [Cell],
    gradient: ColorGradient,
    chunk_size: usize,
    path_color: Rgb,
    path_width: f32,
    cursor: Cursor,
    emitted: usize,
}

impl<'a> Animation<'a> {
    /// Prepare an animation; no frame is produced until
    /// [`advance`](Self::advance) is called.
    ///
    /// A `chunk_size` of zero is treated as one.
    #[must_use]
    pub fn new(visited: &'a [Cell], path: &'a CellPath, style: &AnimationStyle) -> Self {
        Self {
            visited,
            path: path.cells(),
            gradient: ColorGradient::new(style.start_color, style.end_color),
            chunk_size: style.chunk_size.max(1),
            path_color: style.path_color,
            path_width: style.path_width,
            cursor: Cursor::Visiting(0),
            emitted: 0,
        }
    }

    /// Whether another frame is available.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        match self.cursor {
            Cursor::Visiting(next) => next < self.visited.len() || self.path.len() >= 2,
            Cursor::Drawing(next) => next + 1 < self.path.len(),
            Cursor::Finished => false,
        }
    }

    /// Produce the next frame, or `None` once the animation is complete.
    pub fn advance(&mut self) -> Option<Frame> {
        loop {
            match self.cursor {
                Cursor::Visiting(next) if next < self.visited.len() => {
                    let end = (next + self.chunk_size).min(self.visited.len());
                    let n = self.visited.len();
                    let cells = self.visited[next..end]
                        .iter()
                        .enumerate()
                        .map(|(offset, &cell)| PaintedCell {
                            cell,
                            color: self.gradient.lerp(progress(next + offset, n)),
                        })
                        .collect();
                    self.cursor = Cursor::Visiting(end);
                    self.emitted += 1;
                    return Some(Frame::Visit(cells));
                }
                Cursor::Visiting(_) => self.cursor = Cursor::Drawing(0),
                Cursor::Drawing(next) if next + 1 < self.path.len() => {
                    self.cursor = Cursor::Drawing(next + 1);
                    self.emitted += 1;
                    return Some(Frame::Segment(Segment {
                        from: self.path[next],
                        to: self.path[next + 1],
                        color: self.path_color,
                        width: self.path_width,
                    }));
                }
                Cursor::Drawing(_) => self.cursor = Cursor::Finished,
                Cursor::Finished => return None,
            }
        }
    }

    /// Rewind to the first frame.
    pub const fn restart(&mut self) {
        self.cursor = Cursor::Visiting(0);
        self.emitted = 0;
    }

    /// Total number of frames the animation produces.
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.visited.len().div_ceil(self.chunk_size) + self.path.len().saturating_sub(1)
    }

    /// Frames produced since creation or the last restart.
    #[must_use]
    pub const fn frames_emitted(&self) -> usize {
        self.emitted
    }

    /// `Waiting` while frames remain; then `Success` if a path was found,
    /// `Failure` otherwise.
    #[must_use]
    pub const fn status(&self) -> Status {
        if self.has_next() {
            Status::Waiting
        } else if self.path.is_empty() {
            Status::Failure
        } else {
            Status::Success
        }
    }
}

impl Iterator for Animation<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_cells(n: u32) -> Vec<Cell> {
        (0..n).map(|c| Cell::new(0, c)).collect()
    }

    #[test]
    fn visits_are_chunked() {
        let visited = row_cells(120);
        let path = CellPath::default();
        let style = AnimationStyle::default();
        let frames: Vec<Frame> = Animation::new(&visited, &path, &style).collect();
        let sizes: Vec<usize> = frames
            .iter()
            .map(|f| match f {
                Frame::Visit(cells) => cells.len(),
                Frame::Segment(_) => 0,
            })
            .collect();
        assert_eq!(sizes, vec![50, 50, 20]);
    }

    #[test]
    fn colors_follow_global_index() {
        let visited = row_cells(101);
        let path = CellPath::default();
        let style = AnimationStyle::default();
        let painted: Vec<PaintedCell> = Animation::new(&visited, &path, &style)
            .flat_map(|f| match f {
                Frame::Visit(cells) => cells,
                Frame::Segment(_) => Vec::new(),
            })
            .collect();
        assert_eq!(painted.len(), 101);
        assert_eq!(painted[0].color, style.start_color);
        assert_eq!(painted[100].color, style.end_color);
        let gradient = ColorGradient::new(style.start_color, style.end_color);
        assert_eq!(painted[60].color, gradient.lerp(0.6));
        assert_eq!(painted[60].cell, Cell::new(0, 60));
    }

    #[test]
    fn single_visit_uses_start_color() {
        let visited = vec![Cell::new(3, 3)];
        let path = CellPath::new(visited.clone());
        let style = AnimationStyle::default();
        let mut animation = Animation::new(&visited, &path, &style);
        assert_eq!(
            animation.advance(),
            Some(Frame::Visit(vec![PaintedCell {
                cell: Cell::new(3, 3),
                color: style.start_color,
            }]))
        );
        assert_eq!(animation.advance(), None);
        assert_eq!(animation.status(), Status::Success);
    }

    #[test]
    fn path_segments_follow_visits() {
        let visited = row_cells(4);
        let path = CellPath::new(row_cells(3));
        let style = AnimationStyle::default();
        let frames: Vec<Frame> = Animation::new(&visited, &path, &style).collect();
        assert_eq!(frames.len(), 3);
        assert!(matches!(frames[0], Frame::Visit(_)));
        assert_eq!(
            frames[1],
            Frame::Segment(Segment {
                from: Cell::new(0, 0),
                to: Cell::new(0, 1),
                color: style.path_color,
                width: style.path_width,
            })
        );
        assert!(matches!(frames[2], Frame::Segment(s) if s.to == Cell::new(0, 2)));
    }

    #[test]
    fn empty_path_skips_path_phase_and_fails() {
        let visited = row_cells(7);
        let path = CellPath::default();
        let style = AnimationStyle::default();
        let mut animation = Animation::new(&visited, &path, &style);
        assert_eq!(animation.status(), Status::Waiting);
        assert!(animation.has_next());
        assert!(matches!(animation.advance(), Some(Frame::Visit(_))));
        assert!(!animation.has_next());
        assert_eq!(animation.advance(), None);
        assert_eq!(animation.status(), Status::Failure);
    }

    #[test]
    fn frame_count_matches_emitted() {
        let visited = row_cells(233);
        let path = CellPath::new(row_cells(17));
        let style = AnimationStyle::default();
        let mut animation = Animation::new(&visited, &path, &style);
        assert_eq!(animation.frame_count(), 5 + 16);
        let mut n = 0;
        while animation.has_next() {
            assert!(animation.advance().is_some());
            n += 1;
        }
        assert_eq!(n, animation.frame_count());
        assert_eq!(animation.frames_emitted(), n);
        assert_eq!(animation.status(), Status::Success);
    }

    #[test]
    fn restart_replays_identical_frames() {
        let visited = row_cells(75);
        let path = CellPath::new(row_cells(5));
        let style = AnimationStyle::default();
        let mut animation = Animation::new(&visited, &path, &style);
        let first: Vec<Frame> = animation.by_ref().collect();
        assert_eq!(animation.advance(), None);
        animation.restart();
        assert_eq!(animation.frames_emitted(), 0);
        let second: Vec<Frame> = animation.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn resumes_mid_sequence() {
        let visited = row_cells(150);
        let path = CellPath::default();
        let style = AnimationStyle {
            chunk_size: 60,
            ..AnimationStyle::default()
        };
        let mut animation = Animation::new(&visited, &path, &style);
        let _ = animation.advance();
        let rest: Vec<Frame> = animation.clone().collect();
        assert_eq!(rest.len(), 2);
        assert!(matches!(&rest[0], Frame::Visit(cells) if cells[0].cell == Cell::new(0, 60)));
    }

    #[test]
    fn nothing_to_animate() {
        let path = CellPath::default();
        let style = AnimationStyle::default();
        let mut animation = Animation::new(&[], &path, &style);
        assert!(!animation.has_next());
        assert_eq!(animation.advance(), None);
        assert_eq!(animation.frame_count(), 0);
        assert_eq!(animation.status(), Status::Failure);
    }
}
