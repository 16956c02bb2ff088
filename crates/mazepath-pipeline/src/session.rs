//! Owned state for one interactive solving session.
//!
//! [`MazeSession`] is what a shell (CLI, window, web page) talks to. It
//! holds the loaded image, the working grid, the picked endpoints and the
//! stage timings, and enforces the lifecycle between them:
//!
//! - `load` replaces everything and clears the points.
//! - Points are set in order, start then end, and drawn as markers.
//! - `skeletonize` always thins the grid as extracted, so it can be
//!   repeated after a reset.
//! - `solve` needs an image and both points; otherwise it does nothing.
//!
//! Operations attempted before any image is loaded return `None` and
//! change nothing.

use std::time::Duration;

use image::DynamicImage;
use web_time::Instant;

use crate::animation::Animation;
use crate::diagnostics::{PipelineDiagnostics, StageDiagnostics, StageMetrics};
use crate::extract::Extraction;
use crate::search::SearchResult;
use crate::types::{
    AnimationStyle, Cell, CellPath, Dimensions, Grid, PipelineConfig, PipelineError, RgbaImage,
    Rgb, Status,
};

/// Snapshots handed back after a load or reset.
#[derive(Debug, Clone)]
pub struct LoadedView {
    /// Downscaled color image, without markers.
    pub display: RgbaImage,
    /// The extracted grid rendered white-on-black.
    pub maze: RgbaImage,
    /// Size of both images.
    pub dimensions: Dimensions,
}

/// Result of one [`MazeSession::solve`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Path from `start` to `end`; empty when none exists.
    pub path: CellPath,
    /// Cells in discovery order.
    pub visited: Vec<Cell>,
    /// Start after snapping.
    pub start: Cell,
    /// End after snapping.
    pub end: Cell,
    /// Time spent snapping and searching.
    pub elapsed: Duration,
    /// `Success` if a path was found, `Failure` otherwise.
    pub status: Status,
}

impl Solution {
    /// Frames animating this solution.
    #[must_use]
    pub fn animation<'a>(&'a self, style: &AnimationStyle) -> Animation<'a> {
        Animation::new(&self.visited, &self.path, style)
    }
}

#[derive(Debug, Clone)]
struct Loaded {
    extraction: Extraction,
    display: RgbaImage,
    grid: Grid,
    start: Option<Cell>,
    end: Option<Cell>,
    skeleton_time: Duration,
    solve_time: Duration,
    diagnostics: PipelineDiagnostics,
}

impl Loaded {
    fn view(&self) -> LoadedView {
        LoadedView {
            display: self.extraction.display.clone(),
            maze: self.extraction.grid.to_rgba(),
            dimensions: self.extraction.grid.dimensions(),
        }
    }

    fn clear_points(&mut self) {
        self.start = None;
        self.end = None;
        self.display.clone_from(&self.extraction.display);
    }

    fn draw_marker(&mut self, cell: Cell, color: Rgb, radius: u32) {
        let (x, y) = cell.xy();
        let to_i32 = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        imageproc::drawing::draw_filled_circle_mut(
            &mut self.display,
            (to_i32(x), to_i32(y)),
            to_i32(radius),
            color.to_rgba(),
        );
    }
}

/// Single owner of all mutable solving state.
#[derive(Debug, Clone, Default)]
pub struct MazeSession {
    config: PipelineConfig,
    loaded: Option<Loaded>,
}

impl MazeSession {
    /// Create an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the configuration
    /// fails validation.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            loaded: None,
        })
    }

    /// Extract a grid from a decoded image and make it the active one.
    ///
    /// Replaces any previous image, clears both points and all timings.
    pub fn load(&mut self, image: &DynamicImage) -> LoadedView {
        let started = Instant::now();
        let extraction = crate::extract::extract(image, &self.config);
        let elapsed = started.elapsed();
        log::debug!("extraction took {elapsed:?}");

        let loaded = Loaded {
            display: extraction.display.clone(),
            grid: extraction.grid.clone(),
            start: None,
            end: None,
            skeleton_time: Duration::ZERO,
            solve_time: Duration::ZERO,
            diagnostics: PipelineDiagnostics::from_extraction(&extraction, elapsed),
            extraction,
        };
        let view = loaded.view();
        self.loaded = Some(loaded);
        view
    }

    /// Decode image bytes and [`load`](Self::load) the result.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] or
    /// [`PipelineError::ImageDecode`]; the session is left exactly as it
    /// was.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<LoadedView, PipelineError> {
        let image = crate::grayscale::decode(bytes)?;
        Ok(self.load(&image))
    }

    /// Start picking points: clears both points and their markers.
    pub fn begin_point_selection(&mut self) {
        self.reset_points();
    }

    /// Set the next endpoint at screen coordinates `(x, y)`.
    ///
    /// The first call sets the start and the second the end; each draws a
    /// filled marker on the display image, which is returned. Returns
    /// `None` without effect when nothing is loaded, the coordinate is
    /// outside the image, or both points are already set.
    pub fn set_point(&mut self, x: u32, y: u32) -> Option<&RgbaImage> {
        let radius = self.config.style.marker_radius;
        let (start_color, end_color) = (self.config.style.start_color, self.config.style.end_color);
        let loaded = self.loaded.as_mut()?;
        let cell = Cell::from_xy(x, y);
        if !loaded.grid.contains(cell) {
            return None;
        }

        if loaded.start.is_none() {
            loaded.start = Some(cell);
            loaded.draw_marker(cell, start_color, radius);
            log::debug!("start set at ({x}, {y})");
        } else if loaded.end.is_none() {
            loaded.end = Some(cell);
            loaded.draw_marker(cell, end_color, radius);
            log::debug!("end set at ({x}, {y})");
        } else {
            return None;
        }
        Some(&loaded.display)
    }

    /// Clear start and end and their markers; the grid is unchanged.
    pub fn reset_points(&mut self) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.clear_points();
        }
    }

    /// Restore the display image, grid and points to their state right
    /// after load, and clear timings.
    pub fn reset(&mut self) -> Option<LoadedView> {
        let loaded = self.loaded.as_mut()?;
        loaded.clear_points();
        loaded.grid.clone_from(&loaded.extraction.grid);
        loaded.skeleton_time = Duration::ZERO;
        loaded.solve_time = Duration::ZERO;
        loaded.diagnostics.skeletonize = None;
        loaded.diagnostics.solve = None;
        Some(loaded.view())
    }

    /// Thin the extracted grid and make the result the working grid.
    pub fn skeletonize(&mut self) -> Option<(&Grid, Duration)> {
        let loaded = self.loaded.as_mut()?;
        let started = Instant::now();
        let thinning = crate::skeleton::thin(&loaded.extraction.grid);
        let elapsed = started.elapsed();

        log::debug!(
            "skeleton: {} -> {} cells in {elapsed:?}",
            loaded.extraction.grid.passable_count(),
            thinning.grid.passable_count(),
        );
        loaded.diagnostics.record_thinning(&thinning, elapsed);
        loaded.skeleton_time = elapsed;
        loaded.grid = thinning.grid;
        Some((&loaded.grid, elapsed))
    }

    /// Snap both points onto the working grid and search between them.
    ///
    /// Returns `None` when nothing is loaded or a point is missing.
    pub fn solve(&mut self) -> Option<Solution> {
        let snap_radius = self.config.snap_radius;
        let loaded = self.loaded.as_mut()?;
        let (requested_start, requested_end) = (loaded.start?, loaded.end?);

        let started = Instant::now();
        let start = snap_endpoint(&loaded.grid, requested_start, snap_radius, "start");
        let end = snap_endpoint(&loaded.grid, requested_end, snap_radius, "end");
        // An endpoint that failed to snap is still on a wall.
        let result = if loaded.grid.is_passable(start) && loaded.grid.is_passable(end) {
            crate::search::search(&loaded.grid, start, end)
        } else {
            SearchResult::default()
        };
        let elapsed = started.elapsed();

        let status = if result.found() {
            Status::Success
        } else {
            Status::Failure
        };
        log::info!(
            "solve {status:?}: {} cells visited, path of {} cells, {}",
            result.visited.len(),
            result.path.len(),
            format_seconds(elapsed),
        );

        loaded.solve_time = elapsed;
        loaded.diagnostics.solve = Some(StageDiagnostics {
            duration: elapsed,
            metrics: StageMetrics::Solve {
                requested_start,
                requested_end,
                start,
                end,
                visited_cells: result.visited.len(),
                path_cells: result.path.len(),
                status,
            },
        });

        Some(Solution {
            path: result.path,
            visited: result.visited,
            start,
            end,
            elapsed,
            status,
        })
    }

    /// Skeleton time plus the most recent solve time.
    #[must_use]
    pub fn total_time(&self) -> Duration {
        self.loaded
            .as_ref()
            .map_or(Duration::ZERO, |l| l.skeleton_time + l.solve_time)
    }

    /// Whether an image is loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Display image with any markers drawn.
    #[must_use]
    pub fn display_image(&self) -> Option<&RgbaImage> {
        self.loaded.as_ref().map(|l| &l.display)
    }

    /// The working grid (thinned once [`skeletonize`](Self::skeletonize)
    /// has run).
    #[must_use]
    pub fn grid(&self) -> Option<&Grid> {
        self.loaded.as_ref().map(|l| &l.grid)
    }

    /// The grid as extracted on load.
    #[must_use]
    pub fn extracted_grid(&self) -> Option<&Grid> {
        self.loaded.as_ref().map(|l| &l.extraction.grid)
    }

    /// Full extraction output of the active image.
    #[must_use]
    pub fn extraction(&self) -> Option<&Extraction> {
        self.loaded.as_ref().map(|l| &l.extraction)
    }

    /// Start point as picked (before snapping).
    #[must_use]
    pub fn start(&self) -> Option<Cell> {
        self.loaded.as_ref().and_then(|l| l.start)
    }

    /// End point as picked (before snapping).
    #[must_use]
    pub fn end(&self) -> Option<Cell> {
        self.loaded.as_ref().and_then(|l| l.end)
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Animation colors and sizes.
    #[must_use]
    pub const fn style(&self) -> &AnimationStyle {
        &self.config.style
    }

    /// Stage diagnostics for the active image.
    #[must_use]
    pub fn diagnostics(&self) -> Option<&PipelineDiagnostics> {
        self.loaded.as_ref().map(|l| &l.diagnostics)
    }
}

fn snap_endpoint(grid: &Grid, point: Cell, radius: u32, which: &str) -> Cell {
    if let Some(cell) = crate::snap::try_snap(grid, point, radius) {
        if cell != point {
            log::debug!("{which} snapped from {:?} to {:?}", point.xy(), cell.xy());
        }
        cell
    } else {
        let (x, y) = point.xy();
        log::warn!("no passable cell within {radius} of {which} ({x}, {y}); it is unreachable");
        point
    }
}

/// Render a duration as seconds with four decimals, e.g. `"0.0123 s"`.
#[must_use]
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.4} s", duration.as_secs_f64())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Black walls with a white 3-pixel corridor shaped like a `U`.
    fn u_maze() -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_fn(40, 40, |x, y| {
            let left = (8..11).contains(&x) && (8..32).contains(&y);
            let right = (29..32).contains(&x) && (8..32).contains(&y);
            let bottom = (8..32).contains(&x) && (29..32).contains(&y);
            let inside = (4..36).contains(&x) && (4..36).contains(&y);
            if inside && (left || right || bottom) {
                image::Rgb([255, 255, 255])
            } else if inside {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        }))
    }

    fn loaded_session() -> MazeSession {
        let mut session = MazeSession::new(PipelineConfig::default()).unwrap();
        session.load(&u_maze());
        session
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PipelineConfig {
            max_dimension: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            MazeSession::new(config),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn operations_before_load_are_noops() {
        let mut session = MazeSession::default();
        assert!(session.set_point(1, 1).is_none());
        assert!(session.skeletonize().is_none());
        assert!(session.solve().is_none());
        assert!(session.reset().is_none());
        session.reset_points();
        session.begin_point_selection();
        assert!(!session.is_loaded());
        assert_eq!(session.total_time(), Duration::ZERO);
    }

    #[test]
    fn points_are_set_in_order_then_ignored() {
        let mut session = loaded_session();
        assert!(session.set_point(9, 10).is_some());
        assert_eq!(session.start(), Some(Cell::new(10, 9)));
        assert_eq!(session.end(), None);
        assert!(session.set_point(30, 10).is_some());
        assert_eq!(session.end(), Some(Cell::new(10, 30)));
        assert!(session.set_point(20, 20).is_none());
        assert_eq!(session.end(), Some(Cell::new(10, 30)));
    }

    #[test]
    fn out_of_image_point_is_ignored() {
        let mut session = loaded_session();
        assert!(session.set_point(40, 5).is_none());
        assert!(session.set_point(5, 400).is_none());
        assert_eq!(session.start(), None);
    }

    #[test]
    fn markers_are_drawn_and_cleared() {
        let mut session = loaded_session();
        let style = session.style().clone();
        let display = session.set_point(20, 20).unwrap();
        assert_eq!(*display.get_pixel(20, 20), style.start_color.to_rgba());
        assert_eq!(*display.get_pixel(24, 20), style.start_color.to_rgba());
        session.set_point(2, 2);
        assert_eq!(
            *session.display_image().unwrap().get_pixel(2, 2),
            style.end_color.to_rgba()
        );

        session.reset_points();
        assert_eq!(session.start(), None);
        let pristine = &session.extraction().unwrap().display;
        assert_eq!(session.display_image().unwrap(), pristine);
    }

    #[test]
    fn solve_needs_both_points() {
        let mut session = loaded_session();
        assert!(session.solve().is_none());
        session.set_point(9, 10);
        assert!(session.solve().is_none());
    }

    #[test]
    fn solves_around_the_u() {
        let mut session = loaded_session();
        session.set_point(9, 9);
        session.set_point(30, 9);
        let solution = session.solve().unwrap();
        assert_eq!(solution.status, Status::Success);
        assert_eq!(solution.path.first(), Some(&solution.start));
        assert_eq!(solution.path.last(), Some(&solution.end));
        for (a, b) in solution.path.segments() {
            assert!(a.is_adjacent(b));
        }
        // The corridor goes down and around, so the path is far longer
        // than the straight-line gap.
        assert!(solution.path.hops() > 40);
        assert!(session.diagnostics().unwrap().solve.is_some());
        assert_eq!(session.total_time(), solution.elapsed);
    }

    #[test]
    fn blocked_points_are_snapped() {
        let mut session = loaded_session();
        // (20, 15) is wall between the arms; the nearest corridor cell is
        // in one of them.
        session.set_point(20, 15);
        session.set_point(20, 30);
        let solution = session.solve().unwrap();
        let grid = session.grid().unwrap();
        assert!(grid.is_passable(solution.start));
        assert!(grid.is_passable(solution.end));
        assert_eq!(solution.status, Status::Success);
    }

    #[test]
    fn endpoints_on_walls_fail_without_a_path() {
        let mut session = MazeSession::default();
        session.load(&DynamicImage::ImageRgb8(image::RgbImage::new(1, 1)));
        assert_eq!(session.grid().unwrap().passable_count(), 0);
        session.set_point(0, 0);
        session.set_point(0, 0);
        let solution = session.solve().unwrap();
        assert_eq!(solution.status, Status::Failure);
        assert!(solution.path.is_empty());
        assert!(solution.visited.is_empty());
    }

    #[test]
    fn one_unsnappable_endpoint_fails() {
        let config = PipelineConfig {
            snap_radius: 2,
            ..PipelineConfig::default()
        };
        let mut session = MazeSession::new(config).unwrap();
        session.load(&u_maze());
        session.set_point(9, 9);
        // Wall between the arms, more than two cells from any corridor.
        session.set_point(20, 20);
        let solution = session.solve().unwrap();
        assert_eq!(solution.end, Cell::new(20, 20));
        assert_eq!(solution.status, Status::Failure);
        assert!(solution.path.is_empty());
    }

    #[test]
    fn skeletonize_thins_and_is_repeatable() {
        let mut session = loaded_session();
        let extracted = session.extracted_grid().unwrap().passable_count();
        let (grid, _) = session.skeletonize().unwrap();
        let first = grid.clone();
        assert!(first.passable_count() < extracted);
        let (again, _) = session.skeletonize().unwrap();
        assert_eq!(*again, first);
        assert!(session.diagnostics().unwrap().skeletonize.is_some());
    }

    #[test]
    fn reset_restores_post_load_state() {
        let mut session = loaded_session();
        let extracted = session.extracted_grid().unwrap().clone();
        session.skeletonize();
        session.set_point(9, 9);
        session.set_point(30, 9);
        session.solve();

        let view = session.reset().unwrap();
        assert_eq!(session.grid().unwrap(), &extracted);
        assert_eq!(session.start(), None);
        assert_eq!(session.end(), None);
        assert_eq!(session.total_time(), Duration::ZERO);
        assert_eq!(session.display_image().unwrap(), &view.display);
        assert_eq!(view.maze, extracted.to_rgba());
        assert!(session.diagnostics().unwrap().solve.is_none());
    }

    #[test]
    fn failed_load_keeps_previous_state() {
        let mut session = loaded_session();
        session.set_point(9, 9);
        let before = session.grid().unwrap().clone();
        assert!(matches!(
            session.load_bytes(&[]),
            Err(PipelineError::EmptyInput)
        ));
        assert!(matches!(
            session.load_bytes(b"not an image"),
            Err(PipelineError::ImageDecode(_))
        ));
        assert_eq!(session.grid().unwrap(), &before);
        assert_eq!(session.start(), Some(Cell::new(9, 9)));
    }

    #[test]
    fn load_clears_points() {
        let mut session = loaded_session();
        session.set_point(9, 9);
        session.load(&u_maze());
        assert_eq!(session.start(), None);
    }

    #[test]
    fn format_uses_four_decimals() {
        assert_eq!(format_seconds(Duration::from_millis(1234)), "1.2340 s");
        assert_eq!(format_seconds(Duration::ZERO), "0.0000 s");
    }
}
