//! Shared types for the mazepath pipeline.

use serde::{Deserialize, Serialize};

use crate::downsample::DownsampleFilter;
use crate::threshold::ThresholdMethod;

/// Re-export `GrayImage` so downstream crates can reference
/// intermediate raster data without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbaImage` so downstream crates can reference the
/// display image without depending on `image` directly.
pub use image::RgbaImage;

/// A grid cell addressed by row and column.
///
/// Screen coordinates are `(x, y) = (col, row)`; use [`Cell::from_xy`]
/// and [`Cell::xy`] at the boundary with anything pixel-oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Row index (pixels from the top edge).
    pub row: u32,
    /// Column index (pixels from the left edge).
    pub col: u32,
}

impl Cell {
    /// Create a cell from row and column.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Create a cell from screen coordinates.
    #[must_use]
    pub const fn from_xy(x: u32, y: u32) -> Self {
        Self { row: y, col: x }
    }

    /// Screen coordinates `(x, y)` of this cell.
    #[must_use]
    pub const fn xy(self) -> (u32, u32) {
        (self.col, self.row)
    }

    /// Squared Euclidean distance to another cell.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> u64 {
        let dr = u64::from(self.row.abs_diff(other.row));
        let dc = u64::from(self.col.abs_diff(other.col));
        dr * dr + dc * dc
    }

    /// The cell displaced by `(drow, dcol)`, if it lies inside a
    /// `width` x `height` grid.
    #[must_use]
    pub fn offset(self, drow: i32, dcol: i32, width: u32, height: u32) -> Option<Self> {
        let row = self.row.checked_add_signed(drow)?;
        let col = self.col.checked_add_signed(dcol)?;
        (row < height && col < width).then_some(Self { row, col })
    }

    /// Whether `other` is one of the 8 neighbors of this cell.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr <= 1 && dc <= 1 && (dr | dc) != 0
    }
}

/// Inclusive bounding box of maze content, in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Leftmost column.
    pub left: u32,
    /// Rightmost column.
    pub right: u32,
    /// Topmost row.
    pub top: u32,
    /// Bottommost row.
    pub bottom: u32,
}

impl Bounds {
    /// Whether a cell lies inside the box.
    #[must_use]
    pub const fn contains(self, cell: Cell) -> bool {
        cell.col >= self.left
            && cell.col <= self.right
            && cell.row >= self.top
            && cell.row <= self.bottom
    }
}

/// Binary traversability grid, row-major, `true` = passable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl Grid {
    /// A fully blocked grid.
    #[must_use]
    pub fn blocked(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Build a grid by evaluating `f(cell)` for every cell.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(Cell) -> bool) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for col in 0..width {
                cells.push(f(Cell::new(row, col)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Parse an ASCII picture: `.` is passable, anything else blocked.
    ///
    /// Rows are separated by newlines; blank lines and surrounding
    /// whitespace are ignored. Short rows are padded with blocked cells.
    #[must_use]
    pub fn from_ascii(picture: &str) -> Self {
        let rows: Vec<&str> = picture
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        #[allow(clippy::cast_possible_truncation)]
        let (w, h) = (width as u32, rows.len() as u32);
        Self::from_fn(w, h, |cell| {
            rows[cell.row as usize].chars().nth(cell.col as usize) == Some('.')
        })
    }

    /// Opaque RGBA rendering used as the maze display layer.
    #[must_use]
    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let v = if self.is_passable(Cell::from_xy(x, y)) {
                255
            } else {
                0
            };
            image::Rgba([v, v, v, 255])
        })
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// Whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Row-major index of an in-range cell.
    #[must_use]
    pub(crate) const fn index(&self, cell: Cell) -> usize {
        cell.row as usize * self.width as usize + cell.col as usize
    }

    /// Cell at a row-major index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn cell_at(&self, index: usize) -> Cell {
        let w = self.width as usize;
        Cell::new((index / w) as u32, (index % w) as u32)
    }

    /// Whether the cell is inside the grid and passable.
    #[must_use]
    pub fn is_passable(&self, cell: Cell) -> bool {
        self.contains(cell) && self.cells[self.index(cell)]
    }

    /// Set a cell's passability. Out-of-range cells are ignored.
    pub fn set(&mut self, cell: Cell, passable: bool) {
        if self.contains(cell) {
            let i = self.index(cell);
            self.cells[i] = passable;
        }
    }

    /// Number of passable cells.
    #[must_use]
    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Iterate over all passable cells in row-major order.
    pub fn passable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c)
            .map(|(i, _)| self.cell_at(i))
    }
}

/// Ordered sequence of cells from start to end; empty means no path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPath(Vec<Cell>);

impl CellPath {
    /// Create a path from a vector of cells.
    #[must_use]
    pub const fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    /// Returns `true` if no path was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of cells on the path.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of moves (edges) along the path.
    #[must_use]
    pub const fn hops(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// The first cell, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Cell> {
        self.0.first()
    }

    /// The last cell, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Cell> {
        self.0.last()
    }

    /// All cells as a slice.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Consecutive cell pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// As an opaque `image` pixel.
    #[must_use]
    pub const fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.0[0], self.0[1], self.0[2], 255])
    }
}

/// Outcome signal shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    /// Nothing solved yet, or an animation still in progress.
    #[default]
    Waiting,
    /// A path was found.
    Success,
    /// The search exhausted its frontier without reaching the end.
    Failure,
}

/// Colors and sizes used when animating a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationStyle {
    /// Visited cells painted per frame.
    pub chunk_size: usize,
    /// Color of the first visited cell and the start marker.
    pub start_color: Rgb,
    /// Color of the last visited cell and the end marker.
    pub end_color: Rgb,
    /// Stroke color of the solution path.
    pub path_color: Rgb,
    /// Stroke width of the solution path in pixels.
    pub path_width: f32,
    /// Radius of the start/end markers in pixels.
    pub marker_radius: u32,
}

impl AnimationStyle {
    /// Default number of visited cells per frame.
    pub const DEFAULT_CHUNK_SIZE: usize = 50;
    /// Default gradient start color.
    pub const DEFAULT_START_COLOR: Rgb = Rgb::new(107, 154, 205);
    /// Default gradient end color.
    pub const DEFAULT_END_COLOR: Rgb = Rgb::new(174, 205, 107);
    /// Default path color (`#009900`).
    pub const DEFAULT_PATH_COLOR: Rgb = Rgb::new(0, 0x99, 0);
    /// Default path stroke width.
    pub const DEFAULT_PATH_WIDTH: f32 = 5.0;
    /// Default marker radius.
    pub const DEFAULT_MARKER_RADIUS: u32 = 5;
}

impl Default for AnimationStyle {
    fn default() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            start_color: Self::DEFAULT_START_COLOR,
            end_color: Self::DEFAULT_END_COLOR,
            path_color: Self::DEFAULT_PATH_COLOR,
            path_width: Self::DEFAULT_PATH_WIDTH,
            marker_radius: Self::DEFAULT_MARKER_RADIUS,
        }
    }
}

/// Configuration for extraction, snapping, and animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Longest allowed image side after downscaling.
    pub max_dimension: u32,

    /// Resampling filter used when downscaling.
    pub downsample_filter: DownsampleFilter,

    /// Median filter radius; 1 means a 3x3 kernel. 0 disables both passes.
    pub median_radius: u32,

    /// How the grayscale image is split into walls and passages.
    pub threshold: ThresholdMethod,

    /// Half-width of the window searched when snapping a point.
    pub snap_radius: u32,

    /// Animation colors and sizes.
    pub style: AnimationStyle,
}

impl PipelineConfig {
    /// Default downscale cap.
    pub const DEFAULT_MAX_DIMENSION: u32 = 512;
    /// Default downscale filter.
    pub const DEFAULT_DOWNSAMPLE_FILTER: DownsampleFilter = DownsampleFilter::Lanczos3;
    /// Default median radius.
    pub const DEFAULT_MEDIAN_RADIUS: u32 = 1;
    /// Default snap search half-width.
    pub const DEFAULT_SNAP_RADIUS: u32 = 200;

    /// Check the configuration for values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] describing the first
    /// offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_dimension == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_dimension must be positive".to_string(),
            ));
        }
        if let ThresholdMethod::MeanRatio { ratio } = self.threshold
            && !(ratio.is_finite() && ratio > 0.0)
        {
            return Err(PipelineError::InvalidConfig(format!(
                "mean threshold ratio must be finite and positive, got {ratio}"
            )));
        }
        if self.style.chunk_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "chunk_size must be positive".to_string(),
            ));
        }
        if !(self.style.path_width.is_finite() && self.style.path_width > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "path_width must be finite and positive, got {}",
                self.style.path_width
            )));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_dimension: Self::DEFAULT_MAX_DIMENSION,
            downsample_filter: Self::DEFAULT_DOWNSAMPLE_FILTER,
            median_radius: Self::DEFAULT_MEDIAN_RADIUS,
            threshold: ThresholdMethod::default(),
            snap_radius: Self::DEFAULT_SNAP_RADIUS,
            style: AnimationStyle::default(),
        }
    }
}

/// Errors that can occur while loading or configuring the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}
