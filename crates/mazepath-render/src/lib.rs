//! mazepath-render: draws animation frames onto raster canvases.
//!
//! A [`Canvas`] owns two layers of the same size:
//!
//! - the **display** layer, the downscaled photo the user clicked on,
//!   onto which the solution path is stroked with `tiny-skia`;
//! - the **maze** layer, the extracted grid rendered white-on-black,
//!   onto which visited cells are painted pixel by pixel.
//!
//! Frames are applied in order and snapshots can be taken between any
//! two frames.

use image::{Rgba, RgbaImage};
use mazepath_pipeline::{Animation, Dimensions, Frame, PaintedCell, Segment, Status};
use tiny_skia::{IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Errors from building a canvas.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// One of the layers has no pixels.
    #[error("canvas layers must not be empty, got {width}x{height}")]
    Empty {
        /// Width of the empty layer.
        width: u32,
        /// Height of the empty layer.
        height: u32,
    },

    /// The two layers differ in size.
    #[error(
        "display is {}x{} but maze is {}x{}",
        .display.width, .display.height, .maze.width, .maze.height
    )]
    SizeMismatch {
        /// Display layer size.
        display: Dimensions,
        /// Maze layer size.
        maze: Dimensions,
    },
}

/// Owned pair of drawing layers.
#[derive(Debug, Clone)]
pub struct Canvas {
    display: Pixmap,
    maze: RgbaImage,
}

impl Canvas {
    /// Build a canvas from copies of the display and maze images.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Empty`] if either image has no pixels and
    /// [`RenderError::SizeMismatch`] if their sizes differ.
    pub fn new(display: &RgbaImage, maze: &RgbaImage) -> Result<Self, RenderError> {
        for layer in [display, maze] {
            if layer.width() == 0 || layer.height() == 0 {
                return Err(RenderError::Empty {
                    width: layer.width(),
                    height: layer.height(),
                });
            }
        }
        if display.dimensions() != maze.dimensions() {
            return Err(RenderError::SizeMismatch {
                display: dimensions_of(display),
                maze: dimensions_of(maze),
            });
        }

        let size = IntSize::from_wh(display.width(), display.height()).ok_or(RenderError::Empty {
            width: display.width(),
            height: display.height(),
        })?;
        let pixmap = Pixmap::from_vec(premultiply(display), size).ok_or(RenderError::Empty {
            width: display.width(),
            height: display.height(),
        })?;

        log::debug!("canvas {}x{}", display.width(), display.height());
        Ok(Self {
            display: pixmap,
            maze: maze.clone(),
        })
    }

    /// Size of both layers.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.maze.width(),
            height: self.maze.height(),
        }
    }

    /// Draw one frame.
    pub fn apply(&mut self, frame: &Frame) {
        match frame {
            Frame::Visit(cells) => self.paint_cells(cells),
            Frame::Segment(segment) => self.stroke_segment(segment),
        }
    }

    fn paint_cells(&mut self, cells: &[PaintedCell]) {
        for painted in cells {
            let (x, y) = painted.cell.xy();
            if x < self.maze.width() && y < self.maze.height() {
                self.maze.put_pixel(x, y, painted.color.to_rgba());
            }
        }
    }

    /// Stroke between pixel centres with round caps and joins.
    #[allow(clippy::cast_precision_loss)]
    fn stroke_segment(&mut self, segment: &Segment) {
        let (x0, y0) = segment.from.xy();
        let (x1, y1) = segment.to.xy();
        let mut pb = PathBuilder::new();
        pb.move_to(x0 as f32 + 0.5, y0 as f32 + 0.5);
        pb.line_to(x1 as f32 + 0.5, y1 as f32 + 0.5);
        let Some(path) = pb.finish() else {
            return;
        };

        let stroke = Stroke {
            width: segment.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let [r, g, b] = segment.color.0;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, 255);
        paint.anti_alias = false;

        self.display
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Snapshot of the display layer.
    #[must_use]
    pub fn display(&self) -> RgbaImage {
        let (width, height) = (self.display.width(), self.display.height());
        let mut img = RgbaImage::new(width, height);
        for (pixel, px) in img.pixels_mut().zip(self.display.data().chunks_exact(4)) {
            *pixel = unpremultiply([px[0], px[1], px[2], px[3]]);
        }
        img
    }

    /// The maze layer.
    #[must_use]
    pub const fn maze(&self) -> &RgbaImage {
        &self.maze
    }

    /// Display and maze layers next to each other, display on the left.
    #[must_use]
    pub fn side_by_side(&self) -> RgbaImage {
        let display = self.display();
        let (width, height) = display.dimensions();
        let mut out = RgbaImage::new(width * 2, height);
        image::imageops::replace(&mut out, &display, 0, 0);
        image::imageops::replace(&mut out, &self.maze, i64::from(width), 0);
        out
    }

    /// Apply every remaining frame of `animation`, calling `on_frame`
    /// after each one with the updated canvas.
    ///
    /// Returns the animation's final status.
    pub fn play<F>(&mut self, animation: &mut Animation<'_>, mut on_frame: F) -> Status
    where
        F: FnMut(&Self, &Frame),
    {
        while let Some(frame) = animation.advance() {
            self.apply(&frame);
            on_frame(self, &frame);
        }
        animation.status()
    }
}

fn dimensions_of(image: &RgbaImage) -> Dimensions {
    Dimensions {
        width: image.width(),
        height: image.height(),
    }
}

/// Straight RGBA bytes to premultiplied, as `tiny-skia` stores them.
#[allow(clippy::cast_possible_truncation)]
fn premultiply(image: &RgbaImage) -> Vec<u8> {
    image
        .pixels()
        .flat_map(|p| {
            let [r, g, b, a] = p.0;
            let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
            [scale(r), scale(g), scale(b), a]
        })
        .collect()
}

/// Premultiplied to straight RGBA.
#[allow(clippy::cast_possible_truncation)]
fn unpremultiply([r, g, b, a]: [u8; 4]) -> Rgba<u8> {
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let scale = |c: u8| (u16::from(c) * 255 / u16::from(a)).min(255) as u8;
    Rgba([scale(r), scale(g), scale(b), a])
}
