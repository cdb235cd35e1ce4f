//! Drawing surface abstraction
//!
//! The frame cycle only needs four primitives: resize, clear, filled circle
//! and stroked line. Each backend implements [`Surface`]:
//! - `CanvasSurface` (browser, `wasm` feature) over a 2D canvas context
//! - [`RasterSurface`](crate::raster::RasterSurface) over an RGBA image
//! - [`RecordingSurface`] which keeps the draw calls for inspection

use image::Rgba;

use crate::models::{Point, SurfaceDimensions};

/// A 2D target the particle field draws onto.
pub trait Surface {
    /// Current drawable size.
    fn dimensions(&self) -> SurfaceDimensions;

    /// Change the drawable size. Contents may be discarded.
    fn resize(&mut self, dims: SurfaceDimensions);

    /// Erase the entire drawable area.
    fn clear(&mut self);

    /// Fill a circle with `color` at `opacity`.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba<u8>, opacity: f64);

    /// Stroke a straight line with `color` at `opacity`.
    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba<u8>, opacity: f64, width: f64);
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize(SurfaceDimensions),
    Clear,
    Circle { center: Point, radius: f64, color: Rgba<u8>, opacity: f64 },
    Line { from: Point, to: Point, color: Rgba<u8>, opacity: f64, width: f64 },
}

/// Surface that stores every draw call instead of producing pixels.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    dims: SurfaceDimensions,
    commands: Vec<DrawCommand>,
    discard: bool,
}

impl RecordingSurface {
    pub fn new(dims: SurfaceDimensions) -> Self {
        Self { dims, commands: Vec::new(), discard: false }
    }

    /// A surface that tracks its size but keeps no commands, for runs where
    /// only [`FrameStats`](crate::field::FrameStats) matter.
    pub fn discarding(dims: SurfaceDimensions) -> Self {
        Self { dims, commands: Vec::new(), discard: true }
    }

    fn record(&mut self, command: DrawCommand) {
        if !self.discard {
            self.commands.push(command);
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands, keeping the size.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Lines drawn with the given stroke color.
    pub fn lines_with_color(&self, color: Rgba<u8>) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { color: lc, .. } if *lc == color))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn dimensions(&self) -> SurfaceDimensions {
        self.dims
    }

    fn resize(&mut self, dims: SurfaceDimensions) {
        self.dims = dims;
        self.record(DrawCommand::Resize(dims));
    }

    fn clear(&mut self) {
        self.record(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba<u8>, opacity: f64) {
        self.record(DrawCommand::Circle { center, radius, color, opacity });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba<u8>, opacity: f64, width: f64) {
        self.record(DrawCommand::Line { from, to, color, opacity, width });
    }
}
