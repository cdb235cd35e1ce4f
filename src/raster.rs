//! Software rasterizer for offline previews
//!
//! Paints the particle field into an [`RgbaImage`] with simple coverage-based
//! antialiasing: each pixel's coverage is estimated from the distance between
//! the pixel center and the shape edge, then composited "source over".

use image::{Rgba, RgbaImage};

use crate::color::effective_alpha;
use crate::models::{Point, SurfaceDimensions};
use crate::surface::Surface;

/// Surface backed by an RGBA image.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl RasterSurface {
    /// Create a surface cleared to `background`.
    pub fn new(dims: SurfaceDimensions, background: Rgba<u8>) -> Self {
        let image = RgbaImage::from_pixel(dims.width, dims.height, background);
        Self { image, background }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Composite `color` at `alpha` over the pixel at (x, y).
    fn blend(&mut self, x: u32, y: u32, color: Rgba<u8>, alpha: f64) {
        if alpha <= 0.0 {
            return;
        }
        let dst = *self.image.get_pixel(x, y);
        self.image.put_pixel(x, y, source_over(color, dst, alpha));
    }

    /// Pixel rectangle covering `[min, max]`, clipped to the image.
    fn clip(&self, min: Point, max: Point) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return None;
        }
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(w as f64 - 1.0);
        let y1 = max.y.ceil().min(h as f64 - 1.0);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl Surface for RasterSurface {
    fn dimensions(&self) -> SurfaceDimensions {
        let (width, height) = self.image.dimensions();
        SurfaceDimensions::new(width, height)
    }

    fn resize(&mut self, dims: SurfaceDimensions) {
        self.image = RgbaImage::from_pixel(dims.width, dims.height, self.background);
    }

    fn clear(&mut self) {
        let background = self.background;
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba<u8>, opacity: f64) {
        let alpha = effective_alpha(color, opacity);
        let reach = radius + 0.5;
        let Some((x0, y0, x1, y1)) = self.clip(
            Point::new(center.x - reach, center.y - reach),
            Point::new(center.x + reach, center.y + reach),
        ) else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let pixel_center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (reach - pixel_center.distance(&center)).clamp(0.0, 1.0);
                self.blend(x, y, color, alpha * coverage);
            }
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba<u8>, opacity: f64, width: f64) {
        let alpha = effective_alpha(color, opacity);
        let reach = width / 2.0 + 0.5;
        let Some((x0, y0, x1, y1)) = self.clip(
            Point::new(from.x.min(to.x) - reach, from.y.min(to.y) - reach),
            Point::new(from.x.max(to.x) + reach, from.y.max(to.y) + reach),
        ) else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let pixel_center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let d = distance_to_segment(pixel_center, from, to);
                // Thin strokes never reach full coverage
                let coverage = (reach - d).clamp(0.0, 1.0).min(width);
                self.blend(x, y, color, alpha * coverage);
            }
        }
    }
}

/// Shortest distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(&Point::new(a.x + t * dx, a.y + t * dy))
}

/// Porter-Duff "source over" of `src` at `src_alpha` onto `dst`.
fn source_over(src: Rgba<u8>, dst: Rgba<u8>, src_alpha: f64) -> Rgba<u8> {
    let src_alpha = src_alpha.clamp(0.0, 1.0);
    let dst_alpha = dst[3] as f64 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| -> u8 {
        let s = src[i] as f64 / 255.0;
        let d = dst[i] as f64 / 255.0;
        let out = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (out.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([channel(0), channel(1), channel(2), (out_alpha * 255.0).round() as u8])
}
