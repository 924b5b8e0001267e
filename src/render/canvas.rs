//! CPU renderer over an immediate-mode 2D surface.

use super::style::{blend_over, glow_profile, GlowSample};
use super::{RenderError, RendererAdapter, SegmentStyle};
use crate::geometry::{Point, Projection};
use crate::paths::SegmentRun;
use image::RgbaImage;

/// Immediate-mode drawing surface.
///
/// Glow primitives accumulate coverage into a pending layer, taking the max
/// per pixel; [`Canvas2D::flush_layer`] composites the layer in one blend so
/// overlapping strokes of the same run do not stack.
pub trait Canvas2D {
    fn size(&self) -> (u32, u32);

    fn clear(&mut self);

    /// Tapered stroke from `from` to `to`, each given as (point, core radius).
    fn fill_glow_stroke(&mut self, from: (Point, f32), to: (Point, f32), glow_radius: f32);

    fn fill_glow_disc(&mut self, center: Point, radius: f32, glow_radius: f32) {
        self.fill_glow_stroke((center, radius), (center, radius), glow_radius);
    }

    /// Blend the pending layer: core pixels in `core_color`, halo in `glow_color`.
    fn flush_layer(&mut self, core_color: [f32; 3], glow_color: [f32; 3], alpha: f32);

    /// RGBA8 pixels, row-major.
    fn pixels(&self) -> &[u8];
}

/// Pixel-space bounds, inclusive-exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Bounds {
    fn union(self, other: Bounds) -> Bounds {
        Bounds {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Row-major offset of pixel (`x`, `y`), computed in `usize`.
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// [`Canvas2D`] backed by an in-memory RGBA image.
pub struct ImageCanvas {
    image: RgbaImage,
    layer: Vec<GlowSample>,
    dirty: Option<Bounds>,
}

impl ImageCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSurface { width, height });
        }
        let area = (width as usize)
            .checked_mul(height as usize)
            .filter(|area| area.checked_mul(4).is_some())
            .ok_or(RenderError::InvalidSurface { width, height })?;
        Ok(Self {
            image: RgbaImage::new(width, height),
            layer: vec![GlowSample::default(); area],
            dirty: None,
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel bounds touched by a stroke, clipped to the surface.
    fn stroke_bounds(&self, a: Point, b: Point, extent: f32) -> Option<Bounds> {
        let (w, h) = self.image.dimensions();
        let min_x = a[0].min(b[0]) - extent;
        let max_x = a[0].max(b[0]) + extent;
        let min_y = a[1].min(b[1]) - extent;
        let max_y = a[1].max(b[1]) + extent;
        if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
            return None;
        }
        if max_x < 0.0 || max_y < 0.0 || min_x >= w as f32 || min_y >= h as f32 {
            return None;
        }
        Some(Bounds {
            x0: min_x.floor().max(0.0) as u32,
            y0: min_y.floor().max(0.0) as u32,
            x1: (max_x.ceil() as u32).saturating_add(1).min(w),
            y1: (max_y.ceil() as u32).saturating_add(1).min(h),
        })
    }
}

impl Canvas2D for ImageCanvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self) {
        self.image.fill(0);
        self.layer.fill(GlowSample::default());
        self.dirty = None;
    }

    fn fill_glow_stroke(&mut self, from: (Point, f32), to: (Point, f32), glow_radius: f32) {
        let (a, ra) = from;
        let (b, rb) = to;
        let Some(bounds) = self.stroke_bounds(a, b, ra.max(rb) + glow_radius) else {
            return;
        };
        let width = self.image.width();
        let ba = [b[0] - a[0], b[1] - a[1]];
        let len2 = ba[0] * ba[0] + ba[1] * ba[1];

        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let p = [x as f32 + 0.5, y as f32 + 0.5];
                let pa = [p[0] - a[0], p[1] - a[1]];
                let h = if len2 > 1e-8 {
                    ((pa[0] * ba[0] + pa[1] * ba[1]) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dx = pa[0] - ba[0] * h;
                let dy = pa[1] - ba[1] * h;
                let sample = glow_profile((dx * dx + dy * dy).sqrt(), ra + (rb - ra) * h, glow_radius);
                if sample.alpha <= 0.0 {
                    continue;
                }
                let cell = &mut self.layer[pixel_index(width, x, y)];
                cell.alpha = cell.alpha.max(sample.alpha);
                cell.core |= sample.core;
            }
        }
        self.dirty = Some(self.dirty.map_or(bounds, |d| d.union(bounds)));
    }

    fn flush_layer(&mut self, core_color: [f32; 3], glow_color: [f32; 3], alpha: f32) {
        let Some(bounds) = self.dirty.take() else {
            return;
        };
        let width = self.image.width();
        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let cell = std::mem::take(&mut self.layer[pixel_index(width, x, y)]);
                let a = cell.alpha * alpha;
                if a <= 0.0 {
                    continue;
                }
                let color = if cell.core { core_color } else { glow_color };
                let pixel = self.image.get_pixel_mut(x, y);
                pixel.0 = blend_over(pixel.0, color, a);
            }
        }
    }

    fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Point-sampling renderer: each run becomes a chain of tapered strokes.
pub struct CanvasRenderer<C: Canvas2D = ImageCanvas> {
    canvas: C,
    released: bool,
}

impl<C: Canvas2D> CanvasRenderer<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            released: false,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    fn check_live(&self) -> Result<(), RenderError> {
        if self.released {
            Err(RenderError::Released)
        } else {
            Ok(())
        }
    }
}

impl<C: Canvas2D> RendererAdapter for CanvasRenderer<C> {
    fn projection(&self) -> Projection {
        Projection::Flat
    }

    fn size(&self) -> (u32, u32) {
        self.canvas.size()
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.check_live()?;
        self.canvas.clear();
        Ok(())
    }

    fn draw_segment(
        &mut self,
        run: &SegmentRun,
        style: &SegmentStyle,
        alpha: f32,
    ) -> Result<(), RenderError> {
        self.check_live()?;
        if run.is_empty() || alpha <= 0.0 {
            return Ok(());
        }
        match run.points.as_slice() {
            [only] => self.canvas.fill_glow_disc(
                only.position,
                style.radius_at(only.along),
                style.glow_radius,
            ),
            points => {
                for pair in points.windows(2) {
                    self.canvas.fill_glow_stroke(
                        (pair[0].position, style.radius_at(pair[0].along)),
                        (pair[1].position, style.radius_at(pair[1].along)),
                        style.glow_radius,
                    );
                }
            }
        }
        self.canvas
            .flush_layer(style.spark_color, style.glow_color, alpha.min(1.0));
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.check_live()
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.check_live()?;
        self.canvas.clear();
        Ok(())
    }

    fn pixels(&self) -> &[u8] {
        self.canvas.pixels()
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.canvas.clear();
        log::info!("Released canvas renderer");
    }

    fn is_released(&self) -> bool {
        self.released
    }
}
