//! Renderer adapters.
//!
//! Both backends implement [`RendererAdapter`] and share the styling math in
//! [`style`]:
//! - [`ShaderRenderer`]: wgpu fullscreen pass per segment run, perspective projection
//! - [`CanvasRenderer`]: CPU rasterisation onto a [`Canvas2D`] surface, flat projection
//!
//! [`Renderer`] is the tagged variant the driver holds.

mod canvas;
mod shader;
mod style;

pub use crate::timing::smoothstep;
pub use canvas::{Canvas2D, CanvasRenderer, ImageCanvas};
pub use shader::ShaderRenderer;
pub use style::{blend_over, glow_profile, GlowSample, SegmentStyle, GLOW_PEAK};

use crate::geometry::Projection;
use crate::gpu::GpuError;
use crate::paths::SegmentRun;

/// Errors that end a rendering session.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("Unsupported drawing surface {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },
    #[error("Renderer has already been released")]
    Released,
}

/// Drawing backend driven once per frame by the animation driver.
///
/// A frame is `begin_frame`, any number of `draw_segment` calls, then
/// `end_frame`. After `release` every drawing call fails with
/// [`RenderError::Released`]; `release` itself is idempotent.
pub trait RendererAdapter {
    /// Projection the geometry must be built with for this backend.
    fn projection(&self) -> Projection;

    fn size(&self) -> (u32, u32);

    /// Start a frame on a cleared surface.
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// Draw one tapered glow run at overall opacity `alpha`.
    fn draw_segment(
        &mut self,
        run: &SegmentRun,
        style: &SegmentStyle,
        alpha: f32,
    ) -> Result<(), RenderError>;

    fn end_frame(&mut self) -> Result<(), RenderError>;

    /// Clear the visible surface outside of a frame.
    fn clear(&mut self) -> Result<(), RenderError>;

    /// RGBA8 contents of the last finished frame, row-major, no padding.
    fn pixels(&self) -> &[u8];

    /// Free backend resources. Safe to call more than once.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}

/// Available renderer backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RendererKind {
    Shader,
    #[default]
    Canvas,
}

impl RendererKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shader" | "gpu" | "webgl" => Some(Self::Shader),
            "canvas" | "2d" | "cpu" => Some(Self::Canvas),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Shader => "shader",
            Self::Canvas => "canvas",
        }
    }

    pub fn projection(&self) -> Projection {
        match self {
            Self::Shader => Projection::Perspective,
            Self::Canvas => Projection::Flat,
        }
    }
}

/// Renderer chosen at construction time.
pub enum Renderer {
    Shader(Box<ShaderRenderer>),
    Canvas(CanvasRenderer),
}

impl Renderer {
    /// In-memory canvas renderer.
    pub fn canvas(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Renderer::Canvas(CanvasRenderer::new(ImageCanvas::new(
            width, height,
        )?)))
    }

    /// Headless GPU renderer. Fails when no adapter is available.
    pub async fn shader(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Renderer::Shader(Box::new(
            ShaderRenderer::new(width, height).await?,
        )))
    }

    /// Create a renderer of `kind`.
    pub async fn create(kind: RendererKind, width: u32, height: u32) -> Result<Self, RenderError> {
        match kind {
            RendererKind::Shader => Self::shader(width, height).await,
            RendererKind::Canvas => Self::canvas(width, height),
        }
    }

    pub fn kind(&self) -> RendererKind {
        match self {
            Renderer::Shader(_) => RendererKind::Shader,
            Renderer::Canvas(_) => RendererKind::Canvas,
        }
    }

    fn adapter(&self) -> &dyn RendererAdapter {
        match self {
            Renderer::Shader(r) => &**r,
            Renderer::Canvas(r) => r,
        }
    }

    fn adapter_mut(&mut self) -> &mut dyn RendererAdapter {
        match self {
            Renderer::Shader(r) => &mut **r,
            Renderer::Canvas(r) => r,
        }
    }
}

impl RendererAdapter for Renderer {
    fn projection(&self) -> Projection {
        self.adapter().projection()
    }

    fn size(&self) -> (u32, u32) {
        self.adapter().size()
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.adapter_mut().begin_frame()
    }

    fn draw_segment(
        &mut self,
        run: &SegmentRun,
        style: &SegmentStyle,
        alpha: f32,
    ) -> Result<(), RenderError> {
        self.adapter_mut().draw_segment(run, style, alpha)
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.adapter_mut().end_frame()
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.adapter_mut().clear()
    }

    fn pixels(&self) -> &[u8] {
        self.adapter().pixels()
    }

    fn release(&mut self) {
        self.adapter_mut().release()
    }

    fn is_released(&self) -> bool {
        self.adapter().is_released()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(RendererKind::from_str("Shader"), Some(RendererKind::Shader));
        assert_eq!(RendererKind::from_str("2d"), Some(RendererKind::Canvas));
        assert_eq!(RendererKind::from_str("svg"), None);
        assert_eq!(RendererKind::Shader.name(), "shader");
    }

    #[test]
    fn test_canvas_renderer_is_flat() {
        let renderer = Renderer::canvas(64, 32).unwrap();
        assert_eq!(renderer.kind(), RendererKind::Canvas);
        assert_eq!(renderer.projection(), Projection::Flat);
        assert_eq!(renderer.size(), (64, 32));
    }

    #[test]
    fn test_zero_sized_surface_rejected() {
        assert!(matches!(
            Renderer::canvas(0, 10),
            Err(RenderError::InvalidSurface { width: 0, height: 10 })
        ));
    }
}
