//! GPU renderer: one fullscreen spark pass per segment run.

use super::{RenderError, RendererAdapter, SegmentStyle};
use crate::geometry::Projection;
use crate::gpu::{GpuContext, ReadbackBuffer, RenderTarget, SparkPipeline, SparkUniforms};
use crate::paths::SegmentRun;
use wgpu::{Device, TextureFormat};

const FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// Headless wgpu renderer.
///
/// The spark pipeline is compiled on the first draw and reused until
/// [`RendererAdapter::release`], which also runs on drop.
pub struct ShaderRenderer {
    ctx: GpuContext,
    target: RenderTarget,
    readback: ReadbackBuffer,
    pipeline: Option<SparkPipeline>,
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    released: bool,
}

impl ShaderRenderer {
    pub async fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSurface { width, height });
        }
        let ctx = GpuContext::new().await?;
        Self::with_context(ctx, width, height)
    }

    /// Build on an existing device.
    pub fn with_context(ctx: GpuContext, width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSurface { width, height });
        }
        ctx.check_texture_size(width, height)?;
        let target = RenderTarget::for_output(&ctx.device, "spark_target", width, height, FORMAT);
        let readback = ReadbackBuffer::new(&ctx.device, width, height);
        Ok(Self {
            ctx,
            target,
            readback,
            pipeline: None,
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
            released: false,
        })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.ctx.adapter_info()
    }

    /// True once the spark pipeline has been compiled.
    pub fn has_pipeline(&self) -> bool {
        self.pipeline.is_some()
    }

    fn check_live(&self) -> Result<(), RenderError> {
        if self.released {
            Err(RenderError::Released)
        } else {
            Ok(())
        }
    }

    fn clear_target(&self) {
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("spark_clear_encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("spark_clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.target.view(),
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
    }
}

fn ensure_pipeline<'a>(slot: &'a mut Option<SparkPipeline>, device: &Device) -> &'a SparkPipeline {
    slot.get_or_insert_with(|| {
        log::info!("Compiling spark pipeline");
        SparkPipeline::new(device, FORMAT)
    })
}

impl RendererAdapter for ShaderRenderer {
    fn projection(&self) -> Projection {
        Projection::Perspective
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.check_live()?;
        self.clear_target();
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
        let pipeline = ensure_pipeline(&mut self.pipeline, &self.ctx.device);

        let uniforms = SparkUniforms::from_segment(
            run,
            style,
            alpha,
            [self.width as f32, self.height as f32],
        );
        self.ctx
            .queue
            .write_buffer(&pipeline.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("spark_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("spark_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.target.view(),
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(&pipeline.pipeline);
            pass.set_bind_group(0, &pipeline.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
        // Submit per run so the next uniform write cannot overtake this draw
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.check_live()?;
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("spark_readback_encoder"),
            });
        self.readback.copy_from(&mut encoder, &self.target);
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        self.pixels = self.readback.read_pixels(&self.ctx.device)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.check_live()?;
        self.clear_target();
        self.pixels.fill(0);
        Ok(())
    }

    fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if self.pipeline.take().is_some() {
            log::info!("Released spark pipeline");
        }
        self.pixels.fill(0);
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for ShaderRenderer {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::GpuError;

    #[tokio::test]
    async fn test_invalid_surface() {
        assert!(matches!(
            ShaderRenderer::new(0, 0).await,
            Err(RenderError::InvalidSurface { .. })
        ));
    }

    #[tokio::test]
    async fn test_pipeline_created_lazily() {
        let mut renderer = match ShaderRenderer::new(64, 64).await {
            Ok(r) => r,
            Err(_) => return, // Skip if no GPU
        };
        assert!(!renderer.has_pipeline());
        renderer.begin_frame().unwrap();
        renderer.end_frame().unwrap();
        assert!(!renderer.has_pipeline());
        assert!(renderer.pixels().iter().all(|&b| b == 0));

        renderer.release();
        renderer.release();
        assert!(matches!(renderer.begin_frame(), Err(RenderError::Released)));
    }

    #[tokio::test]
    async fn test_oversized_target_rejected() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };
        let too_wide = ctx.max_texture_size() + 1;
        assert!(matches!(
            ShaderRenderer::with_context(ctx, too_wide, 16),
            Err(RenderError::Gpu(GpuError::TextureTooLarge { .. }))
        ));
    }
}
