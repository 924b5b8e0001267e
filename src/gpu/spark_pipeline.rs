//! Fullscreen glow pass for one visible segment run.

use super::layouts::create_spark_layout;
use super::pipelines::{create_fullscreen_pipeline, create_pipeline_layout};
use crate::paths::SegmentRun;
use crate::render::SegmentStyle;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline, TextureFormat};

/// Points a single draw can carry; longer runs are resampled down.
pub const MAX_SPARK_POINTS: usize = 64;

/// Uniform block mirrored by `SparkUniforms` in `spark.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SparkUniforms {
    /// x, y, core radius, along.
    pub points: [[f32; 4]; MAX_SPARK_POINTS],
    pub spark_color: [f32; 4],
    pub glow_color: [f32; 4],
    pub resolution: [f32; 2],
    pub glow_radius: f32,
    pub alpha: f32,
    pub count: u32,
    pub _padding: [u32; 3],
}

impl SparkUniforms {
    /// Pack a run with its per-point tapered radius.
    pub fn from_segment(
        run: &SegmentRun,
        style: &SegmentStyle,
        alpha: f32,
        resolution: [f32; 2],
    ) -> Self {
        let mut points = [[0.0f32; 4]; MAX_SPARK_POINTS];
        let count = run.len().min(MAX_SPARK_POINTS);
        for (slot, i) in points.iter_mut().zip(resample_indices(run.len(), count)) {
            let p = run.points[i];
            *slot = [
                p.position[0],
                p.position[1],
                style.radius_at(p.along),
                p.along,
            ];
        }
        let rgba = |c: [f32; 3]| [c[0], c[1], c[2], 1.0];
        Self {
            points,
            spark_color: rgba(style.spark_color),
            glow_color: rgba(style.glow_color),
            resolution,
            glow_radius: style.glow_radius,
            alpha: alpha.clamp(0.0, 1.0),
            count: count as u32,
            _padding: [0; 3],
        }
    }
}

/// `count` indices spread evenly over `0..len`, keeping both ends.
fn resample_indices(len: usize, count: usize) -> impl Iterator<Item = usize> {
    (0..count).map(move |i| {
        if count <= 1 || len == count {
            i
        } else {
            (i * (len - 1) + (count - 1) / 2) / (count - 1)
        }
    })
}

/// Pipeline, uniform buffer and bind group of the spark pass.
pub struct SparkPipeline {
    pub pipeline: RenderPipeline,
    pub bind_group_layout: BindGroupLayout,
    pub uniform_buffer: Buffer,
    pub bind_group: BindGroup,
}

impl SparkPipeline {
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spark_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/spark.wgsl").into()),
        });

        let bind_group_layout = create_spark_layout(device);
        let pipeline_layout =
            create_pipeline_layout(device, "spark_pipeline_layout", &[&bind_group_layout]);
        let pipeline = create_fullscreen_pipeline(
            device,
            "spark_pipeline",
            &pipeline_layout,
            &shader,
            format,
            wgpu::BlendState::ALPHA_BLENDING,
        );

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("spark_uniforms"),
            size: std::mem::size_of::<SparkUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("spark_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            bind_group,
        }
    }
}
