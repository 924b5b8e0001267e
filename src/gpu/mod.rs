//! Headless wgpu plumbing for the shader renderer.
//!
//! Backends are tried in the order Metal, Vulkan, GL. Frames render into an
//! offscreen [`RenderTarget`] and are read back through a [`ReadbackBuffer`].

pub mod context;
pub mod layouts;
pub mod pipelines;
pub mod spark_pipeline;
pub mod textures;

pub use context::{GpuContext, GpuError};
pub use spark_pipeline::{SparkPipeline, SparkUniforms, MAX_SPARK_POINTS};
pub use textures::{ReadbackBuffer, RenderTarget};
