//! Betspot Glow Core
//!
//! Glow "spark" path animation around an anchor rectangle.
//!
//! # Features
//!
//! - Spark paths: tilted ellipse arcs between anchor vertices, with an optional
//!   return journey back into the anchor
//! - Circle transitions: corner-to-orbit paths finishing on a small circle
//! - Border lines: a segment that grows then travels the anchor perimeter
//! - Perspective projection for the shader variant
//! - Per-kind easing and a head/tail phase state machine with end-of-life fade
//! - Two renderers behind one trait: wgpu (Metal, Vulkan, GL) and a CPU canvas
//! - Frame driver with cached geometry, and offline PNG frame export
//!
//! # Example
//! ```
//! use betspot_glow::{AnimationDriver, AnchorRect, FixedStepScheduler, GlobalConfig, PathConfig, Renderer};
//!
//! let config = GlobalConfig::default().with_paths(vec![PathConfig::spark(1, "BR", "TL")]);
//! let mut driver = AnimationDriver::new(config, Renderer::canvas(320, 240).unwrap());
//! let mut scheduler = FixedStepScheduler::from_fps(60).with_limit(300);
//! let mut anchor = AnchorRect::centered([160.0, 120.0], 100.0, 100.0);
//! driver.run(&mut scheduler, &mut anchor).unwrap();
//! assert!(!driver.is_running());
//! ```

pub mod config;
pub mod driver;
pub mod geometry;
pub mod gpu;
pub mod paths;
pub mod pipeline;
pub mod render;
pub mod timing;

// Re-export commonly used types
pub use config::{
    resolve_effective_path_config, ConfigError, Direction, EffectivePathConfig, GlobalConfig,
    PathConfig, PathId, PathKind,
};
pub use driver::{
    AnchorSource, AnimationDriver, DriverError, FixedStepScheduler, FrameScheduler,
    PlaybackHandle, TickOutcome,
};
pub use geometry::{AnchorRect, Camera, GeometryError, Projection, VertexLabel};
pub use gpu::{GpuContext, GpuError};
pub use paths::{build_geometry, PathGeometry, PathMetricsStore, PathShape};
pub use pipeline::{export_frames, ExportOptions, ExportSummary, PipelineError};
pub use render::{
    CanvasRenderer, RenderError, Renderer, RendererAdapter, RendererKind, SegmentStyle,
    ShaderRenderer,
};
pub use timing::{Easing, EasingSet, PhaseParams, PhaseState, Stage};
