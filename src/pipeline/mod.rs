//! Offline frame export.
//!
//! Runs a configuration on a fixed-step clock and writes every drawn frame
//! as a PNG, for previews and regression snapshots.

use crate::config::GlobalConfig;
use crate::driver::{
    AnchorSource, AnimationDriver, DriverError, FixedStepScheduler, FrameScheduler, TickOutcome,
};
use crate::geometry::AnchorRect;
use crate::render::{RenderError, Renderer, RendererAdapter, RendererKind};
use crate::timing::MAX_FRAME_DELTA_SEC;
use std::path::{Path, PathBuf};

/// Export settings.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Hard cap on written frames.
    pub max_frames: u64,
    pub renderer: RendererKind,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 60,
            max_frames: 600,
            renderer: RendererKind::Canvas,
        }
    }
}

impl ExportOptions {
    /// Lowest frame rate whose step is not shortened by the frame clock.
    pub fn min_fps() -> u32 {
        (1.0 / MAX_FRAME_DELTA_SEC).ceil() as u32
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.fps < Self::min_fps() {
            return Err(PipelineError::InvalidOptions(format!(
                "fps must be at least {}, got {}",
                Self::min_fps(),
                self.fps
            )));
        }
        if self.max_frames == 0 {
            return Err(PipelineError::InvalidOptions("max_frames must be > 0".into()));
        }
        Ok(())
    }
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub frames: u64,
    /// True when every path finished before the frame cap.
    pub completed: bool,
    /// Animation time covered, seconds.
    pub elapsed_sec: f64,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid export options: {0}")]
    InvalidOptions(String),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render `config` around `anchor` and write `frame_00000.png`, ... into `out_dir`.
///
/// The completing frame is not written since the driver clears the surface on it.
pub async fn export_frames<P: AsRef<Path>>(
    config: GlobalConfig,
    anchor: AnchorRect,
    options: ExportOptions,
    out_dir: P,
) -> Result<ExportSummary, PipelineError> {
    options.validate()?;
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;

    let renderer = Renderer::create(options.renderer, options.width, options.height).await?;
    log::info!(
        "Exporting {}x{} @ {} fps with the {} renderer to {}",
        options.width,
        options.height,
        options.fps,
        renderer.kind().name(),
        out_dir.display()
    );

    let mut driver = AnimationDriver::new(config, renderer);
    driver.start();
    let mut scheduler = FixedStepScheduler::from_fps(options.fps).with_limit(options.max_frames);
    let mut anchor = anchor;

    let mut files = Vec::new();
    let mut completed = false;
    while let Some(timestamp_ms) = scheduler.next_frame() {
        match driver.tick(timestamp_ms, anchor.anchor_rect())? {
            TickOutcome::Continue => {}
            TickOutcome::Completed => {
                completed = true;
                break;
            }
            TickOutcome::Stopped => break,
        }
        let path = out_dir.join(format!("frame_{:05}.png", files.len()));
        write_png(&path, driver.renderer())?;
        files.push(path);
    }

    let summary = ExportSummary {
        frames: files.len() as u64,
        completed,
        elapsed_sec: driver.elapsed(),
        files,
    };
    log::info!(
        "Exported {} frames ({:.2}s, completed: {})",
        summary.frames,
        summary.elapsed_sec,
        summary.completed
    );
    Ok(summary)
}

/// Blocking wrapper around [`export_frames`] for callers without an executor.
pub fn export_frames_blocking<P: AsRef<Path>>(
    config: GlobalConfig,
    anchor: AnchorRect,
    options: ExportOptions,
    out_dir: P,
) -> Result<ExportSummary, PipelineError> {
    pollster::block_on(export_frames(config, anchor, options, out_dir))
}

fn write_png(path: &Path, renderer: &impl RendererAdapter) -> Result<(), PipelineError> {
    let (width, height) = renderer.size();
    image::save_buffer(
        path,
        renderer.pixels(),
        width,
        height,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}
