//! Frame loop: timing, cached geometry and drawing for every enabled path.
//!
//! One [`AnimationDriver::tick`] per display refresh:
//! 1. advance the [`FrameClock`] (delta clamped to 50 ms)
//! 2. measure the anchor, falling back to a centered default rect
//! 3. per enabled path: resolve config, fetch or rebuild geometry, compute phase, draw
//! 4. once every path is complete, fire the completion callback and clear the surface

mod anchor;
mod scheduler;

pub use anchor::AnchorSource;
pub use scheduler::{FixedStepScheduler, FrameScheduler, PlaybackHandle};

use crate::config::{resolve_effective_path_config, GlobalConfig};
use crate::geometry::AnchorRect;
use crate::paths::{GeometryInputs, PathMetricsStore, PathShape, SEGMENT_SAMPLES};
use crate::render::{RenderError, Renderer, RendererAdapter};
use crate::timing::{FrameClock, PhaseState};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Frame drawn; schedule another.
    Continue,
    /// Every path finished this frame; the surface has been cleared.
    Completed,
    /// Playback is paused or was never started.
    Stopped,
}

/// Owns the frame loop for one configuration and one renderer.
pub struct AnimationDriver<R: RendererAdapter = Renderer> {
    config: GlobalConfig,
    renderer: R,
    store: PathMetricsStore,
    clock: FrameClock,
    playback: PlaybackHandle,
    on_complete: Option<Box<dyn FnMut()>>,
    completion_fired: bool,
    running: bool,
    frames: u64,
}

impl<R: RendererAdapter> AnimationDriver<R> {
    pub fn new(config: GlobalConfig, renderer: R) -> Self {
        Self {
            config,
            renderer,
            store: PathMetricsStore::new(),
            clock: FrameClock::new(),
            playback: PlaybackHandle::new(),
            on_complete: None,
            completion_fired: false,
            running: false,
            frames: 0,
        }
    }

    /// Register a callback fired once when every path has completed.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Play/pause handle. Pausing stops the loop on the next tick.
    pub fn playback(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Replace the configuration; geometry is rebuilt where inputs changed.
    pub fn set_config(&mut self, config: GlobalConfig) {
        self.config = config;
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn store(&self) -> &PathMetricsStore {
        &self.store
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Frames drawn since the last start.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// (Re)start from time zero.
    pub fn start(&mut self) {
        self.clock.reset();
        self.store.clear();
        self.completion_fired = false;
        self.frames = 0;
        self.running = true;
        self.playback.play();
        log::info!(
            "Starting animation with {} enabled paths",
            self.config.enabled_paths().count()
        );
    }

    /// Stop the loop and clear the surface.
    pub fn stop(&mut self) -> Result<(), DriverError> {
        self.playback.pause();
        if !self.running {
            return Ok(());
        }
        self.running = false;
        log::info!("Stopping animation after {} frames", self.frames);
        if !self.renderer.is_released() {
            self.renderer.clear()?;
        }
        Ok(())
    }

    /// Draw one frame at scheduler time `timestamp_ms`.
    pub fn tick(
        &mut self,
        timestamp_ms: f64,
        anchor: Option<AnchorRect>,
    ) -> Result<TickOutcome, DriverError> {
        if !self.playback.is_playing() {
            self.stop()?;
            return Ok(TickOutcome::Stopped);
        }
        if !self.running {
            return Ok(TickOutcome::Stopped);
        }

        let clock_sec = self.clock.advance(timestamp_ms) as f32;
        let (width, height) = self.renderer.size();
        let rect = match anchor.filter(|r| r.is_valid()) {
            Some(rect) => rect,
            None => {
                log::warn!("Anchor rect missing or invalid, using fallback");
                AnchorRect::fallback(width, height)
            }
        };
        let projection = self.renderer.projection();

        let live: HashSet<_> = self.config.enabled_paths().map(|p| p.id).collect();
        self.store.retain(|id| live.contains(&id));

        self.renderer.begin_frame()?;
        // An empty path set never completes
        let mut all_complete = !live.is_empty();
        for path in self.config.enabled_paths() {
            let eff = resolve_effective_path_config(&self.config, path, Some(&rect));
            let inputs = GeometryInputs::from_effective(&eff, &rect, projection);
            let Some(geometry) = self.store.get_or_build(eff.id, inputs).geometry.as_ref() else {
                continue;
            };

            let phase = PhaseState::compute(
                clock_sec,
                &eff.phase_params(geometry.total_length()),
                eff.easing,
            );
            if phase.complete {
                continue;
            }
            all_complete = false;

            let alpha = geometry.alpha(&phase);
            for run in geometry.visible_runs(&phase, SEGMENT_SAMPLES) {
                self.renderer.draw_segment(&run, &eff.style, alpha)?;
            }
        }
        self.renderer.end_frame()?;
        self.frames += 1;

        if all_complete {
            self.finish()?;
            return Ok(TickOutcome::Completed);
        }
        Ok(TickOutcome::Continue)
    }

    fn finish(&mut self) -> Result<(), DriverError> {
        self.running = false;
        self.renderer.clear()?;
        if !self.completion_fired {
            self.completion_fired = true;
            log::info!(
                "All paths complete after {:.3}s ({} frames)",
                self.clock.elapsed(),
                self.frames
            );
            if let Some(callback) = self.on_complete.as_mut() {
                callback();
            }
        }
        Ok(())
    }

    /// Drive frames from `scheduler` until completion, pause, or the
    /// scheduler runs dry. Starts the animation if it is not running.
    pub fn run<S, A>(&mut self, scheduler: &mut S, anchor: &mut A) -> Result<TickOutcome, DriverError>
    where
        S: FrameScheduler,
        A: AnchorSource,
    {
        if !self.running {
            self.start();
        }
        let mut outcome = TickOutcome::Continue;
        while let Some(timestamp_ms) = scheduler.next_frame() {
            outcome = self.tick(timestamp_ms, anchor.anchor_rect())?;
            if outcome != TickOutcome::Continue {
                scheduler.cancel();
                break;
            }
        }
        Ok(outcome)
    }
}

impl<R: RendererAdapter> Drop for AnimationDriver<R> {
    fn drop(&mut self) {
        self.renderer.release();
    }
}
