//! Frame scheduling and the play/pause signal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Source of frame timestamps, one per display refresh.
pub trait FrameScheduler {
    /// Timestamp in milliseconds of the next frame, or `None` when no more
    /// frames will be delivered.
    fn next_frame(&mut self) -> Option<f64>;

    /// Drop any pending frame request.
    fn cancel(&mut self) {}
}

/// Deterministic scheduler ticking at a fixed step.
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    step_ms: f64,
    next_ms: f64,
    remaining: Option<u64>,
    cancelled: bool,
}

impl FixedStepScheduler {
    /// Scheduler starting at 0 ms with `step_ms` between frames.
    pub fn new(step_ms: f64) -> Self {
        Self {
            step_ms: if step_ms.is_finite() && step_ms > 0.0 {
                step_ms
            } else {
                1000.0 / 60.0
            },
            next_ms: 0.0,
            remaining: None,
            cancelled: false,
        }
    }

    pub fn from_fps(fps: u32) -> Self {
        Self::new(1000.0 / fps.max(1) as f64)
    }

    /// Stop after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl FrameScheduler for FixedStepScheduler {
    fn next_frame(&mut self) -> Option<f64> {
        if self.cancelled {
            return None;
        }
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        let ts = self.next_ms;
        self.next_ms += self.step_ms;
        Some(ts)
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Shared play/pause flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct PlaybackHandle {
    playing: Arc<AtomicBool>,
}

impl PlaybackHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&self) {
        self.playing.store(true, Ordering::SeqCst);
    }

    pub fn pause(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}
