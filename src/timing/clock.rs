//! Accumulating frame clock.

/// Largest time step a single frame may contribute.
pub const MAX_FRAME_DELTA_SEC: f64 = 0.05;

/// Turns scheduler timestamps into accumulated animation time.
///
/// Each frame contributes at most [`MAX_FRAME_DELTA_SEC`], so a stalled host
/// (hidden tab, debugger) resumes where it left off instead of jumping ahead.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulated: f64,
    last_timestamp_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.last_timestamp_ms = None;
    }

    /// Advance to `timestamp_ms` and return accumulated seconds.
    pub fn advance(&mut self, timestamp_ms: f64) -> f64 {
        if let Some(last) = self.last_timestamp_ms {
            let dt = ((timestamp_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DELTA_SEC);
            if dt.is_finite() {
                self.accumulated += dt;
            }
        }
        if timestamp_ms.is_finite() {
            self.last_timestamp_ms = Some(timestamp_ms);
        }
        self.accumulated
    }

    pub fn elapsed(&self) -> f64 {
        self.accumulated
    }
}
