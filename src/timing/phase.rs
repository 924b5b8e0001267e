//! Per-path phase state machine.
//!
//! Phase units: the head travels from 0 to `total_span = 1 + segment + overshoot`
//! while eased time goes from 0 to 1. The tail trails the head by the segment
//! fraction and stops at 1 (the path end). Once the tail reaches the end the
//! remaining segment fades out over the fade window.

use super::easing::Easing;

/// Tolerance used by completion and visibility checks.
pub const PHASE_EPSILON: f32 = 1e-4;

/// Inputs for one path, in seconds and phase units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseParams {
    pub delay_sec: f32,
    pub duration_sec: f32,
    /// Visible segment as a fraction of the path length.
    pub segment_fraction: f32,
    pub overshoot: f32,
    pub fade_window: f32,
    pub fade_in_sec: f32,
    pub fade_out_sec: f32,
}

impl Default for PhaseParams {
    fn default() -> Self {
        Self {
            delay_sec: 0.0,
            duration_sec: 1.2,
            segment_fraction: 0.0,
            overshoot: 0.08,
            fade_window: 0.08,
            fade_in_sec: 0.0,
            fade_out_sec: 0.0,
        }
    }
}

/// Lifecycle stage of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Delay has not elapsed yet.
    Pending,
    /// Head is still on the path.
    Running,
    /// Head is past the end; tail catching up and fading.
    Overshoot,
    Complete,
}

/// Phase of one path at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseState {
    /// Seconds since the delay elapsed; negative while pending.
    pub elapsed: f32,
    pub duration: f32,
    pub normalized: f32,
    pub eased: f32,
    /// Unclamped `eased * total_span`.
    pub phase: f32,
    pub head: f32,
    pub tail: f32,
    pub segment_fraction: f32,
    pub total_span: f32,
    pub fade_window: f32,
    pub fade_in: f32,
    pub fade_out: f32,
    pub complete: bool,
}

impl PhaseState {
    /// Compute the phase at accumulated clock time `clock_sec`.
    pub fn compute(clock_sec: f32, params: &PhaseParams, easing: Easing) -> Self {
        let elapsed = clock_sec - params.delay_sec;
        let duration = params.duration_sec.max(1e-4);
        let segment_fraction = params.segment_fraction.clamp(0.0, 1.0);
        let overshoot = params.overshoot.max(0.0);
        let fade_window = params.fade_window.max(0.0);
        let total_span = 1.0 + segment_fraction + overshoot;

        let normalized = (elapsed / duration).clamp(0.0, 1.0);
        let eased = if normalized >= 1.0 {
            1.0
        } else {
            easing.apply(normalized)
        };
        let phase = eased * total_span;
        let head = phase.clamp(0.0, total_span);
        let tail = (head - segment_fraction).clamp(0.0, 1.0);

        let fade_duration = (fade_window / total_span) * duration;
        let complete = elapsed >= 0.0
            && (elapsed >= duration + fade_duration
                || phase >= total_span + fade_window - PHASE_EPSILON);

        Self {
            elapsed,
            duration,
            normalized,
            eased,
            phase,
            head,
            tail,
            segment_fraction,
            total_span,
            fade_window,
            fade_in: params.fade_in_sec.max(0.0),
            fade_out: params.fade_out_sec.max(0.0),
            complete,
        }
    }

    pub fn stage(&self) -> Stage {
        if self.elapsed < 0.0 {
            Stage::Pending
        } else if self.complete {
            Stage::Complete
        } else if self.head < 1.0 {
            Stage::Running
        } else {
            Stage::Overshoot
        }
    }

    /// Whether a segment should be drawn at all.
    pub fn visible(&self) -> bool {
        if self.elapsed < 0.0 || self.complete {
            return false;
        }
        if self.phase >= self.total_span + self.fade_window - PHASE_EPSILON {
            return false;
        }
        !(self.tail_at_end() && self.phase - 1.0 >= self.fade_window)
    }

    fn tail_at_end(&self) -> bool {
        self.tail >= 1.0 - PHASE_EPSILON
    }

    /// End-of-life fade driven by phase.
    pub fn life_alpha(&self) -> f32 {
        if !self.visible() {
            return 0.0;
        }
        if self.phase > self.total_span {
            1.0 - smoothstep(
                self.total_span,
                self.total_span + self.fade_window,
                self.phase,
            )
        } else if self.tail_at_end() {
            let past_end = (self.phase - 1.0).max(0.0);
            1.0 - (past_end / self.fade_window.max(PHASE_EPSILON)).min(1.0)
        } else {
            1.0
        }
    }

    /// End-of-life fade driven by wall time: linear over the completion
    /// window that follows the duration.
    pub fn time_life_alpha(&self) -> f32 {
        if self.elapsed < 0.0 || self.complete {
            return 0.0;
        }
        let window = (self.fade_window / self.total_span) * self.duration;
        if self.elapsed <= self.duration {
            1.0
        } else if window <= 0.0 {
            0.0
        } else {
            1.0 - ((self.elapsed - self.duration) / window).clamp(0.0, 1.0)
        }
    }

    /// Fade-in/fade-out envelope; 1 when neither is configured.
    pub fn envelope(&self) -> f32 {
        let mut alpha = 1.0;
        if self.fade_in > 0.0 {
            alpha *= (self.elapsed / self.fade_in).clamp(0.0, 1.0);
        }
        if self.fade_out > 0.0 {
            alpha *= ((self.duration - self.elapsed) / self.fade_out).clamp(0.0, 1.0);
        }
        alpha
    }

    /// Envelope times the phase-driven end-of-life fade.
    pub fn alpha(&self) -> f32 {
        self.envelope() * self.life_alpha()
    }
}

/// Hermite smoothstep; a step function when the edges coincide.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(segment: f32) -> PhaseParams {
        PhaseParams {
            duration_sec: 1.0,
            segment_fraction: segment,
            ..Default::default()
        }
    }

    #[test]
    fn test_pending_before_delay() {
        let p = PhaseParams {
            delay_sec: 0.5,
            ..params(0.3)
        };
        let state = PhaseState::compute(0.2, &p, Easing::Linear);
        assert_eq!(state.stage(), Stage::Pending);
        assert!(!state.visible());
        assert!(!state.complete);
    }

    #[test]
    fn test_span_and_tail() {
        let state = PhaseState::compute(0.5, &params(0.3), Easing::Linear);
        assert!((state.total_span - 1.38).abs() < 1e-6);
        assert!((state.head - 0.69).abs() < 1e-5);
        assert!((state.tail - 0.39).abs() < 1e-5);
        assert_eq!(state.stage(), Stage::Running);
        assert_eq!(state.alpha(), 1.0);
    }

    #[test]
    fn test_eased_forced_to_one() {
        fn never_done(t: f32) -> f32 {
            t * 0.99
        }
        let state = PhaseState::compute(1.0, &params(0.3), Easing::Custom(never_done));
        assert_eq!(state.eased, 1.0);
    }

    #[test]
    fn test_tail_fade_after_end() {
        // Small segment and no overshoot: tail reaches the end while the
        // remaining span is inside the fade window.
        let p = PhaseParams {
            overshoot: 0.0,
            fade_window: 0.2,
            ..params(0.1)
        };
        let state = PhaseState::compute(1.05, &p, Easing::Linear);
        assert!(state.tail >= 1.0 - PHASE_EPSILON);
        assert_eq!(state.stage(), Stage::Overshoot);
        assert!(state.visible());
        let alpha = state.life_alpha();
        assert!(alpha > 0.0 && alpha < 1.0);
    }

    #[test]
    fn test_nothing_drawn_once_tail_is_done() {
        let state = PhaseState::compute(1.0, &params(0.3), Easing::Linear);
        assert!(!state.visible());
        assert_eq!(state.life_alpha(), 0.0);
    }

    #[test]
    fn test_fade_envelope() {
        let p = PhaseParams {
            fade_in_sec: 0.2,
            fade_out_sec: 0.2,
            ..params(0.3)
        };
        assert!((PhaseState::compute(0.1, &p, Easing::Linear).envelope() - 0.5).abs() < 1e-5);
        assert!((PhaseState::compute(0.5, &p, Easing::Linear).envelope() - 1.0).abs() < 1e-5);
        assert!((PhaseState::compute(0.9, &p, Easing::Linear).envelope() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_time_life_alpha() {
        let p = params(0.3);
        let window = 0.08 / 1.38;
        let during = PhaseState::compute(0.5, &p, Easing::Linear);
        assert_eq!(during.time_life_alpha(), 1.0);
        let halfway = PhaseState::compute(1.0 + window / 2.0, &p, Easing::Linear);
        assert!((halfway.time_life_alpha() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_smoothstep() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_eq!(smoothstep(1.0, 1.0, 0.5), 0.0);
        assert_eq!(smoothstep(1.0, 1.0, 1.0), 1.0);
    }
}
