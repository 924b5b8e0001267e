//! Timing: easing curves, per-path phase state and the frame clock.

mod clock;
mod easing;
mod phase;

pub use clock::{FrameClock, MAX_FRAME_DELTA_SEC};
pub use easing::{Easing, EasingFn, EasingSet};
pub use phase::{smoothstep, PhaseParams, PhaseState, Stage, PHASE_EPSILON};
