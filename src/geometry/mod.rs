//! Path geometry primitives.
//!
//! Everything in here works in screen pixels (Y-down) unless a function says
//! otherwise. The building blocks are:
//! - [`AnchorRect`]: the measured anchor element, with a fallback when missing
//! - [`VertexLabel`]: symbolic corners/edge midpoints of the anchor
//! - [`Camera`]: the perspective projector used by the shader renderer
//! - [`SparkEllipse`], [`CircleTransition`], [`BorderLine`]: the three path shapes
//! - [`minimize_distance`]: bounded minimizer used to place points on an ellipse

mod anchor;
mod border;
mod circle;
mod ellipse;
mod projection;
mod solve;
mod vertex;

pub use anchor::AnchorRect;
pub use border::{BorderLine, BorderSpan};
pub use circle::CircleTransition;
pub use ellipse::{find_return_theta, EllipseParams, ReturnJourney, SparkEllipse};
pub use projection::{Camera, Projection};
pub use solve::{minimize_distance, Solution};
pub use vertex::VertexLabel;

use std::f32::consts::{PI, TAU};

/// A 2D point in screen pixels.
pub type Point = [f32; 2];

/// Samples used for arc-length integration.
pub const ARC_LENGTH_SAMPLES: usize = 128;

/// Errors raised when a path's geometry cannot be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("spark path is missing its {0} vertex")]
    MissingVertex(&'static str),
    #[error("circle path must start on a corner, got {0:?}")]
    NotACorner(VertexLabel),
}

/// Wrap an angle into (-PI, PI].
pub fn normalize_delta(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f32 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Arc length of `f` over `[from, to]`, summing chords between `samples + 1` points.
pub fn arc_length<F>(from: f32, to: f32, samples: usize, f: F) -> f32
where
    F: Fn(f32) -> Point,
{
    let samples = samples.max(1);
    let mut prev = f(from);
    let mut total = 0.0;
    for i in 1..=samples {
        let t = from + (to - from) * (i as f32 / samples as f32);
        let p = f(t);
        total += distance(prev, p);
        prev = p;
    }
    total
}
