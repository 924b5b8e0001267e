//! Path shapes and their cached metrics.
//!
//! Each [`PathKind`] maps to one geometry type implementing [`PathShape`]:
//! - Spark: [`SparkEllipse`] arc between two vertices
//! - Circle: [`CircleTransition`] corner-to-orbit path
//! - Line: [`BorderLine`] travelling the anchor border
//!
//! [`PathGeometry`] is the tagged union the driver stores per path id.

mod registry;
mod store;

pub use crate::config::PathKind;
pub use registry::{build_geometry, GeometryInputs};
pub use store::{PathMetrics, PathMetricsStore};

use crate::geometry::{BorderLine, CircleTransition, Point, SparkEllipse};
use crate::timing::PhaseState;

/// Points sampled along a visible segment (51 points).
pub const SEGMENT_SAMPLES: usize = 50;

/// One sampled point of a visible segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub position: Point,
    /// Position along the visible segment: 0 at the tail, 1 at the head.
    pub along: f32,
}

/// A contiguous run of sample points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentRun {
    pub points: Vec<SamplePoint>,
}

impl SegmentRun {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Head end of the run.
    pub fn head(&self) -> Option<Point> {
        self.points.last().map(|p| p.position)
    }

    pub fn tail(&self) -> Option<Point> {
        self.points.first().map(|p| p.position)
    }
}

/// Common interface of every path shape.
pub trait PathShape {
    fn kind(&self) -> PathKind;

    /// Total arc length in pixels.
    fn total_length(&self) -> f32;

    /// Screen position at path parameter `t` in [0, 1].
    fn position(&self, t: f32) -> Point;

    /// Sample the visible tail-to-head segment for `phase`.
    fn visible_runs(&self, phase: &PhaseState, samples: usize) -> Vec<SegmentRun> {
        if !phase.visible() {
            return Vec::new();
        }
        let tail = phase.tail;
        let head = phase.head.min(1.0);
        if head - tail <= 1e-6 {
            return Vec::new();
        }
        let samples = samples.max(1);
        let points = (0..=samples)
            .map(|i| {
                let along = i as f32 / samples as f32;
                SamplePoint {
                    position: self.position(tail + (head - tail) * along),
                    along,
                }
            })
            .collect();
        vec![SegmentRun { points }]
    }

    /// Overall opacity multiplier for `phase`.
    fn alpha(&self, phase: &PhaseState) -> f32 {
        phase.alpha()
    }
}

impl PathShape for SparkEllipse {
    fn kind(&self) -> PathKind {
        PathKind::Spark
    }

    fn total_length(&self) -> f32 {
        SparkEllipse::total_length(self)
    }

    fn position(&self, t: f32) -> Point {
        SparkEllipse::position(self, t)
    }
}

impl PathShape for CircleTransition {
    fn kind(&self) -> PathKind {
        PathKind::Circle
    }

    fn total_length(&self) -> f32 {
        CircleTransition::total_length(self)
    }

    fn position(&self, t: f32) -> Point {
        CircleTransition::position(self, t)
    }
}

impl PathShape for BorderLine {
    fn kind(&self) -> PathKind {
        PathKind::Line
    }

    fn total_length(&self) -> f32 {
        BorderLine::total_length(self)
    }

    fn position(&self, t: f32) -> Point {
        BorderLine::position(self, t)
    }

    /// Growth then travel, driven by eased time rather than head/tail phase.
    fn visible_runs(&self, phase: &PhaseState, samples: usize) -> Vec<SegmentRun> {
        if phase.elapsed < 0.0 || phase.complete {
            return Vec::new();
        }
        self.sample_span(self.span_at(phase.eased), samples)
            .into_iter()
            .map(|run| SegmentRun {
                points: run
                    .into_iter()
                    .map(|(position, along)| SamplePoint { position, along })
                    .collect(),
            })
            .collect()
    }

    fn alpha(&self, phase: &PhaseState) -> f32 {
        phase.envelope() * phase.time_life_alpha()
    }
}

/// Geometry of one path, by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PathGeometry {
    Spark(SparkEllipse),
    Circle(CircleTransition),
    Line(BorderLine),
}

impl PathGeometry {
    fn shape(&self) -> &dyn PathShape {
        match self {
            PathGeometry::Spark(s) => s,
            PathGeometry::Circle(c) => c,
            PathGeometry::Line(l) => l,
        }
    }
}

impl PathShape for PathGeometry {
    fn kind(&self) -> PathKind {
        self.shape().kind()
    }

    fn total_length(&self) -> f32 {
        self.shape().total_length()
    }

    fn position(&self, t: f32) -> Point {
        self.shape().position(t)
    }

    fn visible_runs(&self, phase: &PhaseState, samples: usize) -> Vec<SegmentRun> {
        self.shape().visible_runs(phase, samples)
    }

    fn alpha(&self, phase: &PhaseState) -> f32 {
        self.shape().alpha(phase)
    }
}
