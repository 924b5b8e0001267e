//! Border-line paths around the anchor perimeter.
//!
//! Perimeter distance 0 is the top-left corner and grows clockwise
//! (TL, TR, BR, BL). Anticlockwise travel walks the same mapping backwards.

use super::{AnchorRect, Point};

/// Fraction of eased time spent growing the line before it starts sliding.
pub const GROWTH_PHASE: f32 = 0.25;

/// Visible part of the line as unwrapped perimeter distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSpan {
    pub tail: f32,
    pub head: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BorderLine {
    rect: AnchorRect,
    start: f32,
    dir: f32,
    line_length: f32,
    travel: f32,
}

impl BorderLine {
    pub fn new(
        rect: AnchorRect,
        start_point_deg: f32,
        clockwise: bool,
        coverage_deg: f32,
        line_length: f32,
    ) -> Self {
        let perimeter = rect.perimeter();
        Self {
            rect,
            start: (start_point_deg / 360.0).rem_euclid(1.0) * perimeter,
            dir: if clockwise { 1.0 } else { -1.0 },
            line_length: line_length.max(0.0),
            travel: (coverage_deg / 360.0).max(0.0) * perimeter,
        }
    }

    pub fn perimeter(&self) -> f32 {
        self.rect.perimeter()
    }

    pub fn line_length(&self) -> f32 {
        self.line_length
    }

    /// Distance the head covers over the whole animation.
    pub fn total_length(&self) -> f32 {
        self.travel + self.line_length
    }

    /// Perimeter distance where the line starts.
    pub fn start_distance(&self) -> f32 {
        self.start
    }

    pub fn point_at_distance(&self, d: f32) -> Point {
        let AnchorRect {
            left,
            top,
            width: w,
            height: h,
        } = self.rect;
        let perimeter = self.perimeter();
        if perimeter <= 0.0 {
            return [left, top];
        }
        let d = d.rem_euclid(perimeter);

        if d < w {
            [left + d, top]
        } else if d < w + h {
            [left + w, top + (d - w)]
        } else if d < 2.0 * w + h {
            [left + w - (d - w - h), top + h]
        } else {
            [left, top + h - (d - 2.0 * w - h)]
        }
    }

    /// Head position at path parameter `t` in [0, 1].
    pub fn position(&self, t: f32) -> Point {
        self.point_at_distance(self.start + self.dir * self.total_length() * t.clamp(0.0, 1.0))
    }

    /// Grow from the start point, then slide a fixed-length line.
    pub fn span_at(&self, eased: f32) -> BorderSpan {
        let eased = eased.clamp(0.0, 1.0);
        if eased < GROWTH_PHASE {
            let grown = self.line_length * (eased / GROWTH_PHASE);
            BorderSpan {
                tail: self.start,
                head: self.start + self.dir * grown,
            }
        } else {
            let progress = (eased - GROWTH_PHASE) / (1.0 - GROWTH_PHASE);
            let tail = self.start + self.dir * self.travel * progress;
            BorderSpan {
                tail,
                head: tail + self.dir * self.line_length,
            }
        }
    }

    /// Sample a span into runs of `(point, along)` pairs, split at the seam.
    pub fn sample_span(&self, span: BorderSpan, samples: usize) -> Vec<Vec<(Point, f32)>> {
        let perimeter = self.perimeter();
        let extent = span.head - span.tail;
        if perimeter <= 0.0 || extent.abs() < 1e-4 {
            return Vec::new();
        }

        let samples = samples.max(1);
        let lap = |d: f32| (d / perimeter).floor();
        let mut runs = Vec::new();
        let mut current: Vec<(Point, f32)> = Vec::with_capacity(samples + 2);
        let mut prev_distance = span.tail;

        for i in 0..=samples {
            let along = i as f32 / samples as f32;
            let d = span.tail + extent * along;

            if i > 0 && lap(d) != lap(prev_distance) {
                let seam = lap(d).max(lap(prev_distance)) * perimeter;
                let seam_along = (seam - span.tail) / extent;
                let corner = self.point_at_distance(seam);
                current.push((corner, seam_along));
                runs.push(std::mem::take(&mut current));
                current.push((corner, seam_along));
            }

            current.push((self.point_at_distance(d), along));
            prev_distance = d;
        }
        runs.push(current);
        runs
    }
}
