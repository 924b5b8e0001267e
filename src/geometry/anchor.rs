//! Anchor rectangle measured from the host each frame.

use super::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl AnchorRect {
    /// Side length of the rectangle used when no measurement is available.
    pub const FALLBACK_SIZE: f32 = 100.0;

    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `center`.
    pub fn centered(center: Point, width: f32, height: f32) -> Self {
        Self::new(
            center[0] - width / 2.0,
            center[1] - height / 2.0,
            width,
            height,
        )
    }

    /// A `FALLBACK_SIZE` square centered on a surface of the given size.
    pub fn fallback(surface_width: u32, surface_height: u32) -> Self {
        Self::centered(
            [surface_width as f32 / 2.0, surface_height as f32 / 2.0],
            Self::FALLBACK_SIZE,
            Self::FALLBACK_SIZE,
        )
    }

    /// Finite position and strictly positive size.
    pub fn is_valid(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn center(&self) -> Point {
        [self.left + self.width / 2.0, self.top + self.height / 2.0]
    }

    /// Half width and half height.
    pub fn half_size(&self) -> [f32; 2] {
        [self.width / 2.0, self.height / 2.0]
    }

    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }

    pub fn perimeter(&self) -> f32 {
        2.0 * (self.width + self.height)
    }

    /// Inclusive point-in-rect test.
    pub fn contains(&self, p: Point) -> bool {
        p[0] >= self.left
            && p[0] <= self.left + self.width
            && p[1] >= self.top
            && p[1] <= self.top + self.height
    }
}
