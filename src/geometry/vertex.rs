//! Vertex labels of the anchor rectangle.
//!
//! A label resolves two ways: a screen-space angle (right = 0, down = +PI/2)
//! and a math-space offset (Y-up) from the rectangle center. For a square
//! rectangle the two agree: `atan2(-offset_y, offset_x)` is the screen angle.

use super::AnchorRect;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Half extent used for math offsets when no rectangle is available.
const FALLBACK_HALF_EXTENT: f32 = 50.0;

/// Corners and edge midpoints of the anchor rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexLabel {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    Top,
    Bottom,
    Left,
    Right,
}

impl VertexLabel {
    /// Label substituted for anything [`VertexLabel::parse`] rejects.
    pub const FALLBACK: Self = Self::TopRight;

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TL" | "TOP-LEFT" | "TOPLEFT" => Some(Self::TopLeft),
            "TR" | "TOP-RIGHT" | "TOPRIGHT" => Some(Self::TopRight),
            "BR" | "BOTTOM-RIGHT" | "BOTTOMRIGHT" => Some(Self::BottomRight),
            "BL" | "BOTTOM-LEFT" | "BOTTOMLEFT" => Some(Self::BottomLeft),
            "T" | "TOP" => Some(Self::Top),
            "B" | "BOTTOM" => Some(Self::Bottom),
            "L" | "LEFT" => Some(Self::Left),
            "R" | "RIGHT" => Some(Self::Right),
            _ => None,
        }
    }

    /// Parse a label, falling back to [`VertexLabel::FALLBACK`] on unknown input.
    pub fn resolve(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            log::warn!(
                "Unknown vertex label {:?}, using {}",
                s,
                Self::FALLBACK.name()
            );
            Self::FALLBACK
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TopLeft => "TL",
            Self::TopRight => "TR",
            Self::BottomRight => "BR",
            Self::BottomLeft => "BL",
            Self::Top => "T",
            Self::Bottom => "B",
            Self::Left => "L",
            Self::Right => "R",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::TopLeft,
            Self::TopRight,
            Self::BottomRight,
            Self::BottomLeft,
            Self::Top,
            Self::Bottom,
            Self::Left,
            Self::Right,
        ]
    }

    pub fn corners() -> &'static [Self] {
        &[
            Self::TopLeft,
            Self::TopRight,
            Self::BottomRight,
            Self::BottomLeft,
        ]
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomRight | Self::BottomLeft
        )
    }

    /// Screen-space angle (Y-down).
    pub fn screen_angle(&self) -> f32 {
        match self {
            Self::TopLeft => -3.0 * FRAC_PI_4,
            Self::TopRight => -FRAC_PI_4,
            Self::BottomRight => FRAC_PI_4,
            Self::BottomLeft => 3.0 * FRAC_PI_4,
            Self::Top => -FRAC_PI_2,
            Self::Bottom => FRAC_PI_2,
            Self::Left => PI,
            Self::Right => 0.0,
        }
    }

    /// Math-space offset (Y-up) from the rectangle center.
    pub fn math_offset(&self, rect: Option<&AnchorRect>) -> [f32; 2] {
        let [hw, hh] = rect
            .filter(|r| r.is_valid())
            .map(|r| r.half_size())
            .unwrap_or([FALLBACK_HALF_EXTENT, FALLBACK_HALF_EXTENT]);
        match self {
            Self::TopLeft => [-hw, hh],
            Self::TopRight => [hw, hh],
            Self::BottomRight => [hw, -hh],
            Self::BottomLeft => [-hw, -hh],
            Self::Top => [0.0, hh],
            Self::Bottom => [0.0, -hh],
            Self::Left => [-hw, 0.0],
            Self::Right => [hw, 0.0],
        }
    }

    /// Position of the vertex in screen pixels.
    pub fn screen_position(&self, rect: &AnchorRect) -> [f32; 2] {
        let [cx, cy] = rect.center();
        let [ox, oy] = self.math_offset(Some(rect));
        [cx + ox, cy - oy]
    }
}
