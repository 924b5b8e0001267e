//! Shared styling math for both renderers.
//!
//! The shader in `gpu/shaders/spark.wgsl` mirrors [`glow_profile`] and
//! [`blend_over`]; keep them in sync.

use crate::timing::smoothstep;

/// Peak opacity of the glow halo relative to the core.
pub const GLOW_PEAK: f32 = 0.9;

/// Radii and colors of one path's segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentStyle {
    pub head_radius: f32,
    pub tail_radius: f32,
    pub glow_radius: f32,
    pub spark_color: [f32; 3],
    pub glow_color: [f32; 3],
}

impl Default for SegmentStyle {
    fn default() -> Self {
        Self {
            head_radius: 10.0,
            tail_radius: 2.0,
            glow_radius: 20.0,
            spark_color: [1.0, 1.0, 224.0 / 255.0],
            glow_color: [1.0, 251.0 / 255.0, 164.0 / 255.0],
        }
    }
}

impl SegmentStyle {
    /// Linear taper from tail (`along = 0`) to head (`along = 1`).
    pub fn radius_at(&self, along: f32) -> f32 {
        let along = along.clamp(0.0, 1.0);
        self.tail_radius + (self.head_radius - self.tail_radius) * along
    }

    /// Furthest distance from the centerline that can receive color.
    pub fn max_extent(&self) -> f32 {
        self.head_radius.max(self.tail_radius) + self.glow_radius
    }
}

/// Coverage of a pixel at `distance` from the centerline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlowSample {
    pub alpha: f32,
    /// True when the pixel lies inside the core radius.
    pub core: bool,
}

/// Core plus soft halo falloff at `distance` for a segment of `radius`.
pub fn glow_profile(distance: f32, radius: f32, glow_radius: f32) -> GlowSample {
    let core = 1.0 - smoothstep(0.0, radius, distance);
    let glow = (1.0 - smoothstep(radius, radius + glow_radius, distance)) * GLOW_PEAK;
    GlowSample {
        alpha: core.max(glow),
        core: distance <= radius,
    }
}

/// Straight-alpha "over" blend of `rgb`/`alpha` onto an RGBA8 pixel.
///
/// Matches `wgpu::BlendState::ALPHA_BLENDING`.
pub fn blend_over(dst: [u8; 4], rgb: [f32; 3], alpha: f32) -> [u8; 4] {
    let a = alpha.clamp(0.0, 1.0);
    let to_f = |v: u8| v as f32 / 255.0;
    let to_u = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        to_u(rgb[0] * a + to_f(dst[0]) * (1.0 - a)),
        to_u(rgb[1] * a + to_f(dst[1]) * (1.0 - a)),
        to_u(rgb[2] * a + to_f(dst[2]) * (1.0 - a)),
        to_u(a + to_f(dst[3]) * (1.0 - a)),
    ]
}
