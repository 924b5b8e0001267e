//! Perspective projector used by the shader renderer.

use super::Point;
use serde::{Deserialize, Serialize};

/// How path geometry is mapped onto the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Plain 2D, no depth.
    #[default]
    Flat,
    /// Synthetic depth, camera tilt and perspective divide.
    Perspective,
}

/// Camera model: two-axis tilt followed by a distance-based divide.
///
/// Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub distance: f32,
    pub tilt_x: f32,
    pub tilt_y: f32,
    pub depth_amplitude: f32,
    pub depth_phase: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            distance: 4000.0,
            tilt_x: 0.0,
            tilt_y: 0.0,
            depth_amplitude: 0.0,
            depth_phase: 0.0,
        }
    }
}

impl Camera {
    /// Synthetic depth at local ellipse angle `theta`.
    pub fn depth(&self, theta: f32) -> f32 {
        self.depth_amplitude * (theta + self.depth_phase).sin()
    }

    /// Rotate a center-relative point around X then Y.
    pub fn rotate(&self, p: [f32; 3]) -> [f32; 3] {
        let (sx, cx) = self.tilt_x.sin_cos();
        let (sy, cy) = self.tilt_y.sin_cos();

        let y1 = cx * p[1] - sx * p[2];
        let z1 = sx * p[1] + cx * p[2];

        let x2 = cy * p[0] + sy * z1;
        let z2 = -sy * p[0] + cy * z1;
        [x2, y1, z2]
    }

    /// Project a center-relative 3D point to screen pixels.
    pub fn project(&self, p: [f32; 3], center: Point) -> Point {
        let [x, y, z] = self.rotate(p);
        let mut perspective = 1.0 + z / self.distance.max(1.0);
        if perspective.abs() < 1e-4 {
            perspective = 1e-4;
        }
        [(center[0] + x) / perspective, (center[1] + y) / perspective]
    }
}
