//! Elliptical spark arcs.

use super::{arc_length, AnchorRect, Camera, Point, Projection, ARC_LENGTH_SAMPLES};
use std::f32::consts::TAU;

/// Angular resolution of the return-journey search.
const RETURN_STEPS_PER_REV: usize = 720;

/// Shape and placement of a spark ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseParams {
    pub center: Point,
    /// Semi-major axis in pixels.
    pub a: f32,
    /// Semi-minor axis in pixels.
    pub b: f32,
    /// Screen-space rotation of the major axis (radians).
    pub rotation: f32,
    /// Plane tilt in degrees.
    pub tilt_deg: f32,
    pub projection: Projection,
    pub camera: Camera,
}

impl EllipseParams {
    pub fn flat(center: Point, a: f32, b: f32, rotation: f32) -> Self {
        Self {
            center,
            a,
            b,
            rotation,
            tilt_deg: 0.0,
            projection: Projection::Flat,
            camera: Camera::default(),
        }
    }

    /// Screen position at local ellipse angle `theta`.
    pub fn point_at_theta(&self, theta: f32) -> Point {
        let x = self.a * theta.cos();
        let y = self.b * theta.sin();
        let (s, c) = self.rotation.sin_cos();
        let rotated = [c * x - s * y, s * x + c * y];
        let tilt_offset = (self.tilt_deg / 90.0) * self.b * 0.3;

        match self.projection {
            Projection::Flat => {
                let mut p = rotated;
                if self.tilt_deg.abs() > 0.001 {
                    p[0] += -s * tilt_offset;
                    p[1] += c * tilt_offset;
                }
                [self.center[0] + p[0], self.center[1] + p[1]]
            }
            Projection::Perspective => {
                let z = self.camera.depth(theta);
                let mut p = tilt_about_axis([rotated[0], rotated[1], z], [c, s], self.tilt_deg);
                p[0] += -s * tilt_offset;
                p[1] += c * tilt_offset;
                self.camera.project(p, self.center)
            }
        }
    }
}

/// Rodrigues rotation by `(90 - tilt_deg)` degrees about the in-plane axis `k`.
fn tilt_about_axis(p: [f32; 3], k: [f32; 2], tilt_deg: f32) -> [f32; 3] {
    let len = k[0].hypot(k[1]);
    let [kx, ky] = if len > 1e-4 { [k[0] / len, k[1] / len] } else { k };
    let (st, ct) = (90.0 - tilt_deg).to_radians().sin_cos();
    let omc = 1.0 - ct;

    [
        (ct + kx * kx * omc) * p[0] + kx * ky * omc * p[1] + ky * st * p[2],
        ky * kx * omc * p[0] + (ct + ky * ky * omc) * p[1] - kx * st * p[2],
        -ky * st * p[0] + kx * st * p[1] + ct * p[2],
    ]
}

/// Arc of a spark ellipse from local angle 0 to a signed end angle.
#[derive(Debug, Clone, PartialEq)]
pub struct SparkEllipse {
    params: EllipseParams,
    theta_end: f32,
    length: f32,
}

impl SparkEllipse {
    pub fn new(params: EllipseParams, theta_end: f32) -> Self {
        let length = arc_length(0.0, theta_end, ARC_LENGTH_SAMPLES, |t| {
            params.point_at_theta(t)
        });
        Self {
            params,
            theta_end,
            length,
        }
    }

    pub fn params(&self) -> &EllipseParams {
        &self.params
    }

    /// Signed end angle; its sign is the travel direction.
    pub fn theta_end(&self) -> f32 {
        self.theta_end
    }

    pub fn point_at_theta(&self, theta: f32) -> Point {
        self.params.point_at_theta(theta)
    }

    /// Position at path parameter `t` in [0, 1].
    pub fn position(&self, t: f32) -> Point {
        self.params.point_at_theta(self.theta_end * t.clamp(0.0, 1.0))
    }

    pub fn total_length(&self) -> f32 {
        self.length
    }
}

/// Outcome of [`find_return_theta`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnJourney {
    pub theta_end: f32,
    /// False when no re-entry was found and one extra revolution was used.
    pub reentered: bool,
}

/// Continue past `theta_end` until the ellipse re-enters `rect`.
///
/// Re-entry only counts after `hysteresis` consecutive samples outside.
pub fn find_return_theta(
    params: &EllipseParams,
    theta_end: f32,
    rect: &AnchorRect,
    hysteresis: usize,
) -> ReturnJourney {
    let dir = if theta_end < 0.0 { -1.0 } else { 1.0 };
    let step = dir * TAU / RETURN_STEPS_PER_REV as f32;
    let mut outside = 0usize;
    let mut armed = false;

    for i in 1..=RETURN_STEPS_PER_REV {
        let theta = theta_end + step * i as f32;
        if rect.contains(params.point_at_theta(theta)) {
            if armed {
                return ReturnJourney {
                    theta_end: theta,
                    reentered: true,
                };
            }
            outside = 0;
        } else {
            outside += 1;
            if outside >= hysteresis {
                armed = true;
            }
        }
    }

    ReturnJourney {
        theta_end: theta_end + dir * TAU,
        reentered: false,
    }
}
