//! Circle-transition paths.
//!
//! The path leaves a corner along a thin ellipse lying on the corner's
//! diagonal, meets a small circle a quarter turn past the corner's polar
//! angle, then orbits that circle a fixed number of times. Geometry is
//! computed in math space (Y-up) and flipped to screen space on output.

use super::{
    arc_length, minimize_distance, normalize_delta, Point, Solution, ARC_LENGTH_SAMPLES,
};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

#[derive(Debug, Clone, PartialEq)]
pub struct CircleTransition {
    center: Point,
    a: f32,
    radius: f32,
    rotation: f32,
    clockwise: bool,
    rotations: f32,
    start_theta: f32,
    sweep: f32,
    meeting: Solution,
    meeting_circle_angle: f32,
    ellipse_length: f32,
    circle_length: f32,
    ellipse_portion: f32,
    circle_portion: f32,
}

impl CircleTransition {
    /// Build the path.
    ///
    /// `start_offset` is the start corner's math-space offset from `center`;
    /// the ellipse has semi-axes `a` and `radius`.
    pub fn new(
        center: Point,
        start_offset: [f32; 2],
        a: f32,
        radius: f32,
        clockwise: bool,
        rotations: f32,
    ) -> Self {
        let rotation = diagonal_rotation(start_offset);
        let ellipse = |theta: f32| ellipse_point(a, radius, rotation, theta);

        let start = minimize_distance(ellipse, start_offset, 0.0, TAU);
        if !start.converged {
            log::warn!(
                "Circle path start is {:.2}px off the ellipse, using closest point",
                start.error
            );
        }

        let start_angle = start_offset[1].atan2(start_offset[0]);
        let meeting_angle = if clockwise {
            start_angle - FRAC_PI_2
        } else {
            start_angle + FRAC_PI_2
        };
        let target = [radius * meeting_angle.cos(), radius * meeting_angle.sin()];
        let meeting = minimize_distance(ellipse, target, 0.0, TAU);
        if !meeting.converged {
            log::warn!(
                "Circle meeting point did not converge (error {:.2}px)",
                meeting.error
            );
        }

        let sweep = normalize_delta(meeting.theta - start.theta);
        let meeting_point = ellipse(meeting.theta);
        let meeting_circle_angle = meeting_point[1].atan2(meeting_point[0]);

        let ellipse_length = arc_length(
            start.theta,
            start.theta + sweep,
            ARC_LENGTH_SAMPLES,
            ellipse,
        );
        let circle_length = rotations * TAU * radius;
        let total = ellipse_length + circle_length;
        let ellipse_portion = if total > 0.0 {
            ellipse_length / total
        } else {
            0.0
        };

        Self {
            center,
            a,
            radius,
            rotation,
            clockwise,
            rotations,
            start_theta: start.theta,
            sweep,
            meeting,
            meeting_circle_angle,
            ellipse_length,
            circle_length,
            ellipse_portion,
            circle_portion: 1.0 - ellipse_portion,
        }
    }

    /// Screen position at path parameter `t` in [0, 1].
    pub fn position(&self, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        let [x, y] = if self.ellipse_portion > 0.0 && t <= self.ellipse_portion {
            let u = t / self.ellipse_portion;
            ellipse_point(
                self.a,
                self.radius,
                self.rotation,
                self.start_theta + self.sweep * u,
            )
        } else {
            let u = if self.circle_portion > 0.0 {
                (t - self.ellipse_portion) / self.circle_portion
            } else {
                1.0
            };
            let dir = if self.clockwise { -1.0 } else { 1.0 };
            let angle = self.meeting_circle_angle + dir * self.rotations * TAU * u;
            [self.radius * angle.cos(), self.radius * angle.sin()]
        };
        [self.center[0] + x, self.center[1] - y]
    }

    pub fn total_length(&self) -> f32 {
        self.ellipse_length + self.circle_length
    }

    pub fn ellipse_length(&self) -> f32 {
        self.ellipse_length
    }

    pub fn circle_length(&self) -> f32 {
        self.circle_length
    }

    pub fn ellipse_portion(&self) -> f32 {
        self.ellipse_portion
    }

    pub fn circle_portion(&self) -> f32 {
        self.circle_portion
    }

    pub fn start_theta(&self) -> f32 {
        self.start_theta
    }

    pub fn meeting(&self) -> Solution {
        self.meeting
    }

    pub fn meeting_circle_angle(&self) -> f32 {
        self.meeting_circle_angle
    }

    /// Math-space rotation of the ellipse's major axis.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

/// 135 degrees for the BR/TL diagonal, 45 degrees for TR/BL.
fn diagonal_rotation(offset: [f32; 2]) -> f32 {
    if offset[0] * offset[1] < 0.0 {
        3.0 * FRAC_PI_4
    } else {
        FRAC_PI_4
    }
}

fn ellipse_point(a: f32, b: f32, rotation: f32, theta: f32) -> Point {
    let x = a * theta.cos();
    let y = b * theta.sin();
    let (s, c) = rotation.sin_cos();
    [c * x - s * y, s * x + c * y]
}
