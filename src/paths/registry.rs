//! Geometry factory.
//!
//! [`GeometryInputs`] gathers every value that affects a path's shape; the
//! metrics store compares it frame to frame to decide whether to rebuild.

use super::{PathGeometry, PathKind};
use crate::config::{Direction, EffectivePathConfig};
use crate::geometry::{
    find_return_theta, normalize_delta, AnchorRect, BorderLine, Camera, CircleTransition,
    EllipseParams, GeometryError, Projection, SparkEllipse, VertexLabel,
};
use std::f32::consts::PI;

/// Geometry-affecting inputs of one path.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryInputs {
    pub kind: PathKind,
    pub rect: AnchorRect,
    pub projection: Projection,
    pub start_vertex: Option<VertexLabel>,
    pub end_vertex: Option<VertexLabel>,
    pub direction: Direction,
    pub a: f32,
    pub b: f32,
    pub rotation_extra: f32,
    pub tilt_deg: f32,
    pub camera: Camera,
    pub circle_radius: f32,
    pub circle_rotations: f32,
    pub start_point_deg: f32,
    pub coverage_deg: f32,
    pub line_length: f32,
    pub return_journey: bool,
    pub reentry_hysteresis: usize,
}

impl GeometryInputs {
    pub fn from_effective(
        eff: &EffectivePathConfig,
        rect: &AnchorRect,
        projection: Projection,
    ) -> Self {
        Self {
            kind: eff.kind,
            rect: *rect,
            projection,
            start_vertex: eff.start_vertex,
            end_vertex: eff.end_vertex,
            direction: eff.direction,
            a: eff.ellipse_a,
            b: eff.ellipse_b,
            rotation_extra: eff.rotation_extra,
            tilt_deg: eff.plane_tilt_deg,
            camera: eff.camera,
            circle_radius: eff.circle_radius,
            circle_rotations: eff.circle_rotations,
            start_point_deg: eff.start_point_deg,
            coverage_deg: eff.coverage_deg,
            line_length: eff.segment_length,
            return_journey: eff.return_journey,
            reentry_hysteresis: eff.reentry_hysteresis,
        }
    }
}

/// Build the geometry of one path.
///
/// # Example
/// ```
/// use betspot_glow::config::{resolve_effective_path_config, GlobalConfig, PathConfig};
/// use betspot_glow::geometry::{AnchorRect, Projection};
/// use betspot_glow::paths::{build_geometry, GeometryInputs, PathKind, PathShape};
///
/// let rect = AnchorRect::new(400.0, 400.0, 200.0, 200.0);
/// let eff = resolve_effective_path_config(
///     &GlobalConfig::default(),
///     &PathConfig::spark(1, "TR", "BL"),
///     Some(&rect),
/// );
/// let geometry = build_geometry(&GeometryInputs::from_effective(&eff, &rect, Projection::Flat)).unwrap();
/// assert_eq!(geometry.kind(), PathKind::Spark);
/// ```
pub fn build_geometry(inputs: &GeometryInputs) -> Result<PathGeometry, GeometryError> {
    match inputs.kind {
        PathKind::Spark => build_spark(inputs).map(PathGeometry::Spark),
        PathKind::Circle => build_circle(inputs).map(PathGeometry::Circle),
        PathKind::Line => Ok(PathGeometry::Line(build_line(inputs))),
    }
}

fn build_spark(inputs: &GeometryInputs) -> Result<SparkEllipse, GeometryError> {
    let start = inputs.start_vertex.ok_or(GeometryError::MissingVertex("start"))?;
    let end = inputs.end_vertex.ok_or(GeometryError::MissingVertex("end"))?;

    let start_angle = start.screen_angle();
    let mut delta = normalize_delta(end.screen_angle() - start_angle);
    if delta.abs() < 1e-6 {
        delta = PI;
    }
    let dir = inputs
        .direction
        .sign()
        .unwrap_or(if delta < 0.0 { -1.0 } else { 1.0 });

    let params = EllipseParams {
        center: inputs.rect.center(),
        a: inputs.a,
        b: inputs.b,
        rotation: start_angle + inputs.rotation_extra,
        tilt_deg: inputs.tilt_deg,
        projection: inputs.projection,
        camera: inputs.camera,
    };

    let mut theta_end = dir * delta.abs();
    if inputs.return_journey {
        let journey = find_return_theta(
            &params,
            theta_end,
            &inputs.rect,
            inputs.reentry_hysteresis,
        );
        if !journey.reentered {
            log::warn!(
                "Spark {}->{} never re-entered the anchor, using one extra revolution",
                start.name(),
                end.name()
            );
        }
        theta_end = journey.theta_end;
    }

    Ok(SparkEllipse::new(params, theta_end))
}

fn build_circle(inputs: &GeometryInputs) -> Result<CircleTransition, GeometryError> {
    let start = inputs.start_vertex.unwrap_or(VertexLabel::BottomRight);
    if !start.is_corner() {
        return Err(GeometryError::NotACorner(start));
    }
    let clockwise = inputs.direction != Direction::Anticlockwise;
    Ok(CircleTransition::new(
        inputs.rect.center(),
        start.math_offset(Some(&inputs.rect)),
        inputs.a,
        inputs.circle_radius,
        clockwise,
        inputs.circle_rotations,
    ))
}

fn build_line(inputs: &GeometryInputs) -> BorderLine {
    BorderLine::new(
        inputs.rect,
        inputs.start_point_deg,
        inputs.direction != Direction::Anticlockwise,
        inputs.coverage_deg,
        inputs.line_length,
    )
}
