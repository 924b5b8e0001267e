//! Merge of global defaults and per-path overrides.

use super::{
    delay_to_seconds, parse_hex_color, resolve_number, Direction, GlobalConfig, PathConfig,
    PathId, PathKind, DEFAULT_GLOW_COLOR, DEFAULT_SPARK_COLOR,
};
use crate::geometry::{AnchorRect, Camera, VertexLabel};
use crate::render::SegmentStyle;
use crate::timing::{Easing, PhaseParams};

/// Spark semi-major axis when no anchor is available.
const SPARK_FALLBACK_A: f32 = 150.0;
/// Circle semi-major axis when no anchor is available.
const CIRCLE_FALLBACK_A: f32 = 141.4214;
/// Border line length when no anchor is available.
const LINE_FALLBACK_LENGTH: f32 = 100.0;

/// Fully resolved parameters of one path, consumed by geometry and renderers.
#[derive(Debug, Clone)]
pub struct EffectivePathConfig {
    pub id: PathId,
    pub kind: PathKind,
    pub start_vertex: Option<VertexLabel>,
    pub end_vertex: Option<VertexLabel>,
    pub delay_sec: f32,
    pub duration_sec: f32,
    pub fade_in_sec: f32,
    pub fade_out_sec: f32,
    pub overshoot: f32,
    pub fade_window: f32,
    /// Visible segment length in pixels.
    pub segment_length: f32,
    pub ellipse_a: f32,
    pub ellipse_b: f32,
    /// Extra rotation of the spark ellipse, radians.
    pub rotation_extra: f32,
    pub plane_tilt_deg: f32,
    pub camera: Camera,
    pub direction: Direction,
    pub circle_radius: f32,
    pub circle_rotations: f32,
    pub start_point_deg: f32,
    pub coverage_deg: f32,
    pub return_journey: bool,
    pub reentry_hysteresis: usize,
    pub style: SegmentStyle,
    pub easing: Easing,
}

impl EffectivePathConfig {
    /// Phase inputs for a path whose geometry is `path_length` pixels long.
    pub fn phase_params(&self, path_length: f32) -> PhaseParams {
        PhaseParams {
            delay_sec: self.delay_sec,
            duration_sec: self.duration_sec,
            segment_fraction: self.segment_length / path_length.max(1e-4),
            overshoot: self.overshoot,
            fade_window: self.fade_window,
            fade_in_sec: self.fade_in_sec,
            fade_out_sec: self.fade_out_sec,
        }
    }
}

/// Resolve one path against the global defaults.
///
/// Missing or non-finite numbers fall back to the global value, then to the
/// built-in default. `rect` drives the auto-sized ellipse and line length.
pub fn resolve_effective_path_config(
    global: &GlobalConfig,
    path: &PathConfig,
    rect: Option<&AnchorRect>,
) -> EffectivePathConfig {
    let defaults = GlobalConfig::default();
    let num = |over: Option<f32>, global: f32, fallback: f32| {
        resolve_number(over, resolve_number(Some(global), fallback))
    };
    let rect = rect.filter(|r| r.is_valid());
    let kind = path.resolved_kind();

    let mut start_vertex = path.start_vertex.as_deref().map(VertexLabel::resolve);
    if kind == PathKind::Circle && start_vertex.is_none() {
        start_vertex = Some(VertexLabel::BottomRight);
    }
    let end_vertex = path.end_vertex.as_deref().map(VertexLabel::resolve);

    let circle_radius = num(path.circle_radius, global.circle_radius, defaults.circle_radius).max(0.0);
    let path_ellipse = path.ellipse.unwrap_or_default();
    let (ellipse_a, ellipse_b) = match kind {
        PathKind::Circle => (
            rect.map_or(CIRCLE_FALLBACK_A, |r| r.diagonal() / 2.0),
            circle_radius,
        ),
        _ => {
            let auto_a = rect.map_or(SPARK_FALLBACK_A, |r| 10.0 + r.diagonal() / 2.0);
            let a = resolve_number(path_ellipse.a, resolve_number(global.ellipse.a, auto_a));
            let b = resolve_number(path_ellipse.b, resolve_number(global.ellipse.b, 12.0));
            (a.max(0.0), b.max(0.0))
        }
    };

    let segment_length = match kind {
        PathKind::Line => resolve_number(
            path.length,
            rect.map_or(LINE_FALLBACK_LENGTH, |r| (r.width + r.height) / 2.0),
        ),
        _ => num(path.length, global.length, defaults.length),
    }
    .max(0.0);

    let style = SegmentStyle {
        head_radius: num(path.head_radius, global.head_radius, defaults.head_radius).max(0.0),
        tail_radius: num(path.tail_radius, global.tail_radius, defaults.tail_radius).max(0.0),
        glow_radius: num(path.glow_radius, global.glow_radius, defaults.glow_radius).max(0.0),
        spark_color: resolve_color(
            path.spark_color.as_deref().unwrap_or(&global.spark_color),
            DEFAULT_SPARK_COLOR,
        ),
        glow_color: resolve_color(
            path.glow_color.as_deref().unwrap_or(&global.glow_color),
            DEFAULT_GLOW_COLOR,
        ),
    };

    let camera = Camera {
        distance: num(path.camera_distance, global.camera_distance, defaults.camera_distance)
            .max(1.0),
        tilt_x: num(path.view_tilt_x_deg, global.view_tilt_x_deg, 0.0).to_radians(),
        tilt_y: num(path.view_tilt_y_deg, global.view_tilt_y_deg, 0.0).to_radians(),
        depth_amplitude: num(path.depth_amplitude, global.depth_amplitude, 0.0),
        depth_phase: num(path.depth_phase_deg, global.depth_phase_deg, 0.0).to_radians(),
    };

    EffectivePathConfig {
        id: path.id,
        kind,
        start_vertex,
        end_vertex,
        delay_sec: delay_to_seconds(resolve_number(path.delay, 0.0)),
        duration_sec: num(
            path.animation_time_ms,
            global.animation_time_ms,
            defaults.animation_time_ms,
        )
        .max(1.0)
            / 1000.0,
        fade_in_sec: resolve_number(path.fade_in_ms, 0.0).max(0.0) / 1000.0,
        fade_out_sec: resolve_number(path.fade_out_ms, 0.0).max(0.0) / 1000.0,
        overshoot: num(path.overshoot, global.overshoot, defaults.overshoot).max(0.0),
        fade_window: num(path.fade_window, global.fade_window, defaults.fade_window).max(0.0),
        segment_length,
        ellipse_a,
        ellipse_b,
        rotation_extra: num(path.ellipse_rotation_deg, global.ellipse_rotation_deg, 0.0)
            .to_radians(),
        plane_tilt_deg: num(path.ellipse_tilt_deg, global.ellipse_tilt_deg, 0.0),
        camera,
        direction: path.direction.unwrap_or(global.direction),
        circle_radius,
        circle_rotations: num(path.circle_rotations, global.circle_rotations, 2.0).max(0.0),
        start_point_deg: resolve_number(path.start_point, 0.0),
        coverage_deg: resolve_number(path.coverage, 360.0).max(0.0),
        return_journey: path.return_journey.unwrap_or(global.return_journey),
        reentry_hysteresis: path
            .reentry_hysteresis
            .unwrap_or(global.reentry_hysteresis)
            .max(1) as usize,
        style,
        easing: global.easing.for_kind(kind),
    }
}

fn resolve_color(hex: &str, fallback: &str) -> [f32; 3] {
    parse_hex_color(hex)
        .or_else(|| {
            log::warn!("Invalid color {:?}, using {}", hex, fallback);
            parse_hex_color(fallback)
        })
        .unwrap_or([1.0, 1.0, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> AnchorRect {
        AnchorRect::new(400.0, 400.0, 200.0, 200.0)
    }

    #[test]
    fn test_global_defaults_flow_through() {
        let global = GlobalConfig::default();
        let eff = resolve_effective_path_config(&global, &PathConfig::spark(1, "TR", "BL"), Some(&rect()));
        assert_eq!(eff.kind, PathKind::Spark);
        assert_eq!(eff.start_vertex, Some(VertexLabel::TopRight));
        assert_eq!(eff.end_vertex, Some(VertexLabel::BottomLeft));
        assert!((eff.duration_sec - 1.2).abs() < 1e-6);
        assert_eq!(eff.segment_length, 300.0);
        assert_eq!(eff.ellipse_b, 12.0);
        assert!((eff.ellipse_a - (10.0 + 141.421_36)).abs() < 1e-3);
        assert_eq!(eff.style.glow_radius, 20.0);
        assert_eq!(eff.reentry_hysteresis, 10);
    }

    #[test]
    fn test_path_overrides_win() {
        let global = GlobalConfig::default();
        let path = PathConfig {
            glow_radius: Some(5.0),
            head_radius: Some(f32::NAN),
            ellipse: Some(crate::config::EllipseConfig {
                a: Some(141.42),
                b: None,
            }),
            delay: Some(250.0),
            spark_color: Some("#ff0000".into()),
            ..PathConfig::spark(3, "BR", "TL")
        };
        let eff = resolve_effective_path_config(&global, &path, Some(&rect()));
        assert_eq!(eff.style.glow_radius, 5.0);
        assert_eq!(eff.style.head_radius, 10.0);
        assert_eq!(eff.ellipse_a, 141.42);
        assert!((eff.delay_sec - 0.25).abs() < 1e-6);
        assert_eq!(eff.style.spark_color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_circle_axes_follow_anchor() {
        let global = GlobalConfig::default();
        let path = PathConfig {
            start_vertex: None,
            ..PathConfig::circle(2, "BR", 25.0)
        };
        let eff = resolve_effective_path_config(&global, &path, Some(&rect()));
        assert_eq!(eff.start_vertex, Some(VertexLabel::BottomRight));
        assert!((eff.ellipse_a - 141.421_36).abs() < 1e-3);
        assert_eq!(eff.ellipse_b, 25.0);

        let no_rect = resolve_effective_path_config(&global, &path, None);
        assert_eq!(no_rect.ellipse_a, CIRCLE_FALLBACK_A);
    }

    #[test]
    fn test_line_length_defaults_to_average_side() {
        let global = GlobalConfig::default();
        let anchor = AnchorRect::new(0.0, 0.0, 300.0, 100.0);
        let eff = resolve_effective_path_config(&global, &PathConfig::line(4, 0.0), Some(&anchor));
        assert_eq!(eff.segment_length, 200.0);
        assert_eq!(eff.coverage_deg, 360.0);
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let global = GlobalConfig {
            glow_color: "nope".into(),
            ..Default::default()
        };
        let eff = resolve_effective_path_config(&global, &PathConfig::spark(1, "TL", "BR"), None);
        assert_eq!(eff.style.glow_color, parse_hex_color(DEFAULT_GLOW_COLOR).unwrap());
        assert_eq!(eff.ellipse_a, SPARK_FALLBACK_A);
    }

    #[test]
    fn test_phase_params_segment_fraction() {
        let global = GlobalConfig {
            length: 100.0,
            ..Default::default()
        };
        let eff = resolve_effective_path_config(&global, &PathConfig::spark(1, "TL", "BR"), None);
        let params = eff.phase_params(400.0);
        assert_eq!(params.segment_fraction, 0.25);
        assert_eq!(params.overshoot, 0.08);
    }
}
