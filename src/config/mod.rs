//! Animation configuration.
//!
//! [`GlobalConfig`] carries animation-wide defaults and the list of
//! [`PathConfig`]s. Both deserialize from camelCase JSON supplied by the host.
//! Every per-path field is an optional override; the merge into a fully
//! resolved parameter set happens once in [`resolve_effective_path_config`].

mod color;
mod effective;

pub use color::parse_hex_color;
pub use effective::{resolve_effective_path_config, EffectivePathConfig};

use crate::timing::EasingSet;
use serde::{Deserialize, Serialize};

/// Stable identifier of a path across frames.
pub type PathId = u32;

/// Default spark core color.
pub const DEFAULT_SPARK_COLOR: &str = "#ffffe0";
/// Default glow halo color.
pub const DEFAULT_GLOW_COLOR: &str = "#fffba4";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid color: {0}")]
    Color(String),
}

/// Kind of path a [`PathConfig`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// Arc between two vertices on an ellipse.
    #[default]
    Spark,
    /// Corner-to-circle transition followed by full orbits.
    Circle,
    /// Line travelling along the anchor border.
    Line,
}

impl PathKind {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spark" | "ellipse" | "arc" => Some(Self::Spark),
            "circle" | "orbit" => Some(Self::Circle),
            "line" | "border" => Some(Self::Line),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Spark => "spark",
            Self::Circle => "circle",
            Self::Line => "line",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Spark => "Glowing segment on an elliptical arc between two vertices",
            Self::Circle => "Arc from a corner into a small circle, then full orbits",
            Self::Line => "Fixed-length line sliding along the anchor border",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Spark, Self::Circle, Self::Line]
    }
}

/// Travel direction. `Auto` follows the shortest arc between vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Clockwise,
    Anticlockwise,
    #[default]
    Auto,
}

impl Direction {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clockwise" | "cw" => Some(Self::Clockwise),
            "anticlockwise" | "counterclockwise" | "ccw" => Some(Self::Anticlockwise),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    /// Sign of travel in screen angles, or `None` for `Auto`.
    pub fn sign(&self) -> Option<f32> {
        match self {
            Self::Clockwise => Some(1.0),
            Self::Anticlockwise => Some(-1.0),
            Self::Auto => None,
        }
    }
}

/// Ellipse semi-axes; a missing `a` is derived from the anchor diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EllipseConfig {
    pub a: Option<f32>,
    pub b: Option<f32>,
}

/// Animation-wide defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalConfig {
    #[serde(alias = "duration")]
    pub animation_time_ms: f32,
    pub glow_radius: f32,
    #[serde(alias = "centerRadius")]
    pub head_radius: f32,
    #[serde(alias = "endRadius")]
    pub tail_radius: f32,
    pub ellipse: EllipseConfig,
    /// Visible segment length in pixels.
    pub length: f32,
    pub spark_color: String,
    pub glow_color: String,
    pub camera_distance: f32,
    pub view_tilt_x_deg: f32,
    pub view_tilt_y_deg: f32,
    pub depth_amplitude: f32,
    pub depth_phase_deg: f32,
    pub ellipse_rotation_deg: f32,
    pub ellipse_tilt_deg: f32,
    pub overshoot: f32,
    pub fade_window: f32,
    pub direction: Direction,
    pub circle_radius: f32,
    pub circle_rotations: f32,
    pub return_journey: bool,
    /// Consecutive outside samples required before re-entry counts.
    pub reentry_hysteresis: u32,
    pub easing: EasingSet,
    pub paths: Vec<PathConfig>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            animation_time_ms: 1200.0,
            glow_radius: 20.0,
            head_radius: 10.0,
            tail_radius: 2.0,
            ellipse: EllipseConfig {
                a: None,
                b: Some(12.0),
            },
            length: 300.0,
            spark_color: DEFAULT_SPARK_COLOR.to_string(),
            glow_color: DEFAULT_GLOW_COLOR.to_string(),
            camera_distance: 4000.0,
            view_tilt_x_deg: 0.0,
            view_tilt_y_deg: 0.0,
            depth_amplitude: 0.0,
            depth_phase_deg: 0.0,
            ellipse_rotation_deg: 0.0,
            ellipse_tilt_deg: 0.0,
            overshoot: 0.08,
            fade_window: 0.08,
            direction: Direction::Auto,
            circle_radius: 30.0,
            circle_rotations: 2.0,
            return_journey: false,
            reentry_hysteresis: 10,
            easing: EasingSet::default(),
            paths: Vec::new(),
        }
    }
}

impl GlobalConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Example
    /// ```
    /// use betspot_glow::config::{GlobalConfig, PathKind};
    ///
    /// let config = GlobalConfig::from_json(
    ///     r#"{"animationTimeMs": 900, "paths": [{"id": 1, "type": "circle", "startVertex": "BR"}]}"#,
    /// ).unwrap();
    /// assert_eq!(config.animation_time_ms, 900.0);
    /// assert_eq!(config.paths[0].resolved_kind(), PathKind::Circle);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        for color in [&config.spark_color, &config.glow_color] {
            if parse_hex_color(color).is_none() {
                return Err(ConfigError::Color(color.clone()));
            }
        }
        Ok(config)
    }

    pub fn with_paths(mut self, paths: Vec<PathConfig>) -> Self {
        self.paths = paths;
        self
    }

    /// Paths not explicitly disabled.
    pub fn enabled_paths(&self) -> impl Iterator<Item = &PathConfig> {
        self.paths.iter().filter(|p| p.is_enabled())
    }
}

/// One path definition. Every `Option` overrides the global value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathConfig {
    pub id: PathId,
    #[serde(rename = "type")]
    pub kind: Option<PathKind>,
    pub start_vertex: Option<String>,
    pub end_vertex: Option<String>,
    /// Border start, degrees (360 is a full loop).
    pub start_point: Option<f32>,
    /// Border travel, degrees of a full loop.
    pub coverage: Option<f32>,
    /// Seconds when `<= 20`, milliseconds otherwise.
    pub delay: Option<f32>,
    pub enabled: Option<bool>,
    pub direction: Option<Direction>,
    #[serde(alias = "fadeIn")]
    pub fade_in_ms: Option<f32>,
    #[serde(alias = "fadeOut")]
    pub fade_out_ms: Option<f32>,

    #[serde(alias = "duration")]
    pub animation_time_ms: Option<f32>,
    pub glow_radius: Option<f32>,
    #[serde(alias = "centerRadius")]
    pub head_radius: Option<f32>,
    #[serde(alias = "endRadius")]
    pub tail_radius: Option<f32>,
    pub ellipse: Option<EllipseConfig>,
    pub length: Option<f32>,
    pub spark_color: Option<String>,
    pub glow_color: Option<String>,
    pub camera_distance: Option<f32>,
    pub view_tilt_x_deg: Option<f32>,
    pub view_tilt_y_deg: Option<f32>,
    pub depth_amplitude: Option<f32>,
    pub depth_phase_deg: Option<f32>,
    pub ellipse_rotation_deg: Option<f32>,
    pub ellipse_tilt_deg: Option<f32>,
    pub overshoot: Option<f32>,
    pub fade_window: Option<f32>,
    pub circle_radius: Option<f32>,
    pub circle_rotations: Option<f32>,
    pub return_journey: Option<bool>,
    pub reentry_hysteresis: Option<u32>,
}

impl PathConfig {
    /// Path of `kind` with every other field left to the global defaults.
    pub fn new(id: PathId, kind: PathKind) -> Self {
        Self {
            id,
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Spark path between two vertex labels.
    pub fn spark(id: PathId, start: &str, end: &str) -> Self {
        Self {
            id,
            kind: Some(PathKind::Spark),
            start_vertex: Some(start.to_string()),
            end_vertex: Some(end.to_string()),
            ..Default::default()
        }
    }

    /// Circle-transition path starting at a corner.
    pub fn circle(id: PathId, start: &str, radius: f32) -> Self {
        Self {
            id,
            kind: Some(PathKind::Circle),
            start_vertex: Some(start.to_string()),
            circle_radius: Some(radius),
            ..Default::default()
        }
    }

    /// Border line starting at `start_point` degrees.
    pub fn line(id: PathId, start_point: f32) -> Self {
        Self {
            id,
            kind: Some(PathKind::Line),
            start_point: Some(start_point),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_duration_ms(mut self, ms: f32) -> Self {
        self.animation_time_ms = Some(ms);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }

    /// Explicit kind, else circle when a circle radius is set, else spark.
    pub fn resolved_kind(&self) -> PathKind {
        match self.kind {
            Some(kind) => kind,
            None if self.circle_radius.is_some() => PathKind::Circle,
            None => PathKind::Spark,
        }
    }
}

/// Convert a delay value to seconds.
///
/// Values above 20 are milliseconds, anything else is seconds; NaN is 0.
pub fn delay_to_seconds(value: f32) -> f32 {
    if !value.is_finite() {
        0.0
    } else if value > 20.0 {
        value / 1000.0
    } else {
        value
    }
}

/// `value` unless missing or non-finite, otherwise `fallback`.
pub fn resolve_number(value: Option<f32>, fallback: f32) -> f32 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_unit_rule() {
        assert_eq!(delay_to_seconds(15.0), 15.0);
        assert!((delay_to_seconds(21.0) - 0.021).abs() < 1e-7);
        assert_eq!(delay_to_seconds(20.0), 20.0);
        assert!((delay_to_seconds(20.0001) - 0.020_000_1).abs() < 1e-7);
        assert_eq!(delay_to_seconds(f32::NAN), 0.0);
        assert_eq!(delay_to_seconds(0.0), 0.0);
    }

    #[test]
    fn test_resolve_number() {
        assert_eq!(resolve_number(Some(3.0), 1.0), 3.0);
        assert_eq!(resolve_number(None, 1.0), 1.0);
        assert_eq!(resolve_number(Some(f32::NAN), 1.0), 1.0);
        assert_eq!(resolve_number(Some(f32::INFINITY), 1.0), 1.0);
    }

    #[test]
    fn test_path_kind_from_str() {
        for kind in PathKind::all() {
            assert_eq!(PathKind::from_str(kind.name()), Some(*kind));
        }
        assert_eq!(PathKind::from_str("border"), Some(PathKind::Line));
        assert_eq!(PathKind::from_str("wave"), None);
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!(Direction::from_str("CCW"), Some(Direction::Anticlockwise));
        assert_eq!(Direction::from_str("clockwise"), Some(Direction::Clockwise));
        assert_eq!(Direction::Auto.sign(), None);
    }

    #[test]
    fn test_kind_inferred_from_circle_radius() {
        let path = PathConfig {
            circle_radius: Some(20.0),
            ..Default::default()
        };
        assert_eq!(path.resolved_kind(), PathKind::Circle);
        assert_eq!(PathConfig::default().resolved_kind(), PathKind::Spark);
    }

    #[test]
    fn test_from_json_with_aliases() {
        let config = GlobalConfig::from_json(
            r##"{
                "centerRadius": 8,
                "endRadius": 0,
                "sparkColor": "#ff0000",
                "paths": [
                    {"id": 1, "startVertex": "TR", "endVertex": "BL", "delay": 0},
                    {"id": 2, "type": "line", "startPoint": 90, "enabled": false,
                     "fadeIn": 100, "direction": "anticlockwise"}
                ]
            }"##,
        )
        .unwrap();
        assert_eq!(config.head_radius, 8.0);
        assert_eq!(config.tail_radius, 0.0);
        assert_eq!(config.glow_radius, 20.0);
        assert_eq!(config.enabled_paths().count(), 1);
        assert_eq!(config.paths[1].fade_in_ms, Some(100.0));
        assert_eq!(config.paths[1].direction, Some(Direction::Anticlockwise));
    }

    #[test]
    fn test_from_json_rejects_bad_color() {
        let err = GlobalConfig::from_json(r#"{"glowColor": "purple"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Color(_)));
    }
}
