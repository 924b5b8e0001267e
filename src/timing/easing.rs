//! Easing curves, selectable per path kind.

use crate::config::PathKind;
use serde::{Deserialize, Serialize};

/// Plain function easing hook.
pub type EasingFn = fn(f32) -> f32;

/// An easing curve mapping normalized time in [0, 1] to progress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    /// `1 - (1 - t)^2`
    OutQuad,
    /// `1 - (1 - t)^exponent`
    OutPow { exponent: f32 },
    /// `t^exponent`
    InPow { exponent: f32 },
    InOutCubic,
    /// Caller-supplied curve; not serializable.
    #[serde(skip)]
    Custom(EasingFn),
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            Easing::Linear => t,
            Easing::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::OutPow { exponent } => 1.0 - (1.0 - t).powf(exponent),
            Easing::InPow { exponent } => t.powf(exponent),
            Easing::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Custom(f) => f(t),
        }
    }
}

/// One easing per path kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EasingSet {
    pub spark: Easing,
    pub circle: Easing,
    pub line: Easing,
}

impl Default for EasingSet {
    fn default() -> Self {
        Self {
            spark: Easing::OutPow { exponent: 2.25 },
            circle: Easing::InPow { exponent: 1.5 },
            line: Easing::InOutCubic,
        }
    }
}

impl EasingSet {
    /// The same curve for every kind.
    pub fn uniform(easing: Easing) -> Self {
        Self {
            spark: easing,
            circle: easing,
            line: easing,
        }
    }

    pub fn for_kind(&self, kind: PathKind) -> Easing {
        match kind {
            PathKind::Spark => self.spark,
            PathKind::Circle => self.circle,
            PathKind::Line => self.line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::OutQuad,
        Easing::OutPow { exponent: 2.25 },
        Easing::InPow { exponent: 1.5 },
        Easing::InOutCubic,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{:?}", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{:?}", easing);
        }
    }

    #[test]
    fn test_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v >= prev - 1e-6, "{:?} decreased at {}", easing, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
        assert_eq!(Easing::Linear.apply(f32::NAN), 0.0);
    }

    #[test]
    fn test_custom_hook() {
        fn step(t: f32) -> f32 {
            if t < 0.5 {
                0.0
            } else {
                1.0
            }
        }
        assert_eq!(Easing::Custom(step).apply(0.7), 1.0);
    }

    #[test]
    fn test_defaults_per_kind() {
        let set = EasingSet::default();
        assert!((set.for_kind(PathKind::Circle).apply(0.25) - 0.125).abs() < 1e-6);
        assert!((set.for_kind(PathKind::Line).apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_deserialize() {
        let e: Easing = serde_json::from_str(r#"{"outPow":{"exponent":3.0}}"#).unwrap();
        assert!((e.apply(0.5) - 0.875).abs() < 1e-6);
        let e: Easing = serde_json::from_str(r#""linear""#).unwrap();
        assert_eq!(e.apply(0.3), 0.3);
    }
}
