//! Bounded one-dimensional minimizer.
//!
//! Finds the parameter on a curve closest to a target point: a coarse scan
//! over the whole domain picks the best few local minima, then each is
//! refined with golden-section search inside its scan cell.

use super::{distance, Point};

/// Error (in pixels) under which a solution counts as converged.
pub const CONVERGED_ERROR_PX: f32 = 1.0;

const SCAN_STEPS: usize = 720;
const RESTARTS: usize = 3;
const GOLDEN_ITERATIONS: usize = 60;
const INV_PHI: f32 = 0.618_034;

/// Result of [`minimize_distance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub theta: f32,
    /// Distance from the curve point at `theta` to the target.
    pub error: f32,
    pub converged: bool,
}

/// Minimize `|curve(theta) - target|` for `theta` in `[lo, hi]`.
///
/// Never fails: if nothing gets under [`CONVERGED_ERROR_PX`] the best
/// candidate found is returned with `converged == false`.
pub fn minimize_distance<F>(curve: F, target: Point, lo: f32, hi: f32) -> Solution
where
    F: Fn(f32) -> Point,
{
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let cost = |theta: f32| distance(curve(theta), target);

    let step = (hi - lo) / SCAN_STEPS as f32;
    let scan: Vec<(f32, f32)> = (0..=SCAN_STEPS)
        .map(|i| {
            let theta = lo + step * i as f32;
            (theta, cost(theta))
        })
        .collect();

    // Local minima of the scan, best first.
    let mut starts: Vec<(f32, f32)> = scan
        .iter()
        .enumerate()
        .filter(|(i, (_, e))| {
            let left = if *i == 0 { f32::MAX } else { scan[i - 1].1 };
            let right = scan.get(i + 1).map_or(f32::MAX, |s| s.1);
            *e <= left && *e <= right
        })
        .map(|(_, s)| *s)
        .collect();
    starts.sort_by(|a, b| a.1.total_cmp(&b.1));
    starts.truncate(RESTARTS);

    let mut best = starts.first().copied().unwrap_or((lo, cost(lo)));
    for &(theta, _) in &starts {
        let a = (theta - step).max(lo);
        let b = (theta + step).min(hi);
        let refined = golden_section(&cost, a, b);
        let error = cost(refined);
        if error < best.1 {
            best = (refined, error);
        }
    }

    Solution {
        theta: best.0,
        error: best.1,
        converged: best.1 < CONVERGED_ERROR_PX,
    }
}

fn golden_section<F>(cost: &F, mut a: f32, mut b: f32) -> f32
where
    F: Fn(f32) -> f32,
{
    let mut c = b - (b - a) * INV_PHI;
    let mut d = a + (b - a) * INV_PHI;
    let mut fc = cost(c);
    let mut fd = cost(d);

    for _ in 0..GOLDEN_ITERATIONS {
        if (b - a).abs() < 1e-6 {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - (b - a) * INV_PHI;
            fc = cost(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + (b - a) * INV_PHI;
            fd = cost(d);
        }
    }
    (a + b) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn test_finds_point_on_circle() {
        let circle = |t: f32| [100.0 * t.cos(), 100.0 * t.sin()];
        let sol = minimize_distance(circle, [0.0, 100.0], 0.0, TAU);
        assert!(sol.converged);
        assert!((sol.theta - FRAC_PI_2).abs() < 1e-3);
        assert!(sol.error < 0.05);
    }

    #[test]
    fn test_off_curve_target_reports_not_converged() {
        let circle = |t: f32| [10.0 * t.cos(), 10.0 * t.sin()];
        let sol = minimize_distance(circle, [50.0, 0.0], 0.0, TAU);
        assert!(!sol.converged);
        assert!((sol.error - 40.0).abs() < 0.01);
        assert!(sol.theta.abs() < 1e-2 || (sol.theta - TAU).abs() < 1e-2);
    }

    #[test]
    fn test_thin_ellipse_all_quadrants() {
        let (a, b) = (141.42_f32, 25.0_f32);
        let ellipse = |t: f32| [a * t.cos(), b * t.sin()];
        for k in 0..8 {
            let expected = k as f32 * TAU / 8.0 + 0.1;
            let target = ellipse(expected);
            let sol = minimize_distance(ellipse, target, 0.0, TAU);
            assert!(sol.converged, "quadrant {} error {}", k, sol.error);
            assert!((sol.theta - expected).abs() < 1e-2);
        }
    }

    #[test]
    fn test_swapped_bounds() {
        let line = |t: f32| [t, 0.0];
        let sol = minimize_distance(line, [3.0, 0.0], 10.0, 0.0);
        assert!((sol.theta - 3.0).abs() < 1e-3);
    }
}
