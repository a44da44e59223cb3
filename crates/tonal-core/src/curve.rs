//! Catmull-Rom splines converted to cubic Béziers, baked into lookup tables.
//!
//! Smooth color scales are built one channel at a time: the control points
//! are `(domain position, channel value)` pairs, each span between two
//! control points becomes a cubic Bézier, and each Bézier is sampled into a
//! table indexed by rounded x.
//!
//! # Algorithm
//! For the span `P1 → P2` with neighbors `P0` and `P3`, the uniform
//! Catmull-Rom segment equals the Bézier with handles:
//! ```text
//! B1 = P1 + (P2 - P0) / 6
//! B2 = P2 - (P3 - P1) / 6
//! ```
//! Missing neighbors at either end are linearly extrapolated
//! (`P0 = 2·V0 - V1`, `P3 = 2·Vn - Vn-1`).
//!
//! # Complexity
//! - Convert: O(N)
//! - Bake one segment: O(length of the segment)
//! - Lookup: O(1)

use glam::DVec2;

/// A 2D control point.
pub type Point = DVec2;

/// Cubic Bézier as `[start, handle1, handle2, end]`.
pub type CubicBezier = [Point; 4];

/// Polyline sample count used by [`approximate_bezier_len`] by default.
pub const DEFAULT_LENGTH_STEPS: usize = 10;

/// Fraction of the arc length used as the number of sampling steps.
const SAMPLES_PER_UNIT_LENGTH: f64 = 0.75;

/// Convert a Catmull-Rom control polygon into `n - 1` Bézier segments.
///
/// Fewer than two points produce no segments.
pub fn catmull_to_bezier(points: &[Point]) -> Vec<CubicBezier> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let before_first = 2.0 * points[0] - points[1];
    let after_last = 2.0 * points[n - 1] - points[n - 2];

    (0..n - 1)
        .map(|i| {
            let p0 = if i > 0 { points[i - 1] } else { before_first };
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = if i + 2 < n { points[i + 2] } else { after_last };

            [p1, p1 + (p2 - p0) / 6.0, p2 - (p3 - p1) / 6.0, p2]
        })
        .collect()
}

/// Point on a cubic Bézier at parameter `t` in `[0, 1]`.
pub fn bezier_point(curve: &CubicBezier, t: f64) -> Point {
    let [p0, p1, p2, p3] = *curve;
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}

/// Arc length estimated as a polyline through `steps + 1` uniform samples.
pub fn approximate_bezier_len(curve: &CubicBezier, steps: usize) -> f64 {
    let steps = steps.max(1);
    let mut length = 0.0;
    let mut prev = curve[0];
    for i in 1..=steps {
        let p = bezier_point(curve, i as f64 / steps as f64);
        length += p.distance(prev);
        prev = p;
    }
    length
}

/// Round half up, the rounding used throughout the scale engine.
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// A baked segment: `y` values indexed by rounded `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveLookup {
    table: Vec<Option<f64>>,
}

impl CurveLookup {
    /// Value at `round(x)`, or `None` when that index is outside the table.
    pub fn get(&self, x: f64) -> Option<f64> {
        let idx = round_half_up(x);
        if idx.is_nan() || idx < 0.0 || idx >= self.table.len() as f64 {
            return None;
        }
        self.table[idx as usize]
    }

    /// Number of indices in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Sample a Bézier segment into a [`CurveLookup`].
///
/// Samples `floor(0.75 × length)` uniform steps in `t` (at least one). Each
/// sample stores its `y` at `round(x)` with the last write winning; forward
/// jumps of more than one index are filled linearly, and indices before the
/// first sample take the first stored value. Negative `x` is ignored.
pub fn prepare_curve(curve: &CubicBezier) -> CurveLookup {
    let length = approximate_bezier_len(curve, DEFAULT_LENGTH_STEPS);
    let steps = ((length * SAMPLES_PER_UNIT_LENGTH).floor() as usize).max(1);

    let mut table: Vec<Option<f64>> = Vec::new();
    let mut prev: Option<(usize, f64)> = None;

    for i in 0..=steps {
        let p = bezier_point(curve, i as f64 / steps as f64);
        let idx = round_half_up(p.x);
        if !idx.is_finite() || idx < 0.0 || !p.y.is_finite() {
            continue;
        }
        let idx = idx as usize;
        if table.len() <= idx {
            table.resize(idx + 1, None);
        }

        if let Some((prev_idx, prev_y)) = prev {
            if idx > prev_idx + 1 {
                let span = (idx - prev_idx) as f64;
                for k in prev_idx + 1..idx {
                    let frac = (k - prev_idx) as f64 / span;
                    table[k] = Some(prev_y + (p.y - prev_y) * frac);
                }
            }
        }

        table[idx] = Some(p.y);
        prev = Some((idx, p.y));
    }

    // Back-fill leading gaps from the first stored value.
    for i in (0..table.len().saturating_sub(1)).rev() {
        if table[i].is_none() {
            table[i] = table[i + 1];
        }
    }

    CurveLookup { table }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn points(raw: &[[f64; 2]]) -> Vec<Point> {
        raw.iter().map(|&[x, y]| Point::new(x, y)).collect()
    }

    #[test]
    fn test_bezier_segments_join_control_points() {
        let pts = points(&[[0.0, 10.0], [100.0, 40.0], [250.0, 20.0], [400.0, 80.0]]);
        let segments = catmull_to_bezier(&pts);
        assert_eq!(segments.len(), 3);
        for (i, seg) in segments.iter().enumerate() {
            assert_eq!(seg[0], pts[i]);
            assert_eq!(seg[3], pts[i + 1]);
        }
    }

    #[test]
    fn test_fewer_than_two_points_have_no_segments() {
        assert!(catmull_to_bezier(&[]).is_empty());
        assert!(catmull_to_bezier(&points(&[[1.0, 2.0]])).is_empty());
    }

    #[test]
    fn test_collinear_points_give_straight_handles() {
        let pts = points(&[[0.0, 0.0], [60.0, 30.0], [120.0, 60.0]]);
        for seg in catmull_to_bezier(&pts) {
            for handle in [seg[1], seg[2]] {
                assert!((handle.y - handle.x / 2.0).abs() < EPSILON, "{handle:?}");
            }
        }
    }

    #[test]
    fn test_length_of_straight_segment() {
        let seg = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 0.0),
        ];
        assert!((approximate_bezier_len(&seg, DEFAULT_LENGTH_STEPS) - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_lookup_passes_through_control_points() {
        let pts = points(&[[0.0, 0.0], [100.0, 50.0], [200.0, 80.0], [300.0, 90.0]]);
        let lookups: Vec<CurveLookup> = catmull_to_bezier(&pts).iter().map(prepare_curve).collect();
        for (i, p) in pts.iter().enumerate() {
            let seg = i.min(lookups.len() - 1);
            let y = lookups[seg]
                .get(p.x)
                .unwrap_or_else(|| panic!("no value at control point {i}"));
            assert!((y - p.y).abs() < 1.0, "point {i}: {y} vs {}", p.y);
        }
    }

    #[test]
    fn test_lookup_is_total_over_its_range() {
        let pts = points(&[[40.0, 5.0], [900.0, 95.0], [3000.0, 12.0]]);
        for seg in catmull_to_bezier(&pts) {
            let lookup = prepare_curve(&seg);
            assert!(!lookup.is_empty());
            for x in 0..lookup.len() {
                assert!(lookup.get(x as f64).is_some(), "hole at {x}");
            }
            assert_eq!(lookup.get(lookup.len() as f64), None);
            assert_eq!(lookup.get(-1.0), None);
        }
    }

    #[test]
    fn test_leading_indices_take_first_value() {
        let pts = points(&[[50.0, 7.0], [80.0, 7.0]]);
        let lookup = prepare_curve(&catmull_to_bezier(&pts)[0]);
        for x in [0.0, 49.6] {
            let y = lookup.get(x).unwrap_or(f64::NAN);
            assert!((y - 7.0).abs() < EPSILON, "x = {x}: {y}");
        }
    }

    #[test]
    fn test_degenerate_segment_still_has_a_value() {
        let pts = points(&[[3.0, 1.0], [3.0, 1.0]]);
        let lookup = prepare_curve(&catmull_to_bezier(&pts)[0]);
        assert_eq!(lookup.get(3.0), Some(1.0));
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.4999), 2.0);
    }
}
