//! Ratio search: find the scale position whose contrast meets a target.
//!
//! # Algorithm
//! The scale runs from white to black, so contrast against a fixed background
//! is monotonic along it (up to the sign convention of the algorithm). Each
//! target is found by bisection:
//! ```text
//! dir  = contrast(0) < contrast(g) ? +1 : -1
//! dot  = g / 2, step = g / 2
//! loop while |contrast(dot) - target| > 0.01, at most 100 times:
//!     step /= 2
//!     dot  += contrast(dot) < target ? step × dir : -step × dir
//! ```
//! Targets are nudged by `0.005 × sign(ratio)` so the found color lands on
//! the passing side of the ratio.
//!
//! # Complexity
//! O(R × log g) contrast evaluations for R ratios, shared through a cache.

use std::collections::HashMap;

use crate::color::Rgb;
use crate::color_space::ColorSpace;
use crate::contrast::{ContrastAlgorithm, contrast};
use crate::contrast::ratio::round_to;
use crate::scale::{ColorScale, ScaleOptions};

/// Scale resolution used when the caller does not choose one.
pub const DEFAULT_GRANULARITY: usize = 3000;

/// Accepted distance between the sampled and the target contrast.
const TOLERANCE: f64 = 0.01;

/// Upper bound on bisection steps per target.
const MAX_ITERATIONS: usize = 100;

/// Nudge applied to every target in the direction of its sign.
const TARGET_NUDGE: f64 = 0.005;

/// Key colors resolved for a search: the inputs of one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyColors {
    pub keys: Vec<Rgb>,
    pub space: ColorSpace,
    pub smooth: bool,
}

impl KeyColors {
    pub fn new(keys: Vec<Rgb>, space: ColorSpace) -> Self {
        Self {
            keys,
            space,
            smooth: false,
        }
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }
}

/// Sign with `sign(0) = 0`.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Bisect `[0, granularity]` for the position where `probe` reaches `target`.
///
/// `dir` is `+1` when `probe` increases along the scale and `-1` otherwise.
/// The result is rounded to three decimals. If the tolerance is not met
/// within the iteration budget, the last position is returned.
pub fn search_position(
    target: f64,
    granularity: f64,
    dir: f64,
    mut probe: impl FnMut(f64) -> f64,
) -> f64 {
    let mut step = granularity / 2.0;
    let mut dot = step;
    let mut iterations = 0;

    loop {
        let value = probe(dot);
        if (value - target).abs() <= TOLERANCE {
            break;
        }
        if iterations >= MAX_ITERATIONS {
            tracing::trace!(
                "Ratio search stopped after {} steps: target {}, reached {}",
                MAX_ITERATIONS,
                target,
                value
            );
            break;
        }
        iterations += 1;

        step /= 2.0;
        if value < target {
            dot += step * dir;
        } else {
            dot -= step * dir;
        }
    }

    round_to(dot, 3)
}

/// Find one color per ratio along the scale built from `color`.
///
/// Colors come back in the order of `ratios`. `background_v` is the
/// background lightness in `[0, 1]`; when `None` it is derived from the
/// background color.
pub fn generate_colors(
    color: &KeyColors,
    background: Rgb,
    background_v: Option<f64>,
    ratios: &[f64],
    algorithm: ContrastAlgorithm,
    granularity: Option<usize>,
) -> Vec<Rgb> {
    let granularity = granularity.unwrap_or(DEFAULT_GRANULARITY);
    let options = ScaleOptions {
        shift: 1.0,
        smooth: color.smooth,
        ..ScaleOptions::default()
    };
    let scale = ColorScale::build(granularity, &color.keys, color.space, &options);

    let mut cache: HashMap<u64, f64> = HashMap::new();
    let mut contrast_at = |position: f64| -> f64 {
        *cache
            .entry(position.to_bits())
            .or_insert_with(|| contrast(scale.at(position), background, background_v, algorithm))
    };

    let g = granularity as f64;
    let dir = if contrast_at(0.0) < contrast_at(g) { 1.0 } else { -1.0 };

    ratios
        .iter()
        .map(|&ratio| {
            let target = ratio + TARGET_NUDGE * sign(ratio);
            let position = search_position(target, g, dir, &mut contrast_at);
            scale.at(position)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bisection_converges_on_linear_probe() {
        let probe = |x: f64| x / 100.0;
        for target in [0.5, 3.3, 7.77, 29.9] {
            let pos = search_position(target, 3000.0, 1.0, probe);
            assert!((probe(pos) - target).abs() <= TOLERANCE + 1e-3, "{target} -> {pos}");
        }
    }

    #[test]
    fn test_bisection_follows_decreasing_probe() {
        let probe = |x: f64| 21.0 - x / 150.0;
        let pos = search_position(4.5, 3000.0, -1.0, probe);
        assert!((probe(pos) - 4.5).abs() <= TOLERANCE + 1e-3, "pos = {pos}");
    }

    #[test]
    fn test_bisection_stops_within_budget_on_unreachable_target() {
        let mut calls = 0;
        let pos = search_position(1000.0, 3000.0, 1.0, |x| {
            calls += 1;
            x / 1000.0
        });
        assert!(calls <= MAX_ITERATIONS + 1, "calls = {calls}");
        assert!(pos > 2999.0 && pos <= 3000.0, "pos = {pos}");
    }

    #[test]
    fn test_position_is_rounded_to_three_decimals() {
        let pos = search_position(std::f64::consts::PI, 10.0, 1.0, |x| x);
        assert_eq!(pos, round_to(pos, 3));
    }

    #[test]
    fn test_sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-2.0), -1.0);
        assert_eq!(sign(0.1), 1.0);
    }
}
