//! Domain assignment: where each key color sits along a scale.
//!
//! Positions run from 0 (lightest) to `granularity` (darkest) and derive
//! from CIECAM02 lightness `J`. After placement the positions are reshaped:
//!
//! ```text
//! shift:       d → 1 + (g - 1) × (d^k - 1) / (g^k - 1)      (power scale on [1, g])
//! parabola:    d → g × sqrt(d / g)
//! polynomial:  d → g × sqrt(sqrt((x² + x⁴) / 2)),  x = d / g
//! ```

use super::{DistributeLightness, ScaleOptions};
use crate::color::Rgb;
use crate::color_space::ColorSpace;

/// Copy of `keys` ordered by descending appearance lightness (stable).
pub(crate) fn sort_by_lightness(keys: &[Rgb]) -> Vec<Rgb> {
    let mut keyed: Vec<(f64, Rgb)> = keys
        .iter()
        .map(|&rgb| (ColorSpace::lightness(rgb), rgb))
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.into_iter().map(|(_, rgb)| rgb).collect()
}

/// Compute the ascending domain positions for a set of key colors.
///
/// With `full_scale` the result has `keys.len() + 2` entries bracketed by 0
/// and `granularity`; otherwise one entry per key.
pub fn scale_domains(keys: &[Rgb], granularity: usize, options: &ScaleOptions) -> Vec<f64> {
    let g = granularity as f64;
    let lightness: Vec<f64> = sort_by_lightness(keys)
        .into_iter()
        .map(ColorSpace::lightness)
        .collect();

    let mut domains: Vec<f64> = if options.full_scale {
        lightness.iter().map(|j| g - g * j).collect()
    } else {
        let min = lightness.iter().copied().fold(f64::INFINITY, f64::min);
        let max = lightness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        lightness
            .iter()
            .map(|j| {
                let norm = (j - min) / (max - min);
                if norm.is_nan() { 0.0 } else { g - norm * g }
            })
            .collect()
    };
    domains.sort_by(f64::total_cmp);

    if options.full_scale {
        domains.insert(0, 0.0);
        domains.push(g);
    }

    domains
        .into_iter()
        .map(|d| shift_domain(d, g, options.shift))
        .map(|d| distribute(d, g, options.distribute_lightness))
        .collect()
}

/// Power scale mapping `[1, g]` onto itself with exponent `shift`.
///
/// Negative results clamp to 0. A shift of 1 or a granularity of at most 1
/// leaves positions unchanged.
fn shift_domain(d: f64, g: f64, shift: f64) -> f64 {
    if shift == 1.0 || g <= 1.0 {
        return d;
    }
    let pow = |x: f64| x.signum() * x.abs().powf(shift);
    let shifted = 1.0 + (g - 1.0) * (pow(d) - 1.0) / (pow(g) - 1.0);
    if shifted.is_nan() { d } else { shifted.max(0.0) }
}

fn distribute(d: f64, g: f64, mode: DistributeLightness) -> f64 {
    if g <= 0.0 {
        return d;
    }
    let x = d / g;
    match mode {
        DistributeLightness::Linear => d,
        DistributeLightness::Parabola => x.max(0.0).sqrt() * g,
        DistributeLightness::Polynomial => ((x * x + x.powi(4)) / 2.0).sqrt().sqrt() * g,
    }
}
