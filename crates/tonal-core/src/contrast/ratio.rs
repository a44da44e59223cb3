//! Ratio helpers: positivity thresholds, contrast multipliers and naming.

use super::ContrastAlgorithm;
use crate::curve::round_half_up;

/// Smallest ratio that counts as "positive" contrast for an algorithm.
///
/// WCAG 2 ratios below 1 are impossible, so 1 is the floor. APCA `Lc` is
/// positive from 0.
pub const fn min_positive_ratio(algorithm: ContrastAlgorithm) -> f64 {
    match algorithm {
        ContrastAlgorithm::Wcag2 => 1.0,
        ContrastAlgorithm::Wcag3 => 0.0,
    }
}

/// Whether `ratio` lies at or above [`min_positive_ratio`].
pub fn is_positive_ratio(ratio: f64, algorithm: ContrastAlgorithm) -> bool {
    ratio >= min_positive_ratio(algorithm)
}

/// Stretch a ratio away from 1 by `multiplier`, rounded to two decimals.
///
/// ```text
/// ratio ≥  1 →  1 + (ratio - 1) × m
/// ratio ≤ -1 → -1 + (ratio + 1) × m
/// otherwise  →  1
/// ```
pub fn multiply_contrast_ratio(ratio: f64, multiplier: f64) -> f64 {
    let scaled = if ratio >= 1.0 {
        1.0 + (ratio - 1.0) * multiplier
    } else if ratio <= -1.0 {
        -1.0 + (ratio + 1.0) * multiplier
    } else {
        1.0
    };
    round_to(scaled, 2)
}

/// Round half up to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    round_half_up(value * factor) / factor
}

/// Ratio below which names count up to 100 instead of in hundreds.
const fn naming_floor(algorithm: ContrastAlgorithm) -> f64 {
    match algorithm {
        ContrastAlgorithm::Wcag2 => 0.0,
        ContrastAlgorithm::Wcag3 => 1.0,
    }
}

/// Numeric swatch names for a set of ratios, in ascending ratio order.
///
/// Ratios at or above the naming floor (0 for wcag2, 1 for wcag3) are named
/// `100, 200, …`. The `k` ratios below it share the interval `(0, 100)`
/// evenly: `round(100·i / (k + 1))` for `i = 1..=k`.
pub fn ratio_names(ratios: &[f64], algorithm: ContrastAlgorithm) -> Vec<String> {
    let mut sorted = ratios.to_vec();
    sorted.sort_by(f64::total_cmp);

    let floor = naming_floor(algorithm);
    let below = sorted.iter().filter(|&&r| r < floor).count();

    (0..sorted.len())
        .map(|i| {
            let name = if i < below {
                round_half_up(100.0 * (i + 1) as f64 / (below + 1) as f64)
            } else {
                ((i - below + 1) * 100) as f64
            };
            format!("{name}")
        })
        .collect()
}
