//! HCT: CAM16 hue and chroma combined with CIELAB L* tone.
//!
//! The forward direction is direct. The inverse has no closed form, so it is
//! solved numerically:
//! 1. Bisect CAM16 lightness `J` until the luminance matches the tone
//! 2. If the result leaves the sRGB gamut, bisect chroma downward, keeping
//!    hue and tone fixed

use glam::DVec3;

use super::appearance::{CAM16, Jch, lstar_from_y, y_from_lstar};
use super::{rgb_to_xyz100, xyz100_to_rgb};
use crate::color::Rgb;

/// Bisection steps for lightness.
const J_ITERATIONS: usize = 32;

/// Bisection steps for the chroma reduction.
const CHROMA_ITERATIONS: usize = 16;

/// Upper bound for the lightness search. Saturated colors can need `J > 100`
/// to reach the luminance of a light tone.
const J_MAX: f64 = 120.0;

/// Tolerance for accepting a solved color as in gamut.
const GAMUT_EPSILON: f64 = 1e-4;

/// Convert an sRGB color to `[hue, chroma, tone]`.
pub fn hct_from_rgb(rgb: Rgb) -> [f64; 3] {
    let xyz = rgb_to_xyz100(rgb);
    let jch = CAM16.jch_from_xyz(xyz);
    [jch.h, jch.c, lstar_from_y(xyz.y)]
}

/// Convert `[hue, chroma, tone]` to sRGB, reducing chroma to stay in gamut.
///
/// The result is unclamped only by floating-point noise within
/// `GAMUT_EPSILON`; callers clamp as usual.
pub fn rgb_from_hct(hct: [f64; 3]) -> Rgb {
    let [hue, chroma, tone] = hct;
    if tone <= 0.0 {
        return Rgb::new(0.0, 0.0, 0.0);
    }
    if tone >= 100.0 {
        return Rgb::new(1.0, 1.0, 1.0);
    }

    let target_y = y_from_lstar(tone);
    let grey = grey_for_luminance(target_y);
    if chroma <= 0.0 {
        return grey;
    }

    if let Some(rgb) = solve_in_gamut(hue, chroma, target_y) {
        return rgb;
    }

    let mut best = grey;
    let (mut lo, mut hi) = (0.0, chroma);
    for _ in 0..CHROMA_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        match solve_in_gamut(hue, mid, target_y) {
            Some(rgb) => {
                best = rgb;
                lo = mid;
            }
            None => hi = mid,
        }
    }
    best
}

fn solve_in_gamut(hue: f64, chroma: f64, target_y: f64) -> Option<Rgb> {
    let rgb = xyz100_to_rgb(solve_lightness(hue, chroma, target_y));
    let in_gamut = [rgb.red, rgb.green, rgb.blue]
        .iter()
        .all(|v| (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(v));
    in_gamut.then_some(rgb)
}

fn solve_lightness(hue: f64, chroma: f64, target_y: f64) -> DVec3 {
    let at = |j: f64| CAM16.xyz_from_jch(Jch { j, c: chroma, h: hue });

    let (mut lo, mut hi) = (0.0, J_MAX);
    for _ in 0..J_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        if at(mid).y < target_y {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    at((lo + hi) / 2.0)
}

fn grey_for_luminance(y: f64) -> Rgb {
    let white = rgb_to_xyz100(Rgb::new(1.0, 1.0, 1.0));
    xyz100_to_rgb(white * (y / white.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_matches_lstar() {
        let [_, _, tone] = hct_from_rgb(Rgb::new(0.5, 0.5, 0.5));
        assert!((tone - 53.389).abs() < 0.01, "tone = {tone}");
    }

    #[test]
    fn test_extreme_tones_are_black_and_white() {
        let black = rgb_from_hct([120.0, 40.0, 0.0]);
        assert_eq!([black.red, black.green, black.blue], [0.0, 0.0, 0.0]);
        let white = rgb_from_hct([120.0, 40.0, 100.0]);
        assert_eq!([white.red, white.green, white.blue], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_roundtrip_in_gamut_color() {
        let original = Rgb::new(0.2, 0.4, 0.8);
        let back = rgb_from_hct(hct_from_rgb(original));
        for (a, b) in [
            (original.red, back.red),
            (original.green, back.green),
            (original.blue, back.blue),
        ] {
            assert!((a - b).abs() < 2e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn test_out_of_gamut_chroma_is_reduced_but_tone_kept() {
        let rgb = rgb_from_hct([140.0, 200.0, 60.0]);
        for v in [rgb.red, rgb.green, rgb.blue] {
            assert!((-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(&v), "channel {v}");
        }
        let [_, _, tone] = hct_from_rgb(rgb);
        assert!((tone - 60.0).abs() < 0.5, "tone drifted to {tone}");
    }
}
