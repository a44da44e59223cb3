//! Piecewise interpolation between key colors.
//!
//! A position is normalized against the first and last domain, the
//! surrounding pair of stops is located, and the pair is blended in the
//! scale's color space. Spaces without a hue blend channel-wise. Hue spaces
//! take the shorter way around the hue circle; an undefined hue borrows the
//! other stop's hue so greys do not drag the blend through red.

use crate::color_space::ColorSpace;

/// Stops and their ascending positions.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearStops {
    positions: Vec<f64>,
    stops: Vec<[f64; 3]>,
}

impl LinearStops {
    /// Pair `stops` with `positions`; extra entries on either side are ignored.
    pub fn new(positions: Vec<f64>, stops: Vec<[f64; 3]>) -> Self {
        let n = positions.len().min(stops.len());
        let mut positions = positions;
        let mut stops = stops;
        positions.truncate(n);
        stops.truncate(n);
        Self { positions, stops }
    }

    /// Channels at `position`, or `None` when there are no stops.
    pub fn channels_at(&self, space: ColorSpace, position: f64) -> Option<[f64; 3]> {
        let first = *self.stops.first()?;
        let n = self.stops.len();
        let lo = self.positions[0];
        let hi = self.positions[n - 1];
        let width = hi - lo;
        if n == 1 || width <= 0.0 || width.is_nan() {
            return Some(first);
        }

        let t = ((position - lo) / width).clamp(0.0, 1.0);
        let t = if t.is_nan() { 0.0 } else { t };

        for i in 0..n - 1 {
            let p0 = (self.positions[i] - lo) / width;
            let p1 = (self.positions[i + 1] - lo) / width;
            if t >= p0 && t <= p1 {
                let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
                return Some(blend(space, self.stops[i], self.stops[i + 1], f));
            }
        }
        Some(self.stops[n - 1])
    }
}

/// Blend two channel tuples at fraction `f` in `space`.
pub fn blend(space: ColorSpace, a: [f64; 3], b: [f64; 3], f: f64) -> [f64; 3] {
    let Some(hue) = space.hue_channel() else {
        return std::array::from_fn(|i| a[i] + f * (b[i] - a[i]));
    };
    let sat = 1;
    let light = 3 - hue - sat;

    let (h0, h1) = (a[hue], b[hue]);
    let mut saturation = None;

    let h = match (h0.is_nan(), h1.is_nan()) {
        (false, false) => {
            let dh = if h1 > h0 && h1 - h0 > 180.0 {
                h1 - (h0 + 360.0)
            } else if h1 < h0 && h0 - h1 > 180.0 {
                h1 + 360.0 - h0
            } else {
                h1 - h0
            };
            h0 + f * dh
        }
        (false, true) => {
            if space == ColorSpace::Hsl && is_extreme_lightness(b[light]) {
                saturation = Some(a[sat]);
            }
            h0
        }
        (true, false) => {
            if space == ColorSpace::Hsl && is_extreme_lightness(a[light]) {
                saturation = Some(b[sat]);
            }
            h1
        }
        (true, true) => f64::NAN,
    };

    let mut out = [0.0; 3];
    out[hue] = h;
    out[sat] = saturation.unwrap_or(a[sat] + f * (b[sat] - a[sat]));
    out[light] = a[light] + f * (b[light] - a[light]);
    out
}

/// Black or white in HSL.
fn is_extreme_lightness(l: f64) -> bool {
    l == 0.0 || l == 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_channels(actual: [f64; 3], expected: [f64; 3]) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < EPSILON,
                "channel {i}: {actual:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn test_channelwise_blend_without_hue() {
        let mid = blend(ColorSpace::Lab, [20.0, -10.0, 40.0], [80.0, 30.0, 0.0], 0.25);
        assert_channels(mid, [35.0, 0.0, 30.0]);
    }

    #[test]
    fn test_hue_takes_shorter_arc() {
        let mid = blend(ColorSpace::Lch, [50.0, 40.0, 350.0], [50.0, 40.0, 30.0], 0.5);
        assert!((mid[2].rem_euclid(360.0) - 10.0).abs() < EPSILON, "{mid:?}");
        let mid = blend(ColorSpace::Hsv, [20.0, 0.5, 0.5], [300.0, 0.5, 0.5], 0.5);
        assert!((mid[0].rem_euclid(360.0) - 340.0).abs() < EPSILON, "{mid:?}");
    }

    #[test]
    fn test_undefined_hue_borrows_other_stop() {
        let grey = [60.0, 0.0, f64::NAN];
        let blue = [40.0, 50.0, 260.0];
        let mid = blend(ColorSpace::Oklch, grey, blue, 0.5);
        assert_channels(mid, [50.0, 25.0, 260.0]);
    }

    #[test]
    fn test_hsl_white_keeps_other_saturation() {
        let white = [f64::NAN, 0.0, 1.0];
        let red = [0.0, 1.0, 0.5];
        let mid = blend(ColorSpace::Hsl, red, white, 0.5);
        assert_channels(mid, [0.0, 1.0, 0.75]);
    }

    #[test]
    fn test_both_hues_undefined_stay_undefined() {
        let mid = blend(ColorSpace::Hsluv, [f64::NAN, 0.0, 20.0], [f64::NAN, 0.0, 80.0], 0.5);
        assert!(mid[0].is_nan());
        assert!((mid[2] - 50.0).abs() < EPSILON);
    }

    #[test]
    fn test_stops_clamp_outside_domain() {
        let stops = LinearStops::new(vec![10.0, 20.0], vec![[0.0; 3], [10.0; 3]]);
        assert_channels(stops.channels_at(ColorSpace::Rgb, 0.0).unwrap(), [0.0; 3]);
        assert_channels(stops.channels_at(ColorSpace::Rgb, 15.0).unwrap(), [5.0; 3]);
        assert_channels(stops.channels_at(ColorSpace::Rgb, 99.0).unwrap(), [10.0; 3]);
    }

    #[test]
    fn test_zero_width_domain_returns_first_stop() {
        let stops = LinearStops::new(vec![0.0, 0.0], vec![[1.0; 3], [9.0; 3]]);
        assert_channels(stops.channels_at(ColorSpace::Lab, 0.0).unwrap(), [1.0; 3]);
        assert!(LinearStops::new(vec![], vec![]).channels_at(ColorSpace::Lab, 0.0).is_none());
    }
}
