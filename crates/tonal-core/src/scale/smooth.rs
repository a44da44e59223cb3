//! Spline interpolation between key colors, one channel at a time.
//!
//! # Algorithm
//! 1. Per channel, pair each domain position with the key's channel value
//! 2. Patch undefined values (achromatic hues):
//!    - leading and trailing runs copy the nearest defined value
//!    - a channel with no defined value uses neutral grey's value
//!    - interior gaps are dropped from that channel's control points
//! 3. Unwrap hue so consecutive control points differ by at most 180°
//! 4. Build a Catmull-Rom spline through the control points and bake every
//!    segment into a [`CurveLookup`]

use crate::color::Rgb;
use crate::color_space::ColorSpace;
use crate::curve::{CurveLookup, Point, catmull_to_bezier, prepare_curve};

/// Neutral grey whose channels stand in for a fully undefined channel.
const NEUTRAL_GREY: f64 = 0xcc as f64 / 255.0;

/// Baked spline for one channel.
#[derive(Debug, Clone, PartialEq)]
enum ChannelCurve {
    Constant(f64),
    Spline {
        segments: Vec<CurveLookup>,
        first: Point,
        last: Point,
    },
}

impl ChannelCurve {
    fn new(points: &[Point]) -> Self {
        match points {
            [] => Self::Constant(f64::NAN),
            [only] => Self::Constant(only.y),
            [first, .., last] => Self::Spline {
                segments: catmull_to_bezier(points).iter().map(prepare_curve).collect(),
                first: *first,
                last: *last,
            },
        }
    }

    fn value_at(&self, position: f64) -> f64 {
        match self {
            Self::Constant(v) => *v,
            Self::Spline {
                segments,
                first,
                last,
            } => segments
                .iter()
                .find_map(|lookup| lookup.get(position))
                .unwrap_or(if position < first.x { first.y } else { last.y }),
        }
    }
}

/// Smooth interpolant over all three channels of a color space.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothCurves {
    channels: [ChannelCurve; 3],
}

impl SmoothCurves {
    /// Build the per-channel splines through `stops` at `positions`.
    pub fn new(space: ColorSpace, positions: &[f64], stops: &[[f64; 3]]) -> Self {
        let hue = space.hue_channel();
        let neutral = space.to_channels(Rgb::new(NEUTRAL_GREY, NEUTRAL_GREY, NEUTRAL_GREY));

        let channels = std::array::from_fn(|c| {
            let values: Vec<f64> = stops.iter().map(|s| s[c]).collect();
            let fallback = if neutral[c].is_nan() { 0.0 } else { neutral[c] };
            let mut points = control_points(positions, &values, fallback);
            if hue == Some(c) {
                unwrap_hue(&mut points);
            }
            ChannelCurve::new(&points)
        });

        Self { channels }
    }

    /// Channel values at `position`.
    pub fn channels_at(&self, position: f64) -> [f64; 3] {
        std::array::from_fn(|c| self.channels[c].value_at(position))
    }
}

/// Pair positions with values, patching `NaN`s as described in the module docs.
pub(crate) fn control_points(positions: &[f64], values: &[f64], fallback: f64) -> Vec<Point> {
    let mut values: Vec<f64> = values.iter().take(positions.len()).copied().collect();

    match values.iter().position(|v| !v.is_nan()) {
        None => values.iter_mut().for_each(|v| *v = fallback),
        Some(first) => {
            let lead = values[first];
            values[..first].iter_mut().for_each(|v| *v = lead);
            if let Some(last) = values.iter().rposition(|v| !v.is_nan()) {
                let trail = values[last];
                values[last + 1..].iter_mut().for_each(|v| *v = trail);
            }
        }
    }

    positions
        .iter()
        .zip(values)
        .filter(|(_, v)| !v.is_nan())
        .map(|(&x, y)| Point::new(x, y))
        .collect()
}

/// Shift hue values by multiples of 360° so each step takes the shorter arc.
pub(crate) fn unwrap_hue(points: &mut [Point]) {
    let Some(first) = points.first() else {
        return;
    };
    let mut prev = first.y;
    let mut addon = 0.0;

    for point in points.iter_mut().skip(1) {
        let p = point.y + addon;
        let zero = (prev - p).abs();
        let plus = (prev - (p + 360.0)).abs();
        let minus = (prev - (p - 360.0)).abs();
        if plus < zero && plus < minus {
            addon += 360.0;
        }
        if minus < zero && minus < plus {
            addon -= 360.0;
        }
        point.y += addon;
        prev = point.y;
    }
}
