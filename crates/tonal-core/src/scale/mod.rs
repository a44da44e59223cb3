//! Color scales: continuous interpolation over ordered key colors.
//!
//! A scale maps a position in `[0, granularity]` to a color. Key colors are
//! placed by perceived lightness (lightest first), optionally bracketed by
//! white and black, and interpolated either piecewise in the chosen color
//! space or with per-channel splines.
//!
//! # Pipeline
//! ```text
//! keys → sort by J → domains → shift → distribute → stops → interpolant
//! ```

pub mod domain;
pub mod interpolate;
pub mod smooth;

use serde::{Deserialize, Serialize};

pub use self::domain::scale_domains;
use self::domain::sort_by_lightness;
use self::interpolate::LinearStops;
use self::smooth::SmoothCurves;
use crate::color::Rgb;
use crate::color_space::ColorSpace;

/// How domain positions are redistributed along the scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributeLightness {
    /// Keep positions as placed.
    #[default]
    Linear,
    /// Square-root easing; spreads the light end.
    Parabola,
    /// Quartic easing between linear and parabola.
    Polynomial,
}

impl DistributeLightness {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Parabola => "parabola",
            Self::Polynomial => "polynomial",
        }
    }

    pub fn all() -> &'static [Self] {
        const ALL: [DistributeLightness; 3] = [
            DistributeLightness::Linear,
            DistributeLightness::Parabola,
            DistributeLightness::Polynomial,
        ];
        &ALL
    }
}

/// Options controlling scale construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleOptions {
    /// Exponent of the power scale applied to domain positions.
    pub shift: f64,
    /// Bracket the keys with white and black.
    pub full_scale: bool,
    /// Spline interpolation instead of piecewise.
    pub smooth: bool,
    pub distribute_lightness: DistributeLightness,
    /// Interpolate keys in lightness order rather than as given.
    pub sort_color: bool,
    /// Return the continuous scale instead of materialized colors.
    pub as_fn: bool,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            shift: 1.0,
            full_scale: true,
            smooth: false,
            distribute_lightness: DistributeLightness::Linear,
            sort_color: true,
            as_fn: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Interpolant {
    Linear(LinearStops),
    Smooth(SmoothCurves),
}

/// A continuous color scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    space: ColorSpace,
    granularity: usize,
    domains: Vec<f64>,
    smooth: bool,
    interpolant: Interpolant,
}

impl ColorScale {
    /// Build a scale over `keys` in `space`.
    ///
    /// `options.as_fn` is ignored; use [`color_scale`] to choose between a
    /// continuous and a discrete result.
    pub fn build(granularity: usize, keys: &[Rgb], space: ColorSpace, options: &ScaleOptions) -> Self {
        let domains = scale_domains(keys, granularity, options);

        let mut ordered = if options.sort_color {
            sort_by_lightness(keys)
        } else {
            keys.to_vec()
        };
        if options.full_scale {
            ordered.insert(0, endpoint(space, Rgb::new(1.0, 1.0, 1.0)));
            ordered.push(endpoint(space, Rgb::new(0.0, 0.0, 0.0)));
        }

        let stops: Vec<[f64; 3]> = ordered.iter().map(|&rgb| space.to_channels(rgb)).collect();

        let interpolant = if options.smooth {
            Interpolant::Smooth(SmoothCurves::new(space, &domains, &stops))
        } else {
            Interpolant::Linear(LinearStops::new(domains.clone(), stops))
        };

        tracing::debug!(
            "Built {} scale: {} keys, granularity {}, smooth={}, distribution {}",
            space,
            keys.len(),
            granularity,
            options.smooth,
            options.distribute_lightness.name()
        );

        Self {
            space,
            granularity,
            domains,
            smooth: options.smooth,
            interpolant,
        }
    }

    /// Color at `position`, clamped into the sRGB gamut.
    pub fn at(&self, position: f64) -> Rgb {
        let channels = match &self.interpolant {
            Interpolant::Linear(stops) => stops.channels_at(self.space, position),
            Interpolant::Smooth(curves) => Some(curves.channels_at(position)),
        };
        let Some(mut channels) = channels else {
            return Rgb::new(0.0, 0.0, 0.0);
        };

        if self.space.is_appearance_hue_space() {
            if let Some(c) = self.space.chroma_channel() {
                channels[c] = channels[c].max(0.0);
            }
        }
        self.space.from_channels(channels)
    }

    /// Materialize `granularity` colors.
    ///
    /// Smooth scales sample the integer positions `0..granularity`; piecewise
    /// scales sample evenly between the first and last domain.
    pub fn colors(&self) -> Vec<Rgb> {
        let n = self.granularity;
        if self.smooth {
            return (0..n).map(|i| self.at(i as f64)).collect();
        }

        let (lo, hi) = match (self.domains.first(), self.domains.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (0.0, n as f64),
        };
        match n {
            0 => Vec::new(),
            1 => vec![self.at((lo + hi) / 2.0)],
            _ => (0..n)
                .map(|i| self.at(lo + (hi - lo) * i as f64 / (n - 1) as f64))
                .collect(),
        }
    }

    /// Ascending domain positions of the stops.
    pub fn domains(&self) -> &[f64] {
        &self.domains
    }
}

/// White and black endpoints; polar Lab spaces get them through a round trip.
fn endpoint(space: ColorSpace, rgb: Rgb) -> Rgb {
    match space {
        ColorSpace::Lch | ColorSpace::Oklch => space.from_channels(space.to_channels(rgb)),
        _ => rgb,
    }
}

/// A built scale, either materialized or continuous.
#[derive(Debug, Clone, PartialEq)]
pub enum Scale {
    Discrete(Vec<Rgb>),
    Continuous(ColorScale),
}

impl Scale {
    /// Color at `position`: direct for continuous scales, nearest index for
    /// discrete ones.
    pub fn at(&self, position: f64) -> Option<Rgb> {
        match self {
            Self::Continuous(scale) => Some(scale.at(position)),
            Self::Discrete(colors) => {
                let idx = crate::curve::round_half_up(position);
                if idx < 0.0 || idx.is_nan() {
                    return None;
                }
                colors.get(idx as usize).copied()
            }
        }
    }
}

/// Build a scale and return it continuous (`as_fn`) or materialized.
pub fn color_scale(granularity: usize, keys: &[Rgb], space: ColorSpace, options: &ScaleOptions) -> Scale {
    let scale = ColorScale::build(granularity, keys, space, options);
    if options.as_fn {
        Scale::Continuous(scale)
    } else {
        Scale::Discrete(scale.colors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{parse_color, to_hex};

    fn keys(hexes: &[&str]) -> Vec<Rgb> {
        hexes.iter().map(|h| parse_color(h).unwrap()).collect()
    }

    #[test]
    fn test_full_scale_runs_white_to_black() {
        for space in ColorSpace::all() {
            for smooth in [false, true] {
                let options = ScaleOptions {
                    smooth,
                    ..ScaleOptions::default()
                };
                let scale = ColorScale::build(100, &keys(&["#2b7bb9"]), *space, &options);
                let first = to_hex(scale.at(0.0));
                let last = to_hex(scale.at(100.0));
                assert_eq!(first, "#ffffff", "{space} smooth={smooth}");
                assert_eq!(last, "#000000", "{space} smooth={smooth}");
            }
        }
    }

    #[test]
    fn test_discrete_scale_has_granularity_colors() {
        let options = ScaleOptions::default();
        let Scale::Discrete(colors) = color_scale(12, &keys(&["#ff8800"]), ColorSpace::Lab, &options) else {
            panic!("expected a discrete scale");
        };
        assert_eq!(colors.len(), 12);
        assert_eq!(to_hex(colors[0]), "#ffffff");
        assert_eq!(to_hex(colors[11]), "#000000");
    }

    #[test]
    fn test_as_fn_returns_continuous_scale() {
        let options = ScaleOptions {
            as_fn: true,
            ..ScaleOptions::default()
        };
        let scale = color_scale(50, &keys(&["#00aa55"]), ColorSpace::Oklch, &options);
        assert!(matches!(scale, Scale::Continuous(_)));
        assert!(scale.at(25.0).is_some());
    }

    #[test]
    fn test_key_color_is_on_the_scale() {
        let key = parse_color("#1e88e5").unwrap();
        let scale = ColorScale::build(3000, &[key], ColorSpace::Lab, &ScaleOptions::default());
        let at_key = scale.at(scale.domains()[1]);
        assert_eq!(to_hex(at_key), "#1e88e5");
    }

    #[test]
    fn test_smooth_scale_is_lighter_at_start() {
        let options = ScaleOptions {
            smooth: true,
            ..ScaleOptions::default()
        };
        let scale = ColorScale::build(300, &keys(&["#3a6fbf", "#9fd4a3"]), ColorSpace::Cam02, &options);
        let colors = scale.colors();
        assert_eq!(colors.len(), 300);
        let j = |rgb: Rgb| ColorSpace::lightness(rgb);
        assert!(j(colors[10]) > j(colors[150]));
        assert!(j(colors[150]) > j(colors[290]));
    }

    #[test]
    fn test_grey_keys_do_not_panic_in_hue_spaces() {
        for space in ColorSpace::all() {
            for smooth in [false, true] {
                let options = ScaleOptions {
                    smooth,
                    ..ScaleOptions::default()
                };
                let scale = ColorScale::build(60, &keys(&["#cacaca", "#555555"]), *space, &options);
                for rgb in scale.colors() {
                    for v in [rgb.red, rgb.green, rgb.blue] {
                        assert!((0.0..=1.0).contains(&v), "{space}: {rgb:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_unsorted_keys_keep_their_order() {
        let options = ScaleOptions {
            sort_color: false,
            full_scale: false,
            ..ScaleOptions::default()
        };
        let scale = ColorScale::build(100, &keys(&["#000080", "#ffff00"]), ColorSpace::Rgb, &options);
        assert_eq!(to_hex(scale.at(0.0)), "#000080");
        assert_eq!(to_hex(scale.at(100.0)), "#ffff00");
    }

    #[test]
    fn test_distribution_names_match_serialized_form() {
        for mode in DistributeLightness::all() {
            let json = serde_json::to_string(mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.name()));
        }
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ScaleOptions =
            serde_json::from_str(r#"{"smooth": true, "distributeLightness": "parabola"}"#).unwrap();
        assert!(options.smooth);
        assert!(options.full_scale);
        assert_eq!(options.shift, 1.0);
        assert_eq!(options.distribute_lightness, DistributeLightness::Parabola);
    }
}
