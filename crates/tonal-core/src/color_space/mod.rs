//! Color space adapters: pure `rgb ⇄ channels` conversions per space.
//!
//! Standard spaces go through `palette`; the appearance models (CIECAM02,
//! CAM16) and HCT are implemented in [`appearance`] and [`hct`].
//!
//! Hue channels are `NaN` for achromatic colors. Callers must tolerate this;
//! converting back treats a `NaN` hue as 0.

pub mod appearance;
pub mod hct;

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use palette::convert::FromColorUnclamped;
use palette::white_point::D65;
use palette::{Hsl, Hsluv, Hsv, Lab, Lch, Oklab, Oklch, Srgb, Xyz};
use serde::{Deserialize, Serialize};

use self::appearance::{CAM16, CIECAM02, Jch, ViewingConditions};
use crate::color::{Rgb, clamp_rgb};
use crate::error::ColorError;

type SrgbHsl = Hsl<palette::encoding::Srgb, f64>;
type SrgbHsv = Hsv<palette::encoding::Srgb, f64>;

/// Saturation below which HSL-family hues are undefined.
const SATURATION_EPSILON: f64 = 1e-8;

/// Identifies an interpolation color space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    /// CAM02-UCS `J'a'b'`.
    #[serde(rename = "CAM02")]
    Cam02,
    /// CIECAM02 `JCh`.
    #[serde(rename = "CAM02p")]
    Cam02p,
    /// CAM16-UCS `J'a'b'`.
    #[serde(rename = "CAM16")]
    Cam16,
    /// CAM16 `JCh`.
    #[serde(rename = "CAM16p")]
    Cam16p,
    /// Hue, chroma, tone.
    #[serde(rename = "HCT")]
    Hct,
    #[serde(rename = "HSL")]
    Hsl,
    #[serde(rename = "HSLuv")]
    Hsluv,
    #[serde(rename = "HSV")]
    Hsv,
    /// CIELAB (D65).
    #[serde(rename = "LAB")]
    Lab,
    /// CIE LCh(ab) (D65).
    #[serde(rename = "LCH")]
    Lch,
    #[serde(rename = "OKLAB")]
    Oklab,
    #[serde(rename = "OKLCH")]
    Oklch,
    /// sRGB channels in `[0, 255]`.
    #[serde(rename = "RGB")]
    Rgb,
}

impl ColorSpace {
    /// Canonical name used in configuration files.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cam02 => "CAM02",
            Self::Cam02p => "CAM02p",
            Self::Cam16 => "CAM16",
            Self::Cam16p => "CAM16p",
            Self::Hct => "HCT",
            Self::Hsl => "HSL",
            Self::Hsluv => "HSLuv",
            Self::Hsv => "HSV",
            Self::Lab => "LAB",
            Self::Lch => "LCH",
            Self::Oklab => "OKLAB",
            Self::Oklch => "OKLCH",
            Self::Rgb => "RGB",
        }
    }

    /// Every supported space.
    pub fn all() -> &'static [Self] {
        const ALL: [ColorSpace; 13] = [
            ColorSpace::Cam02,
            ColorSpace::Cam02p,
            ColorSpace::Cam16,
            ColorSpace::Cam16p,
            ColorSpace::Hct,
            ColorSpace::Hsl,
            ColorSpace::Hsluv,
            ColorSpace::Hsv,
            ColorSpace::Lab,
            ColorSpace::Lch,
            ColorSpace::Oklab,
            ColorSpace::Oklch,
            ColorSpace::Rgb,
        ];
        &ALL
    }

    /// Index of the hue channel, if the space has one.
    pub const fn hue_channel(&self) -> Option<usize> {
        match self {
            Self::Hct | Self::Hsl | Self::Hsluv | Self::Hsv => Some(0),
            Self::Cam02p | Self::Cam16p | Self::Lch | Self::Oklch => Some(2),
            _ => None,
        }
    }

    /// Index of the chroma or saturation channel paired with the hue.
    pub const fn chroma_channel(&self) -> Option<usize> {
        match self.hue_channel() {
            Some(_) => Some(1),
            None => None,
        }
    }

    /// Whether chroma comes from an appearance model and must stay non-negative.
    pub const fn is_appearance_hue_space(&self) -> bool {
        matches!(self, Self::Cam02p | Self::Cam16p | Self::Hct)
    }

    /// Convert an sRGB color to this space's channel tuple.
    pub fn to_channels(&self, rgb: Rgb) -> [f64; 3] {
        match self {
            Self::Rgb => [rgb.red * 255.0, rgb.green * 255.0, rgb.blue * 255.0],
            Self::Hsl => {
                let hsl = SrgbHsl::from_color_unclamped(rgb);
                let hue = undefined_if(hsl.hue.into_positive_degrees(), hsl.saturation < SATURATION_EPSILON);
                [hue, hsl.saturation, hsl.lightness]
            }
            Self::Hsv => {
                let hsv = SrgbHsv::from_color_unclamped(rgb);
                let hue = undefined_if(hsv.hue.into_positive_degrees(), hsv.saturation < SATURATION_EPSILON);
                [hue, hsv.saturation, hsv.value]
            }
            Self::Hsluv => {
                let hsluv = Hsluv::<D65, f64>::from_color_unclamped(rgb);
                let hue = undefined_if(hsluv.hue.into_positive_degrees(), chroma_rounds_to_zero(hsluv.saturation));
                [hue, hsluv.saturation, hsluv.l]
            }
            Self::Lab => {
                let lab = Lab::<D65, f64>::from_color_unclamped(rgb);
                [lab.l, lab.a, lab.b]
            }
            Self::Lch => {
                let lch = Lch::<D65, f64>::from_color_unclamped(rgb);
                let hue = undefined_if(lch.hue.into_positive_degrees(), chroma_rounds_to_zero(lch.chroma));
                [lch.l, lch.chroma, hue]
            }
            Self::Oklab => {
                let oklab = Oklab::<f64>::from_color_unclamped(rgb);
                [oklab.l, oklab.a, oklab.b]
            }
            Self::Oklch => {
                let oklch = Oklch::<f64>::from_color_unclamped(rgb);
                let hue = undefined_if(oklch.hue.into_positive_degrees(), chroma_rounds_to_zero(oklch.chroma));
                [oklch.l, oklch.chroma, hue]
            }
            Self::Cam02 => CIECAM02.ucs_from_jch(appearance_jch(&CIECAM02, rgb)),
            Self::Cam16 => CAM16.ucs_from_jch(appearance_jch(&CAM16, rgb)),
            Self::Cam02p => jch_channels(appearance_jch(&CIECAM02, rgb), rgb),
            Self::Cam16p => jch_channels(appearance_jch(&CAM16, rgb), rgb),
            Self::Hct => {
                let [h, c, t] = hct::hct_from_rgb(rgb);
                [undefined_if(h, is_achromatic(rgb)), c, t]
            }
        }
    }

    /// Convert a channel tuple back to sRGB, clamped into gamut.
    pub fn from_channels(&self, channels: [f64; 3]) -> Rgb {
        let hue_defined = |h: f64| if h.is_nan() { 0.0 } else { h };

        let rgb = match self {
            Self::Rgb => Rgb::new(channels[0] / 255.0, channels[1] / 255.0, channels[2] / 255.0),
            Self::Hsl => Rgb::from_color_unclamped(SrgbHsl::new(
                hue_defined(channels[0]),
                channels[1],
                channels[2],
            )),
            Self::Hsv => Rgb::from_color_unclamped(SrgbHsv::new(
                hue_defined(channels[0]),
                channels[1],
                channels[2],
            )),
            Self::Hsluv => Rgb::from_color_unclamped(Hsluv::<D65, f64>::new(
                hue_defined(channels[0]),
                channels[1],
                channels[2],
            )),
            Self::Lab => {
                Rgb::from_color_unclamped(Lab::<D65, f64>::new(channels[0], channels[1], channels[2]))
            }
            Self::Lch => Rgb::from_color_unclamped(Lch::<D65, f64>::new(
                channels[0],
                channels[1],
                hue_defined(channels[2]),
            )),
            Self::Oklab => {
                Rgb::from_color_unclamped(Oklab::<f64>::new(channels[0], channels[1], channels[2]))
            }
            Self::Oklch => Rgb::from_color_unclamped(Oklch::<f64>::new(
                channels[0],
                channels[1],
                hue_defined(channels[2]),
            )),
            Self::Cam02 => xyz100_to_rgb(CIECAM02.xyz_from_jch(CIECAM02.jch_from_ucs(channels))),
            Self::Cam16 => xyz100_to_rgb(CAM16.xyz_from_jch(CAM16.jch_from_ucs(channels))),
            Self::Cam02p => xyz100_to_rgb(CIECAM02.xyz_from_jch(jch_from_channels(channels))),
            Self::Cam16p => xyz100_to_rgb(CAM16.xyz_from_jch(jch_from_channels(channels))),
            Self::Hct => hct::rgb_from_hct([hue_defined(channels[0]), channels[1], channels[2]]),
        };
        clamp_rgb(rgb)
    }

    /// Appearance-model lightness used to order key colors: CIECAM02 `J / 100`.
    pub fn lightness(rgb: Rgb) -> f64 {
        appearance_jch(&CIECAM02, rgb).j / 100.0
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|space| space.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ColorError::UnknownColorSpace(s.to_string()))
    }
}

fn undefined_if(hue: f64, undefined: bool) -> f64 {
    if undefined { f64::NAN } else { hue }
}

/// Chroma that rounds to zero at four decimals leaves the hue undefined.
fn chroma_rounds_to_zero(chroma: f64) -> bool {
    (chroma * 10000.0).round() == 0.0
}

fn is_achromatic(rgb: Rgb) -> bool {
    rgb.red == rgb.green && rgb.green == rgb.blue
}

fn appearance_jch(vc: &ViewingConditions, rgb: Rgb) -> Jch {
    vc.jch_from_xyz(rgb_to_xyz100(rgb))
}

fn jch_channels(jch: Jch, rgb: Rgb) -> [f64; 3] {
    [jch.j, jch.c, undefined_if(jch.h, is_achromatic(rgb))]
}

fn jch_from_channels(channels: [f64; 3]) -> Jch {
    Jch {
        j: channels[0],
        c: channels[1],
        h: if channels[2].is_nan() { 0.0 } else { channels[2] },
    }
}

/// sRGB to XYZ scaled so that white has `Y = 100`.
pub(crate) fn rgb_to_xyz100(rgb: Rgb) -> DVec3 {
    let xyz = Xyz::<D65, f64>::from_color_unclamped(rgb);
    DVec3::new(xyz.x, xyz.y, xyz.z) * 100.0
}

/// Inverse of [`rgb_to_xyz100`], unclamped.
pub(crate) fn xyz100_to_rgb(xyz: DVec3) -> Rgb {
    let xyz = xyz / 100.0;
    Srgb::<f64>::from_color_unclamped(Xyz::<D65, f64>::new(xyz.x, xyz.y, xyz.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::parse_color;

    fn assert_rgb_close(a: Rgb, b: Rgb, tolerance: f64, label: &str) {
        for (x, y) in [(a.red, b.red), (a.green, b.green), (a.blue, b.blue)] {
            assert!(
                (x - y).abs() < tolerance,
                "{label}: {a:?} vs {b:?}"
            );
        }
    }

    #[test]
    fn test_every_space_roundtrips_in_gamut_colors() {
        let samples = ["#1e88e5", "#cacaca", "#6b2d5c", "#ffd166", "#000000", "#ffffff"];
        for space in ColorSpace::all() {
            for hex in samples {
                let rgb = parse_color(hex).unwrap();
                let back = space.from_channels(space.to_channels(rgb));
                assert_rgb_close(rgb, back, 2e-3, &format!("{space} {hex}"));
            }
        }
    }

    #[test]
    fn test_grey_hue_is_nan_in_hue_spaces() {
        let grey = parse_color("#808080").unwrap();
        for space in ColorSpace::all() {
            if let Some(idx) = space.hue_channel() {
                let channels = space.to_channels(grey);
                assert!(channels[idx].is_nan(), "{space}: hue {}", channels[idx]);
            }
        }
    }

    #[test]
    fn test_nan_hue_converts_back_without_panicking() {
        let grey = parse_color("#808080").unwrap();
        for space in ColorSpace::all() {
            let back = space.from_channels(space.to_channels(grey));
            assert_rgb_close(grey, back, 2e-3, space.name());
        }
    }

    #[test]
    fn test_lightness_orders_white_above_black() {
        let white = ColorSpace::lightness(Rgb::new(1.0, 1.0, 1.0));
        let black = ColorSpace::lightness(Rgb::new(0.0, 0.0, 0.0));
        let mid = ColorSpace::lightness(parse_color("#808080").unwrap());
        assert!((white - 1.0).abs() < 1e-6);
        assert!(black.abs() < 1e-6);
        assert!(black < mid && mid < white);
    }

    #[test]
    fn test_space_names_parse_case_insensitively() {
        assert_eq!("oklch".parse::<ColorSpace>(), Ok(ColorSpace::Oklch));
        assert_eq!("HSLUV".parse::<ColorSpace>(), Ok(ColorSpace::Hsluv));
        assert_eq!("cam02P".parse::<ColorSpace>(), Ok(ColorSpace::Cam02p));
        assert_eq!(
            "XYZ".parse::<ColorSpace>(),
            Err(ColorError::UnknownColorSpace("XYZ".to_string()))
        );
    }

    #[test]
    fn test_space_serializes_under_canonical_name() {
        let json = serde_json::to_string(&ColorSpace::Hsluv).unwrap();
        assert_eq!(json, "\"HSLuv\"");
        let back: ColorSpace = serde_json::from_str("\"CAM16p\"").unwrap();
        assert_eq!(back, ColorSpace::Cam16p);
    }
}
