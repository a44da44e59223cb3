//! Signed contrast between a color and a background.
//!
//! Both algorithms return a signed value whose sign depends on whether the
//! background is light or dark, so a ratio list can ask for colors on
//! either side of the background:
//!
//! ```text
//! wcag2, dark background:  lighter color →  (Lc + 0.05) / (Lb + 0.05)
//!                          darker color  → -(Lb + 0.05) / (Lc + 0.05)
//! wcag2, light background: darker color  →  (Lb + 0.05) / (Lc + 0.05)
//!                          lighter color → -(Lc + 0.05) / (Lb + 0.05)
//! wcag3:                   APCA Lc, negated on a dark background
//! ```
//!
//! A background is dark when its lightness `v` is below 0.5.

pub mod apca;
pub mod ratio;
pub mod transfer;

use std::fmt;
use std::str::FromStr;

use palette::Hsluv;
use palette::convert::FromColorUnclamped;
use palette::white_point::D65;
use serde::{Deserialize, Serialize};

pub use self::ratio::{is_positive_ratio, min_positive_ratio, multiply_contrast_ratio, ratio_names};
use self::ratio::round_to;
use self::transfer::{WcagTransfer, luminance};
use crate::color::Rgb;
use crate::error::ColorError;

/// Contrast algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastAlgorithm {
    /// WCAG 2.x luminance contrast ratio.
    #[default]
    Wcag2,
    /// APCA lightness contrast, as proposed for WCAG 3.
    Wcag3,
}

impl ContrastAlgorithm {
    /// Canonical name used in configuration files.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Wcag2 => "wcag2",
            Self::Wcag3 => "wcag3",
        }
    }

    pub fn all() -> &'static [Self] {
        const ALL: [ContrastAlgorithm; 2] = [ContrastAlgorithm::Wcag2, ContrastAlgorithm::Wcag3];
        &ALL
    }
}

impl fmt::Display for ContrastAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContrastAlgorithm {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ColorError::UnknownAlgorithm(s.to_string()))
    }
}

/// HSLuv lightness of a background scaled to `[0, 1]`, rounded to 2 decimals.
pub fn background_lightness(background: Rgb) -> f64 {
    let hsluv = Hsluv::<D65, f64>::from_color_unclamped(background);
    round_to(hsluv.l / 100.0, 2)
}

/// Signed contrast of `color` against `background`.
///
/// `background_v` is the background lightness in `[0, 1]`; when `None` it is
/// derived with [`background_lightness`].
pub fn contrast(
    color: Rgb,
    background: Rgb,
    background_v: Option<f64>,
    algorithm: ContrastAlgorithm,
) -> f64 {
    let background_v = background_v.unwrap_or_else(|| background_lightness(background));
    let dark_background = background_v < 0.5;

    match algorithm {
        ContrastAlgorithm::Wcag2 => wcag2(color, background, dark_background),
        ContrastAlgorithm::Wcag3 => {
            let lc = apca::apca_contrast(apca::apca_y(color), apca::apca_y(background));
            if dark_background { -lc } else { lc }
        }
    }
}

fn wcag2(color: Rgb, background: Rgb, dark_background: bool) -> f64 {
    let color_lum = luminance(color, &WcagTransfer, WcagTransfer::WEIGHTS);
    let background_lum = luminance(background, &WcagTransfer, WcagTransfer::WEIGHTS);

    let cr1 = (color_lum + 0.05) / (background_lum + 0.05);
    let cr2 = (background_lum + 0.05) / (color_lum + 0.05);

    if dark_background {
        if cr1 >= 1.0 { cr1 } else { -cr2 }
    } else if cr1 < 1.0 {
        cr2
    } else if cr1 == 1.0 {
        1.0
    } else {
        -cr1
    }
}
