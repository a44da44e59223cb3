//! Output formats for generated colors.
//!
//! Every format is a CSS-like function string except `HEX`:
//!
//! ```text
//! HEX     #1e88e5            RGB     rgb(30, 136, 229)
//! HSL     hsl(208deg, 79%, 51%)
//! HSV     hsv(208deg, 87%, 90%)
//! HSLuv   hsluv(250, 91, 55)
//! LAB     lab(55%, 4, -58)   LCH     lch(55%, 58, 274deg)
//! OKLAB   oklab(62%, -0.04, -0.16)
//! OKLCH   oklch(62%, 0.162, 255deg)
//! CAM02   jab(…)             CAM02p  jch(…)
//! CAM16   cam16jab(…)        CAM16p  cam16jch(…)
//! HCT     hct(hdeg, c, t)
//! ```
//!
//! Values are rounded half up. Undefined hues print as 0.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tonal_core::{ColorSpace, Rgb, to_hex};

use crate::error::ThemeError;

/// Output format of generated color values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "HEX")]
    Hex,
    #[serde(rename = "RGB")]
    Rgb,
    #[serde(rename = "HSL")]
    Hsl,
    #[serde(rename = "HSV")]
    Hsv,
    #[serde(rename = "HSLuv")]
    Hsluv,
    #[serde(rename = "LAB")]
    Lab,
    #[serde(rename = "LCH")]
    Lch,
    #[serde(rename = "OKLAB")]
    Oklab,
    #[serde(rename = "OKLCH")]
    Oklch,
    #[serde(rename = "CAM02")]
    Cam02,
    #[serde(rename = "CAM02p")]
    Cam02p,
    #[serde(rename = "CAM16")]
    Cam16,
    #[serde(rename = "CAM16p")]
    Cam16p,
    #[serde(rename = "HCT")]
    Hct,
}

impl OutputFormat {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Hex => "HEX",
            Self::Rgb => "RGB",
            Self::Hsl => "HSL",
            Self::Hsv => "HSV",
            Self::Hsluv => "HSLuv",
            Self::Lab => "LAB",
            Self::Lch => "LCH",
            Self::Oklab => "OKLAB",
            Self::Oklch => "OKLCH",
            Self::Cam02 => "CAM02",
            Self::Cam02p => "CAM02p",
            Self::Cam16 => "CAM16",
            Self::Cam16p => "CAM16p",
            Self::Hct => "HCT",
        }
    }

    pub fn all() -> &'static [Self] {
        const ALL: [OutputFormat; 14] = [
            OutputFormat::Hex,
            OutputFormat::Rgb,
            OutputFormat::Hsl,
            OutputFormat::Hsv,
            OutputFormat::Hsluv,
            OutputFormat::Lab,
            OutputFormat::Lch,
            OutputFormat::Oklab,
            OutputFormat::Oklch,
            OutputFormat::Cam02,
            OutputFormat::Cam02p,
            OutputFormat::Cam16,
            OutputFormat::Cam16p,
            OutputFormat::Hct,
        ];
        &ALL
    }

    /// Color space whose channels the format prints; `None` for hex.
    const fn space(&self) -> Option<ColorSpace> {
        match self {
            Self::Hex => None,
            Self::Rgb => Some(ColorSpace::Rgb),
            Self::Hsl => Some(ColorSpace::Hsl),
            Self::Hsv => Some(ColorSpace::Hsv),
            Self::Hsluv => Some(ColorSpace::Hsluv),
            Self::Lab => Some(ColorSpace::Lab),
            Self::Lch => Some(ColorSpace::Lch),
            Self::Oklab => Some(ColorSpace::Oklab),
            Self::Oklch => Some(ColorSpace::Oklch),
            Self::Cam02 => Some(ColorSpace::Cam02),
            Self::Cam02p => Some(ColorSpace::Cam02p),
            Self::Cam16 => Some(ColorSpace::Cam16),
            Self::Cam16p => Some(ColorSpace::Cam16p),
            Self::Hct => Some(ColorSpace::Hct),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ThemeError::UnknownFormat(s.to_string()))
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    let rounded = (value * factor + 0.5).floor() / factor;
    // Avoid printing "-0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn int(value: f64) -> String {
    format!("{}", round_to(value, 0))
}

fn percent(value: f64) -> String {
    format!("{}%", round_to(value, 0))
}

fn degrees(hue: f64) -> String {
    let hue = if hue.is_nan() { 0.0 } else { hue };
    format!("{}deg", round_to(hue, 0))
}

fn fixed(value: f64, places: i32) -> String {
    format!("{}", round_to(value, places))
}

/// Format a color in `format`.
pub fn convert_color_value(rgb: Rgb, format: OutputFormat) -> String {
    let Some(space) = format.space() else {
        return to_hex(rgb);
    };
    let [c0, c1, c2] = space.to_channels(rgb);

    match format {
        OutputFormat::Hex => to_hex(rgb),
        OutputFormat::Rgb => format!("rgb({}, {}, {})", int(c0), int(c1), int(c2)),
        OutputFormat::Hsl => format!(
            "hsl({}, {}, {})",
            degrees(c0),
            percent(c1 * 100.0),
            percent(c2 * 100.0)
        ),
        OutputFormat::Hsv => format!(
            "hsv({}, {}, {})",
            degrees(c0),
            percent(c1 * 100.0),
            percent(c2 * 100.0)
        ),
        OutputFormat::Hsluv => format!(
            "hsluv({}, {}, {})",
            int(if c0.is_nan() { 0.0 } else { c0 }),
            int(c1),
            int(c2)
        ),
        OutputFormat::Lab => format!("lab({}, {}, {})", percent(c0), int(c1), int(c2)),
        OutputFormat::Lch => format!("lch({}, {}, {})", percent(c0), int(c1), degrees(c2)),
        OutputFormat::Oklab => format!(
            "oklab({}, {}, {})",
            percent(c0 * 100.0),
            fixed(c1, 2),
            fixed(c2, 2)
        ),
        OutputFormat::Oklch => format!(
            "oklch({}, {}, {})",
            percent(c0 * 100.0),
            fixed(c1, 3),
            degrees(c2)
        ),
        OutputFormat::Cam02 => format!("jab({}, {}, {})", percent(c0), int(c1), int(c2)),
        OutputFormat::Cam02p => format!("jch({}, {}, {})", percent(c0), int(c1), degrees(c2)),
        OutputFormat::Cam16 => format!("cam16jab({}, {}, {})", percent(c0), int(c1), int(c2)),
        OutputFormat::Cam16p => {
            format!("cam16jch({}, {}, {})", percent(c0), int(c1), degrees(c2))
        }
        OutputFormat::Hct => format!("hct({}, {}, {})", degrees(c0), int(c1), int(c2)),
    }
}
