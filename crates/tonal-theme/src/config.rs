//! Serializable theme description, as read from JSON.
//!
//! ```json
//! {
//!   "colors": [{ "name": "blue", "colorKeys": ["#0070f3"], "ratios": [3, 4.5] }],
//!   "backgroundColor": { "name": "gray", "colorKeys": ["#cacaca"] },
//!   "lightness": 97,
//!   "contrast": 1,
//!   "saturation": 100,
//!   "output": "HEX",
//!   "formula": "wcag2"
//! }
//! ```

use serde::{Deserialize, Serialize};
use tonal_core::{ColorSpace, ContrastAlgorithm, to_hex};

use crate::color::{BackgroundColor, Color, Ratios};
use crate::error::ThemeError;
use crate::format::OutputFormat;
use crate::theme::Theme;

fn default_colorspace() -> ColorSpace {
    ColorSpace::Cam02
}

fn default_contrast() -> f64 {
    1.0
}

fn default_saturation() -> f64 {
    100.0
}

/// One color entry. Backgrounds ignore `ratios` and `output`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorConfig {
    pub name: String,
    pub color_keys: Vec<String>,
    #[serde(default = "default_colorspace")]
    pub colorspace: ColorSpace,
    #[serde(default)]
    pub ratios: Ratios,
    #[serde(default)]
    pub smooth: bool,
    #[serde(default)]
    pub output: OutputFormat,
}

impl ColorConfig {
    pub fn into_color(self) -> Result<Color, ThemeError> {
        Ok(Color::new(self.name, self.color_keys, self.ratios)?
            .with_colorspace(self.colorspace)
            .with_smooth(self.smooth)
            .with_output(self.output))
    }

    pub fn into_background(self) -> Result<BackgroundColor, ThemeError> {
        Ok(BackgroundColor::new(self.name, self.color_keys)?
            .with_colorspace(self.colorspace)
            .with_smooth(self.smooth))
    }

    fn from_color(color: &Color) -> Self {
        Self {
            name: color.name().to_string(),
            color_keys: color.color_keys().iter().map(|&rgb| to_hex(rgb)).collect(),
            colorspace: color.colorspace(),
            ratios: color.ratios().clone(),
            smooth: color.smooth(),
            output: color.output(),
        }
    }
}

/// Everything needed to build a [`Theme`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub colors: Vec<ColorConfig>,
    pub background_color: ColorConfig,
    pub lightness: f64,
    #[serde(default = "default_contrast")]
    pub contrast: f64,
    #[serde(default = "default_saturation")]
    pub saturation: f64,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default)]
    pub formula: ContrastAlgorithm,
}

impl ThemeConfig {
    pub(crate) fn from_theme(theme: &Theme) -> Self {
        Self {
            colors: theme.colors().iter().map(ColorConfig::from_color).collect(),
            background_color: ColorConfig::from_color(theme.background_color().color()),
            lightness: theme.lightness(),
            contrast: theme.contrast(),
            saturation: theme.saturation(),
            output: theme.output(),
            formula: theme.formula(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: ThemeConfig = serde_json::from_str(
            r##"{
                "colors": [{ "name": "blue", "colorKeys": ["#0070f3"], "ratios": [3, 4.5] }],
                "backgroundColor": { "name": "gray", "colorKeys": ["#cacaca"] },
                "lightness": 97
            }"##,
        )
        .unwrap();
        assert_eq!(config.contrast, 1.0);
        assert_eq!(config.saturation, 100.0);
        assert_eq!(config.output, OutputFormat::Hex);
        assert_eq!(config.formula, ContrastAlgorithm::Wcag2);
        assert_eq!(config.colors[0].colorspace, ColorSpace::Cam02);
        assert!(config.background_color.ratios.is_empty());
    }

    #[test]
    fn test_config_round_trips_through_theme() {
        let json = r##"{
            "colors": [{
                "name": "red",
                "colorKeys": ["#e53935"],
                "colorspace": "OKLCH",
                "ratios": { "red-low": 3, "red-high": 7 },
                "smooth": true
            }],
            "backgroundColor": { "name": "gray", "colorKeys": ["#cacaca"], "colorspace": "HSLuv" },
            "lightness": 90,
            "contrast": 1.2,
            "saturation": 80,
            "output": "RGB",
            "formula": "wcag3"
        }"##;
        let config: ThemeConfig = serde_json::from_str(json).unwrap();
        let theme = Theme::from_config(config.clone()).unwrap();
        assert_eq!(theme.to_config(), config);
    }
}
