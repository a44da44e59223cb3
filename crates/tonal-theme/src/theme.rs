//! Themes: a background plus a set of colors resolved against it.
//!
//! Derived results are memoized per instance and invalidated by the setter
//! that changes one of their inputs:
//!
//! ```text
//! background scale  ← background color
//! contrast colors   ← everything
//! ```

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tonal_core::{ContrastAlgorithm, Rgb, generate_colors, multiply_contrast_ratio};

use crate::color::{BackgroundColor, Color};
use crate::config::ThemeConfig;
use crate::error::ThemeError;
use crate::format::{OutputFormat, convert_color_value};

/// One generated swatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub name: String,
    /// Target ratio after the theme's contrast multiplier.
    pub contrast: f64,
    pub value: String,
}

/// All swatches generated for one color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorGroup {
    pub name: String,
    pub values: Vec<Swatch>,
}

/// Output of a theme: the background value and every color's swatches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastColors {
    pub background: String,
    pub colors: Vec<ColorGroup>,
}

/// A validated theme.
#[derive(Debug)]
pub struct Theme {
    colors: Vec<Color>,
    background_color: BackgroundColor,
    lightness: f64,
    contrast: f64,
    saturation: f64,
    output: OutputFormat,
    formula: ContrastAlgorithm,

    background_scale: Mutex<Option<Vec<Rgb>>>,
    contrast_colors: Mutex<Option<ContrastColors>>,
}

impl Theme {
    /// Create a theme with contrast 1, saturation 100, HEX output and wcag2.
    pub fn new(
        colors: Vec<Color>,
        background_color: BackgroundColor,
        lightness: f64,
    ) -> Result<Self, ThemeError> {
        validate_lightness(lightness)?;
        for (i, color) in colors.iter().enumerate() {
            if colors[..i].iter().any(|c| c.name() == color.name()) {
                return Err(ThemeError::DuplicateColor(color.name().to_string()));
            }
        }

        Ok(Self {
            colors,
            background_color,
            lightness,
            contrast: 1.0,
            saturation: 100.0,
            output: OutputFormat::Hex,
            formula: ContrastAlgorithm::Wcag2,
            background_scale: Mutex::new(None),
            contrast_colors: Mutex::new(None),
        })
    }

    /// Build and validate a theme from its serialized description.
    pub fn from_config(config: ThemeConfig) -> Result<Self, ThemeError> {
        let colors = config
            .colors
            .into_iter()
            .map(|c| c.into_color())
            .collect::<Result<Vec<_>, _>>()?;
        let background = config.background_color.into_background()?;

        Self::new(colors, background, config.lightness)?
            .with_contrast(config.contrast)?
            .with_saturation(config.saturation)
            .map(|theme| theme.with_output(config.output).with_formula(config.formula))
    }

    /// Parse a JSON [`ThemeConfig`] and build the theme.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let config: ThemeConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    /// Describe this theme as a [`ThemeConfig`].
    pub fn to_config(&self) -> ThemeConfig {
        ThemeConfig::from_theme(self)
    }

    pub fn with_contrast(mut self, contrast: f64) -> Result<Self, ThemeError> {
        self.set_contrast(contrast)?;
        Ok(self)
    }

    pub fn with_saturation(mut self, saturation: f64) -> Result<Self, ThemeError> {
        self.set_saturation(saturation)?;
        Ok(self)
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.set_output(output);
        self
    }

    pub fn with_formula(mut self, formula: ContrastAlgorithm) -> Self {
        self.set_formula(formula);
        self
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn color(&self, name: &str) -> Option<&Color> {
        self.colors.iter().find(|c| c.name() == name)
    }

    pub fn background_color(&self) -> &BackgroundColor {
        &self.background_color
    }

    pub fn lightness(&self) -> f64 {
        self.lightness
    }

    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn formula(&self) -> ContrastAlgorithm {
        self.formula
    }

    // ── Setters ──────────────────────────────────────────────────

    pub fn set_lightness(&mut self, lightness: f64) -> Result<(), ThemeError> {
        validate_lightness(lightness)?;
        self.lightness = lightness;
        self.invalidate_contrast_colors();
        Ok(())
    }

    pub fn set_contrast(&mut self, contrast: f64) -> Result<(), ThemeError> {
        if !(contrast > 0.0 && contrast.is_finite()) {
            return Err(ThemeError::ContrastOutOfRange(contrast));
        }
        self.contrast = contrast;
        self.invalidate_contrast_colors();
        Ok(())
    }

    pub fn set_saturation(&mut self, saturation: f64) -> Result<(), ThemeError> {
        if !(0.0..=100.0).contains(&saturation) {
            return Err(ThemeError::SaturationOutOfRange(saturation));
        }
        self.saturation = saturation;
        self.invalidate_contrast_colors();
        Ok(())
    }

    pub fn set_output(&mut self, output: OutputFormat) {
        self.output = output;
        self.invalidate_contrast_colors();
    }

    pub fn set_formula(&mut self, formula: ContrastAlgorithm) {
        self.formula = formula;
        self.invalidate_contrast_colors();
    }

    pub fn set_background_color(&mut self, background_color: BackgroundColor) {
        self.background_color = background_color;
        *self.background_scale.get_mut() = None;
        self.invalidate_contrast_colors();
    }

    pub fn add_color(&mut self, color: Color) -> Result<(), ThemeError> {
        if self.color(color.name()).is_some() {
            return Err(ThemeError::DuplicateColor(color.name().to_string()));
        }
        self.colors.push(color);
        self.invalidate_contrast_colors();
        Ok(())
    }

    pub fn remove_color(&mut self, name: &str) -> Result<Color, ThemeError> {
        let idx = self
            .colors
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| ThemeError::UnknownColor(name.to_string()))?;
        self.invalidate_contrast_colors();
        Ok(self.colors.remove(idx))
    }

    /// Edit a color in place through its validating setters.
    pub fn update_color<F>(&mut self, name: &str, update: F) -> Result<(), ThemeError>
    where
        F: FnOnce(&mut Color) -> Result<(), ThemeError>,
    {
        let color = self
            .colors
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| ThemeError::UnknownColor(name.to_string()))?;
        let result = update(color);
        self.invalidate_contrast_colors();
        result
    }

    fn invalidate_contrast_colors(&mut self) {
        *self.contrast_colors.get_mut() = None;
    }

    // ── Derived values ───────────────────────────────────────────

    /// The background color at the theme's lightness.
    pub fn background_color_value(&self) -> Rgb {
        let scale = self.background_scale();
        let idx = (self.lightness + 0.5).floor() as usize;
        scale
            .get(idx)
            .or(scale.last())
            .copied()
            .unwrap_or(Rgb::new(1.0, 1.0, 1.0))
    }

    fn background_scale(&self) -> Vec<Rgb> {
        if let Some(scale) = self.background_scale.lock().as_ref() {
            return scale.clone();
        }
        tracing::debug!("Recomputing background scale for {}", self.background_color.name());
        let scale = self.background_color.background_scale();
        *self.background_scale.lock() = Some(scale.clone());
        scale
    }

    /// Every color's swatches against the background.
    pub fn contrast_colors(&self) -> ContrastColors {
        if let Some(result) = self.contrast_colors.lock().as_ref() {
            return result.clone();
        }
        tracing::debug!("Recomputing contrast colors for {} colors", self.colors.len());
        let result = self.compute_contrast_colors();
        *self.contrast_colors.lock() = Some(result.clone());
        result
    }

    fn compute_contrast_colors(&self) -> ContrastColors {
        let background = self.background_color_value();
        let background_v = self.lightness / 100.0;

        let colors = self
            .colors
            .iter()
            .map(|color| {
                let resolved = color.ratios().resolve(color.name(), self.formula);
                let ratios: Vec<f64> = resolved
                    .iter()
                    .map(|(_, ratio)| multiply_contrast_ratio(*ratio, self.contrast))
                    .collect();
                let found = generate_colors(
                    &color.key_colors(self.saturation),
                    background,
                    Some(background_v),
                    &ratios,
                    self.formula,
                    None,
                );

                let values = resolved
                    .into_iter()
                    .zip(ratios)
                    .zip(found)
                    .map(|(((name, _), contrast), rgb)| Swatch {
                        name,
                        contrast,
                        value: convert_color_value(rgb, self.output),
                    })
                    .collect();

                ColorGroup {
                    name: color.name().to_string(),
                    values,
                }
            })
            .collect();

        ContrastColors {
            background: convert_color_value(background, self.output),
            colors,
        }
    }

    /// `(name, value)` pairs, starting with `("background", …)`.
    pub fn contrast_color_pairs(&self) -> Vec<(String, String)> {
        let result = self.contrast_colors();
        std::iter::once(("background".to_string(), result.background))
            .chain(
                result
                    .colors
                    .into_iter()
                    .flat_map(|group| group.values)
                    .map(|swatch| (swatch.name, swatch.value)),
            )
            .collect()
    }

    /// Every swatch value in order, without the background.
    pub fn contrast_color_values(&self) -> Vec<String> {
        self.contrast_colors()
            .colors
            .into_iter()
            .flat_map(|group| group.values)
            .map(|swatch| swatch.value)
            .collect()
    }
}

fn validate_lightness(lightness: f64) -> Result<(), ThemeError> {
    if (0.0..=100.0).contains(&lightness) {
        Ok(())
    } else {
        Err(ThemeError::LightnessOutOfRange(lightness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_theme() -> Theme {
        let blue = Color::new("blue", ["#0070f3"], vec![3.0, 4.5]).unwrap();
        let gray = Color::new("gray", ["#cacaca"], vec![1.5, 7.0]).unwrap();
        let bg = BackgroundColor::new("gray", ["#cacaca"]).unwrap();
        Theme::new(vec![blue, gray], bg, 97.0).unwrap()
    }

    #[test]
    fn test_validation() {
        let bg = BackgroundColor::new("bg", ["#ffffff"]).unwrap();
        assert!(matches!(
            Theme::new(vec![], bg.clone(), 101.0),
            Err(ThemeError::LightnessOutOfRange(_))
        ));
        let c = Color::new("a", ["#000"], vec![3.0]).unwrap();
        assert!(matches!(
            Theme::new(vec![c.clone(), c], bg.clone(), 50.0),
            Err(ThemeError::DuplicateColor(_))
        ));
        let theme = Theme::new(vec![], bg, 50.0).unwrap();
        assert!(matches!(theme.with_contrast(0.0), Err(ThemeError::ContrastOutOfRange(_))));
    }

    #[test]
    fn test_output_shape_and_names() {
        let theme = sample_theme();
        let result = theme.contrast_colors();
        assert_eq!(result.colors.len(), 2);
        let names: Vec<&str> = result.colors[0].values.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["blue100", "blue200"]);
        assert_eq!(result.colors[1].values[1].contrast, 7.0);
        assert!(result.background.starts_with('#'));
    }

    #[test]
    fn test_pairs_start_with_background() {
        let theme = sample_theme();
        let pairs = theme.contrast_color_pairs();
        assert_eq!(pairs[0].0, "background");
        assert_eq!(pairs.len(), 5);
        assert_eq!(theme.contrast_color_values().len(), 4);
    }

    #[test]
    fn test_contrast_multiplier_applies_to_swatches() {
        let theme = sample_theme().with_contrast(2.0).unwrap();
        let result = theme.contrast_colors();
        let contrasts: Vec<f64> = result.colors[0].values.iter().map(|s| s.contrast).collect();
        assert_eq!(contrasts, [5.0, 8.0]);
    }

    #[test]
    fn test_setters_invalidate_cached_output() {
        let mut theme = sample_theme();
        let before = theme.contrast_colors();
        assert_eq!(theme.contrast_colors(), before);

        theme.set_output(OutputFormat::Rgb);
        let after = theme.contrast_colors();
        assert_ne!(after, before);
        assert!(after.background.starts_with("rgb("));

        theme.set_lightness(20.0).unwrap();
        let dark = theme.contrast_colors();
        assert_ne!(dark.background, after.background);
    }

    #[test]
    fn test_update_and_remove_color() {
        let mut theme = sample_theme();
        theme
            .update_color("blue", |c| c.set_ratios(vec![7.0]))
            .unwrap();
        assert_eq!(theme.contrast_colors().colors[0].values.len(), 1);
        assert!(matches!(
            theme.update_color("red", |_| Ok(())),
            Err(ThemeError::UnknownColor(_))
        ));
        theme.remove_color("gray").unwrap();
        assert_eq!(theme.contrast_colors().colors.len(), 1);
    }

    #[test]
    fn test_background_follows_lightness() {
        let mut theme = sample_theme();
        theme.set_lightness(0.0).unwrap();
        let dark = tonal_core::ColorSpace::Hsluv.to_channels(theme.background_color_value());
        assert!(dark[2] < 0.5, "{dark:?}");
        theme.set_lightness(100.0).unwrap();
        assert_eq!(convert_color_value(theme.background_color_value(), OutputFormat::Hex), "#ffffff");
    }
}
