//! Validated colors: key colors, interpolation space and target ratios.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tonal_core::{
    ColorScale, ColorSpace, ContrastAlgorithm, KeyColors, Rgb, ScaleOptions, parse_color,
    ratio_names,
};

use crate::error::ThemeError;
use crate::format::{OutputFormat, convert_color_value};

/// Resolution of [`Color::color_scale`].
const SCALE_GRANULARITY: usize = 3000;

// ── Ratios ───────────────────────────────────────────────────────

/// Target ratios of a color, either positional or explicitly named.
///
/// Positional ratios serialize as a JSON array and get generated names;
/// named ratios serialize as a JSON object and keep their order.
#[derive(Debug, Clone, PartialEq)]
pub enum Ratios {
    Positional(Vec<f64>),
    Named(Vec<(String, f64)>),
}

impl Default for Ratios {
    fn default() -> Self {
        Self::Positional(Vec::new())
    }
}

impl Ratios {
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(values) => values.len(),
            Self::Named(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn values(&self) -> Vec<f64> {
        match self {
            Self::Positional(values) => values.clone(),
            Self::Named(pairs) => pairs.iter().map(|(_, r)| *r).collect(),
        }
    }

    /// Ordered `(swatch name, ratio)` pairs.
    ///
    /// Positional ratios are sorted ascending and named
    /// `<color name><ratio name>` with whitespace removed from the color name.
    pub fn resolve(&self, color_name: &str, algorithm: ContrastAlgorithm) -> Vec<(String, f64)> {
        match self {
            Self::Named(pairs) => pairs.clone(),
            Self::Positional(values) => {
                let mut sorted = values.clone();
                sorted.sort_by(f64::total_cmp);
                let prefix: String = color_name.chars().filter(|c| !c.is_whitespace()).collect();
                ratio_names(&sorted, algorithm)
                    .into_iter()
                    .zip(sorted)
                    .map(|(suffix, ratio)| (format!("{prefix}{suffix}"), ratio))
                    .collect()
            }
        }
    }
}

impl From<Vec<f64>> for Ratios {
    fn from(values: Vec<f64>) -> Self {
        Self::Positional(values)
    }
}

impl Serialize for Ratios {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Positional(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Self::Named(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (name, value) in pairs {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Ratios {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RatiosVisitor;

        impl<'de> Visitor<'de> for RatiosVisitor {
            type Value = Ratios;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of ratios or a map of swatch names to ratios")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Ratios, A::Error> {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(value) = seq.next_element::<f64>()? {
                    values.push(value);
                }
                Ok(Ratios::Positional(values))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Ratios, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, f64>()? {
                    if pairs.iter().any(|(existing, _): &(String, f64)| *existing == name) {
                        return Err(de::Error::custom(format!("duplicate swatch name {name:?}")));
                    }
                    pairs.push((name, value));
                }
                Ok(Ratios::Named(pairs))
            }
        }

        deserializer.deserialize_any(RatiosVisitor)
    }
}

// ── Color ────────────────────────────────────────────────────────

/// A named color role with its key colors and target ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    name: String,
    color_keys: Vec<Rgb>,
    colorspace: ColorSpace,
    ratios: Ratios,
    smooth: bool,
    output: OutputFormat,
}

impl Color {
    /// Create a color, validating every input.
    ///
    /// Defaults: CAM02 interpolation, piecewise, HEX output.
    pub fn new<I, S>(name: impl Into<String>, color_keys: I, ratios: impl Into<Ratios>) -> Result<Self, ThemeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let color = Self::without_ratios(name, color_keys)?;
        let ratios = ratios.into();
        validate_ratios(&color.name, &ratios)?;
        Ok(Self { ratios, ..color })
    }

    /// Validate name and keys; ratios start empty.
    pub(crate) fn without_ratios<I, S>(name: impl Into<String>, color_keys: I) -> Result<Self, ThemeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ThemeError::MissingName);
        }
        let color_keys = parse_keys(&name, color_keys)?;
        Ok(Self {
            name,
            color_keys,
            colorspace: ColorSpace::Cam02,
            ratios: Ratios::default(),
            smooth: false,
            output: OutputFormat::Hex,
        })
    }

    pub fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color_keys(&self) -> &[Rgb] {
        &self.color_keys
    }

    pub fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    pub fn ratios(&self) -> &Ratios {
        &self.ratios
    }

    pub fn smooth(&self) -> bool {
        self.smooth
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn set_color_keys<I, S>(&mut self, color_keys: I) -> Result<(), ThemeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.color_keys = parse_keys(&self.name, color_keys)?;
        Ok(())
    }

    pub fn set_colorspace(&mut self, colorspace: ColorSpace) {
        self.colorspace = colorspace;
    }

    pub fn set_ratios(&mut self, ratios: impl Into<Ratios>) -> Result<(), ThemeError> {
        let ratios = ratios.into();
        validate_ratios(&self.name, &ratios)?;
        self.ratios = ratios;
        Ok(())
    }

    pub fn set_smooth(&mut self, smooth: bool) {
        self.smooth = smooth;
    }

    pub fn set_output(&mut self, output: OutputFormat) {
        self.output = output;
    }

    /// Key colors with their HSLuv saturation scaled by `saturation / 100`.
    ///
    /// Always derived from the original keys, so repeated calls never
    /// compound.
    pub fn key_colors(&self, saturation: f64) -> KeyColors {
        let keys = if saturation == 100.0 {
            self.color_keys.clone()
        } else {
            self.color_keys
                .iter()
                .map(|&rgb| desaturate(rgb, saturation / 100.0))
                .collect()
        };
        KeyColors::new(keys, self.colorspace).with_smooth(self.smooth)
    }

    /// The full white-to-black scale of this color, formatted.
    pub fn color_scale(&self) -> Vec<String> {
        let options = ScaleOptions {
            smooth: self.smooth,
            ..ScaleOptions::default()
        };
        ColorScale::build(SCALE_GRANULARITY, &self.color_keys, self.colorspace, &options)
            .colors()
            .into_iter()
            .map(|rgb| convert_color_value(rgb, self.output))
            .collect()
    }
}

fn parse_keys<I, S>(name: &str, color_keys: I) -> Result<Vec<Rgb>, ThemeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let keys = color_keys
        .into_iter()
        .map(|key| parse_color(key.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    if keys.is_empty() {
        return Err(ThemeError::NoKeyColors(name.to_string()));
    }
    Ok(keys)
}

fn validate_ratios(name: &str, ratios: &Ratios) -> Result<(), ThemeError> {
    if ratios.is_empty() {
        return Err(ThemeError::EmptyRatios(name.to_string()));
    }
    if ratios.values().iter().any(|r| !r.is_finite()) {
        return Err(ThemeError::NonFiniteRatio {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn desaturate(rgb: Rgb, factor: f64) -> Rgb {
    let [h, s, l] = ColorSpace::Hsluv.to_channels(rgb);
    ColorSpace::Hsluv.from_channels([h, s * factor, l])
}

// ── Background ───────────────────────────────────────────────────

/// The color a theme's background is picked from.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundColor {
    color: Color,
}

/// Resolution of the background lightness scale.
const BACKGROUND_GRANULARITY: usize = 1000;

impl BackgroundColor {
    /// Background colors carry no ratios.
    pub fn new<I, S>(name: impl Into<String>, color_keys: I) -> Result<Self, ThemeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            color: Color::without_ratios(name, color_keys)?,
        })
    }

    pub fn with_colorspace(self, colorspace: ColorSpace) -> Self {
        Self {
            color: self.color.with_colorspace(colorspace),
        }
    }

    pub fn with_smooth(self, smooth: bool) -> Self {
        Self {
            color: self.color.with_smooth(smooth),
        }
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn name(&self) -> &str {
        self.color.name()
    }

    /// One color per rounded HSLuv lightness, ascending.
    ///
    /// Samples a 1000-step full scale plus the original keys; when several
    /// colors share a lightness the first one wins.
    pub fn background_scale(&self) -> Vec<Rgb> {
        let options = ScaleOptions {
            smooth: self.color.smooth,
            ..ScaleOptions::default()
        };
        let scale = ColorScale::build(
            BACKGROUND_GRANULARITY,
            &self.color.color_keys,
            self.color.colorspace,
            &options,
        );

        let mut by_lightness: Vec<(i64, Rgb)> = Vec::new();
        for rgb in scale.colors().into_iter().chain(self.color.color_keys.iter().copied()) {
            let l = (ColorSpace::Hsluv.to_channels(rgb)[2] + 0.5).floor() as i64;
            if !by_lightness.iter().any(|(existing, _)| *existing == l) {
                by_lightness.push((l, rgb));
            }
        }
        by_lightness.sort_by_key(|(l, _)| *l);
        by_lightness.into_iter().map(|(_, rgb)| rgb).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_inputs() {
        assert!(matches!(Color::new("", ["#fff"], vec![3.0]), Err(ThemeError::MissingName)));
        assert!(matches!(
            Color::new("blue", Vec::<&str>::new(), vec![3.0]),
            Err(ThemeError::NoKeyColors(_))
        ));
        assert!(matches!(
            Color::new("blue", ["#12345"], vec![3.0]),
            Err(ThemeError::Color(_))
        ));
        assert!(matches!(
            Color::new("blue", ["#0000ff"], Vec::<f64>::new()),
            Err(ThemeError::EmptyRatios(_))
        ));
        assert!(matches!(
            Color::new("blue", ["#0000ff"], vec![3.0, f64::NAN]),
            Err(ThemeError::NonFiniteRatio { .. })
        ));
    }

    #[test]
    fn test_setters_revalidate() {
        let mut color = Color::new("blue", ["#0000ff"], vec![3.0]).unwrap();
        assert!(color.set_color_keys(["nope"]).is_err());
        assert_eq!(color.color_keys().len(), 1);
        assert!(color.set_ratios(Vec::<f64>::new()).is_err());
        color.set_ratios(vec![4.5, 7.0]).unwrap();
        assert_eq!(color.ratios().len(), 2);
    }

    #[test]
    fn test_positional_ratios_sort_and_name() {
        let ratios = Ratios::Positional(vec![4.5, 3.0, 7.0]);
        let resolved = ratios.resolve("Light Blue", ContrastAlgorithm::Wcag2);
        assert_eq!(
            resolved,
            vec![
                ("LightBlue100".to_string(), 3.0),
                ("LightBlue200".to_string(), 4.5),
                ("LightBlue300".to_string(), 7.0),
            ]
        );
    }

    #[test]
    fn test_named_ratios_keep_order() {
        let ratios: Ratios = serde_json::from_str(r#"{"z": 7, "a": 3}"#).unwrap();
        let resolved = ratios.resolve("blue", ContrastAlgorithm::Wcag2);
        assert_eq!(resolved, vec![("z".to_string(), 7.0), ("a".to_string(), 3.0)]);
    }

    #[test]
    fn test_ratios_json_shapes() {
        let positional: Ratios = serde_json::from_str("[3, 4.5]").unwrap();
        assert_eq!(positional, Ratios::Positional(vec![3.0, 4.5]));
        assert_eq!(serde_json::to_string(&positional).unwrap(), "[3.0,4.5]");
        assert!(serde_json::from_str::<Ratios>(r#"{"a": 3, "a": 4}"#).is_err());
    }

    #[test]
    fn test_saturation_scales_hsluv_saturation_without_compounding() {
        let color = Color::new("red", ["#e53935"], vec![3.0]).unwrap();
        let half = color.key_colors(50.0).keys[0];
        let again = color.key_colors(50.0).keys[0];
        assert_eq!(half, again);

        let original = ColorSpace::Hsluv.to_channels(color.color_keys()[0]);
        let halved = ColorSpace::Hsluv.to_channels(half);
        assert!((halved[1] - original[1] / 2.0).abs() < 1.0, "{halved:?} vs {original:?}");
        assert!((halved[2] - original[2]).abs() < 0.5);

        let grey = color.key_colors(0.0).keys[0];
        assert!((grey.red - grey.green).abs() < 1e-3 && (grey.green - grey.blue).abs() < 1e-3);
    }

    #[test]
    fn test_color_scale_is_formatted() {
        let color = Color::new("teal", ["#008080"], vec![3.0])
            .unwrap()
            .with_output(OutputFormat::Rgb);
        let scale = color.color_scale();
        assert_eq!(scale.len(), SCALE_GRANULARITY);
        assert_eq!(scale[0], "rgb(255, 255, 255)");
        assert_eq!(scale[scale.len() - 1], "rgb(0, 0, 0)");
    }

    #[test]
    fn test_background_scale_is_sorted_and_unique() {
        let bg = BackgroundColor::new("gray", ["#cacaca"]).unwrap();
        let scale = bg.background_scale();
        let lightness: Vec<i64> = scale
            .iter()
            .map(|&rgb| (ColorSpace::Hsluv.to_channels(rgb)[2] + 0.5).floor() as i64)
            .collect();
        for pair in lightness.windows(2) {
            assert!(pair[0] < pair[1], "{lightness:?}");
        }
        assert_eq!(lightness.first(), Some(&0));
        assert_eq!(lightness.last(), Some(&100));
    }
}
