//! Color values and string parsing.
//!
//! All colors flowing through the engine are `Srgb<f64>` with channels in
//! `[0, 1]`. Scale outputs are clamped into gamut but not quantized; 8-bit
//! rounding only happens when a color is formatted.

use palette::Srgb;

use crate::error::ColorError;

/// An sRGB color with normalized `f64` channels.
pub type Rgb = Srgb<f64>;

/// Parse a color string.
///
/// Accepts `#rgb` and `#rrggbb` hex codes (the `#` is optional), CSS named
/// colors (case-insensitive) and `rgb(r, g, b)` with components in `0..=255`.
pub fn parse_color(input: &str) -> Result<Rgb, ColorError> {
    let trimmed = input.trim();
    let invalid = || ColorError::InvalidColor(input.to_string());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_function(args).ok_or_else(invalid);
    }

    if let Some(named) = palette::named::from_str(&lower) {
        return Ok(named.into_format());
    }

    let is_hex = {
        let digits = lower.strip_prefix('#').unwrap_or(&lower);
        matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
    };
    if !is_hex {
        return Err(invalid());
    }

    lower
        .parse::<Srgb<u8>>()
        .map(|c| c.into_format())
        .map_err(|_| invalid())
}

/// Returns `true` if [`parse_color`] accepts the input.
pub fn is_valid_color(input: &str) -> bool {
    parse_color(input).is_ok()
}

fn parse_rgb_function(args: &str) -> Option<Rgb> {
    let parts: Vec<f64> = args
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f64>().ok())
        .collect::<Option<_>>()?;

    if parts.len() != 3 || parts.iter().any(|v| !(0.0..=255.0).contains(v)) {
        return None;
    }

    Some(Rgb::new(parts[0] / 255.0, parts[1] / 255.0, parts[2] / 255.0))
}

/// Clamp every channel into `[0, 1]`. `NaN` channels become 0.
pub fn clamp_rgb(rgb: Rgb) -> Rgb {
    let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    Rgb::new(clamp(rgb.red), clamp(rgb.green), clamp(rgb.blue))
}

/// Quantize a color to 8-bit channels. Ties round up.
pub fn to_rgb8(rgb: Rgb) -> Srgb<u8> {
    clamp_rgb(rgb).into_format()
}

/// Format a color as a lowercase `#rrggbb` hex code.
pub fn to_hex(rgb: Rgb) -> String {
    format!("#{:x}", to_rgb8(rgb))
}
