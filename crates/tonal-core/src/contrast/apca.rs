//! APCA lightness contrast (`Lc`), apca-w3 0.1.9 constants.
//!
//! Positive `Lc` means dark text on a light background, negative means light
//! text on a dark background.

use super::transfer::{ApcaTransfer, luminance};
use crate::color::Rgb;

const NORM_BG: f64 = 0.56;
const NORM_TXT: f64 = 0.57;
const REV_BG: f64 = 0.65;
const REV_TXT: f64 = 0.62;

const BLK_THRS: f64 = 0.022;
const BLK_CLMP: f64 = 1.414;

const SCALE_BOW: f64 = 1.14;
const SCALE_WOB: f64 = 1.14;
const LO_BOW_OFFSET: f64 = 0.027;
const LO_WOB_OFFSET: f64 = 0.027;
const DELTA_Y_MIN: f64 = 0.0005;
const LO_CLIP: f64 = 0.1;

/// Accepted range of input luminances.
const INPUT_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1.1;

/// APCA screen luminance of an sRGB color.
pub fn apca_y(rgb: Rgb) -> f64 {
    luminance(rgb, &ApcaTransfer, ApcaTransfer::WEIGHTS)
}

/// `Lc × 100` of text luminance against background luminance.
///
/// Returns 0 for inputs outside `[0, 1.1]`, for near-identical luminances,
/// and below the low-contrast clip.
pub fn apca_contrast(text_y: f64, background_y: f64) -> f64 {
    if text_y.is_nan()
        || background_y.is_nan()
        || !INPUT_RANGE.contains(&text_y)
        || !INPUT_RANGE.contains(&background_y)
    {
        return 0.0;
    }

    let soft_clamp = |y: f64| {
        if y > BLK_THRS {
            y
        } else {
            y + (BLK_THRS - y).powf(BLK_CLMP)
        }
    };
    let text_y = soft_clamp(text_y);
    let background_y = soft_clamp(background_y);

    if (background_y - text_y).abs() < DELTA_Y_MIN {
        return 0.0;
    }

    let output = if background_y > text_y {
        let sapc = (background_y.powf(NORM_BG) - text_y.powf(NORM_TXT)) * SCALE_BOW;
        if sapc < LO_CLIP { 0.0 } else { sapc - LO_BOW_OFFSET }
    } else {
        let sapc = (background_y.powf(REV_BG) - text_y.powf(REV_TXT)) * SCALE_WOB;
        if sapc > -LO_CLIP { 0.0 } else { sapc + LO_WOB_OFFSET }
    };

    output * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::parse_color;

    fn lc(text: &str, bg: &str) -> f64 {
        let text = parse_color(text).unwrap();
        let bg = parse_color(bg).unwrap();
        apca_contrast(apca_y(text), apca_y(bg))
    }

    #[test]
    fn test_black_on_white() {
        let v = lc("#000000", "#ffffff");
        assert!((v - 106.0).abs() < 1.0, "got {v}");
    }

    #[test]
    fn test_white_on_black() {
        let v = lc("#ffffff", "#000000");
        assert!((v + 107.9).abs() < 1.0, "got {v}");
    }

    #[test]
    fn test_grey_on_white() {
        let v = lc("#767676", "#ffffff");
        assert!((v - 71.6).abs() < 1.0, "got {v}");
    }

    #[test]
    fn test_same_color_is_zero() {
        assert_eq!(lc("#808080", "#808080"), 0.0);
    }

    #[test]
    fn test_out_of_range_input_is_zero() {
        assert_eq!(apca_contrast(1.2, 0.5), 0.0);
        assert_eq!(apca_contrast(0.2, -0.1), 0.0);
        assert_eq!(apca_contrast(f64::NAN, 0.5), 0.0);
    }

    #[test]
    fn test_low_contrast_is_clipped() {
        let v = lc("#f8f8f8", "#ffffff");
        assert_eq!(v, 0.0);
    }
}
