//! Transfer curves used to compute luminance for the contrast algorithms.
//!
//! WCAG 2 and APCA linearize sRGB differently: WCAG uses the piecewise sRGB
//! curve with the legacy `0.03928` threshold, APCA a plain 2.4 power.

use crate::color::Rgb;

/// A transfer function that linearizes encoded sRGB channels.
pub trait TransferFunction: Send + Sync {
    /// Convert from non-linear (encoded) to linear light.
    fn to_linear(&self, encoded: f64) -> f64;
}

/// Luminance of an sRGB color with the given transfer and channel weights.
pub fn luminance(rgb: Rgb, transfer: &dyn TransferFunction, weights: [f64; 3]) -> f64 {
    weights[0] * transfer.to_linear(rgb.red)
        + weights[1] * transfer.to_linear(rgb.green)
        + weights[2] * transfer.to_linear(rgb.blue)
}

// ---------------------------------------------------------------------------
// WCAG 2.x relative luminance
// ---------------------------------------------------------------------------

/// sRGB transfer as written in WCAG 2.x.
///
/// ```text
/// V <= 0.03928 → V / 12.92
/// V >  0.03928 → ((V + 0.055) / 1.055) ^ 2.4
/// ```
///
/// # Reference
/// W3C WCAG 2.1, definition of relative luminance
#[derive(Debug, Clone, Copy)]
pub struct WcagTransfer;

impl WcagTransfer {
    const THRESHOLD: f64 = 0.03928;

    /// Rec. 709 luminance weights.
    pub const WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];
}

impl TransferFunction for WcagTransfer {
    fn to_linear(&self, encoded: f64) -> f64 {
        if encoded <= Self::THRESHOLD {
            encoded / 12.92
        } else {
            ((encoded + 0.055) / 1.055).powf(2.4)
        }
    }
}

// ---------------------------------------------------------------------------
// APCA screen luminance
// ---------------------------------------------------------------------------

/// Simple exponent used by APCA's `sRGBtoY` estimate.
///
/// ```text
/// V ^ 2.4
/// ```
///
/// # Reference
/// apca-w3 0.1.9, `sRGBtoY` (`mainTRC = 2.4`)
#[derive(Debug, Clone, Copy)]
pub struct ApcaTransfer;

impl ApcaTransfer {
    const EXPONENT: f64 = 2.4;

    /// APCA luminance coefficients.
    pub const WEIGHTS: [f64; 3] = [0.2126729, 0.7151522, 0.0721750];
}

impl TransferFunction for ApcaTransfer {
    fn to_linear(&self, encoded: f64) -> f64 {
        encoded.max(0.0).powf(Self::EXPONENT)
    }
}
