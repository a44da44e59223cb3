//! Tonal Core — scale construction and contrast search for accessible palettes.
//!
//! This crate contains the color-space adapters, the spline curve engine,
//! the color scale builder, both contrast algorithms, and the bisection
//! search that turns target contrast ratios into concrete colors. No I/O.

pub mod color;
pub mod color_space;
pub mod contrast;
pub mod curve;
pub mod error;
pub mod scale;
pub mod search;

// Re-exports for convenience.
pub use color::{Rgb, is_valid_color, parse_color, to_hex};
pub use color_space::ColorSpace;
pub use contrast::{
    ContrastAlgorithm, contrast, is_positive_ratio, min_positive_ratio, multiply_contrast_ratio,
    ratio_names,
};
pub use error::ColorError;
pub use scale::{ColorScale, DistributeLightness, Scale, ScaleOptions, color_scale, scale_domains};
pub use search::{DEFAULT_GRANULARITY, KeyColors, generate_colors, search_position};
