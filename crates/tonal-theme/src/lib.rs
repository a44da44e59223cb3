//! Tonal Theme — validated colors, themes and formatted output.
//!
//! Builds on `tonal-core`: a [`Theme`] picks a background from its
//! [`BackgroundColor`] at the requested lightness, then generates every
//! [`Color`]'s swatches against it and formats them as CSS-like strings.

pub mod color;
pub mod config;
pub mod error;
pub mod format;
pub mod theme;

pub use color::{BackgroundColor, Color, Ratios};
pub use config::{ColorConfig, ThemeConfig};
pub use error::ThemeError;
pub use format::{OutputFormat, convert_color_value};
pub use theme::{ColorGroup, ContrastColors, Swatch, Theme};
