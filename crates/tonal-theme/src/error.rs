use tonal_core::ColorError;

/// Errors raised while building or editing a theme.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("color name must not be empty")]
    MissingName,

    #[error("color {0:?} has no key colors")]
    NoKeyColors(String),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("color {0:?} has no ratios")]
    EmptyRatios(String),

    #[error("color {name:?} has a non-finite ratio")]
    NonFiniteRatio { name: String },

    #[error("lightness {0} is outside [0, 100]")]
    LightnessOutOfRange(f64),

    #[error("saturation {0} is outside [0, 100]")]
    SaturationOutOfRange(f64),

    #[error("contrast multiplier {0} must be greater than 0")]
    ContrastOutOfRange(f64),

    #[error("duplicate color name {0:?}")]
    DuplicateColor(String),

    #[error("unknown color {0:?}")]
    UnknownColor(String),

    #[error("unknown output format {0:?}")]
    UnknownFormat(String),

    #[error("invalid theme configuration: {0}")]
    Json(#[from] serde_json::Error),
}
