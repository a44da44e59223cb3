/// Errors raised while parsing user-facing color inputs.
///
/// The numeric core never returns errors; only string parsing does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("unknown color space: {0:?}")]
    UnknownColorSpace(String),

    #[error("unknown contrast algorithm: {0:?}")]
    UnknownAlgorithm(String),
}
