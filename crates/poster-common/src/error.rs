//! Error types for poster generation.

use thiserror::Error;

/// Result type alias using PosterError.
pub type PosterResult<T> = Result<T, PosterError>;

/// Primary error type for poster generation.
#[derive(Debug, Error)]
pub enum PosterError {
    // === Input Errors ===
    #[error("Invalid input: {0}")]
    InputInvalid(String),

    // === Acquisition Errors ===
    #[error("Map data unavailable: last endpoint '{endpoint}' failed: {cause}")]
    DataUnavailable { endpoint: String, cause: String },

    // === Projection Errors ===
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    // === Theme Errors ===
    #[error("Invalid theme: {0}")]
    ThemeInvalid(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderFailure(String),
}

impl PosterError {
    /// Stable machine-readable label for this error class, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PosterError::InputInvalid(_) => "input_invalid",
            PosterError::DataUnavailable { .. } => "data_unavailable",
            PosterError::InvalidBounds(_) => "invalid_bounds",
            PosterError::ThemeInvalid(_) => "theme_invalid",
            PosterError::RenderFailure(_) => "render_failure",
        }
    }

    /// True for failures callers can fix by changing the request.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            PosterError::InputInvalid(_) | PosterError::ThemeInvalid(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for PosterError {
    fn from(err: std::io::Error) -> Self {
        PosterError::RenderFailure(format!("I/O error: {}", err))
    }
}
