//! Error types for DOC chart generation.

use std::fmt;

use thiserror::Error;

/// Result type alias using DocError.
pub type DocResult<T> = Result<T, DocError>;

/// Chart axis, used to name the offending range in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Rotary speed, revolutions/min (x axis)
    Rpm,
    /// Rate of penetration, ft/hr (y axis)
    Rop,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rpm => f.write_str("rpm"),
            Axis::Rop => f.write_str("rop"),
        }
    }
}

/// Primary error type for chart generation.
#[derive(Debug, Error)]
pub enum DocError {
    // === Validation Errors ===
    #[error("Invalid {axis} range: min ({min}) must be less than max ({max})")]
    InvalidRange { axis: Axis, min: f64, max: f64 },

    #[error("Invalid DOC threshold {0}: must be a positive, finite value")]
    InvalidThreshold(f64),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderingFailure(String),
}

impl DocError {
    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        DocError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            DocError::InvalidRange { .. } => "InvalidRange",
            DocError::InvalidThreshold(_) => "InvalidThreshold",
            DocError::InvalidParameter { .. } => "InvalidParameter",
            DocError::InvalidRequest(_) => "InvalidRequest",
            DocError::RenderingFailure(_) => "RenderingFailure",
        }
    }

    /// Whether the caller supplied bad input (as opposed to a render problem).
    pub fn is_validation(&self) -> bool {
        !matches!(self, DocError::RenderingFailure(_))
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            DocError::InvalidRange { .. }
            | DocError::InvalidThreshold(_)
            | DocError::InvalidParameter { .. }
            | DocError::InvalidRequest(_) => 400,

            DocError::RenderingFailure(_) => 500,
        }
    }
}

impl From<serde_json::Error> for DocError {
    fn from(err: serde_json::Error) -> Self {
        DocError::InvalidRequest(err.to_string())
    }
}
