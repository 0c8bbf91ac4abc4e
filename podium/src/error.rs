use thiserror::Error;

/// Configuration problems that make a window impossible to build.
///
/// These are fatal: a controller that hits one is never constructed.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("row template is not configured")]
    MissingRowTemplate,

    #[error("row step must be a positive finite number (got {0})")]
    InvalidRowStep(f32),

    #[error("a window needs at least one visible row")]
    NoVisibleRows,
}

/// Failures reading a roster document.
#[cfg(feature = "json")]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
