/// Convenience result type used across the slideshow engine.
pub type SlideResult<T> = Result<T, SlideError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every failure is local: a transition that returns `Err` was skipped (or stopped between
/// phases) and the caller may move on to the next one.
#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    /// Invalid caller-provided parameters or surface geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Bitmap header mismatch or truncated pixel payload.
    #[error("bitmap format error: {0}")]
    Format(String),

    /// A slide could not be opened or read.
    #[error("io error: {0}")]
    Io(String),

    /// The compositing engine refused a pass or never reported completion.
    #[error("engine error: {0}")]
    Engine(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideError {
    /// Build a [`SlideError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlideError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`SlideError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`SlideError::Engine`] value.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// True for failures raised while fetching or decoding a slide.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Format(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
