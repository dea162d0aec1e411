use std::path::PathBuf;

pub type OverlayResult<T> = Result<T, OverlayError>;

/// Fatal render failures.
///
/// Absorbed failures (missing markup, malformed markup, bad attributes) never show up here;
/// they are recorded in [`crate::Diagnostics`] instead.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    #[error(
        "background missing: neither '{}' nor fallback '{}' could be loaded: {reason}",
        requested.display(),
        fallback.display()
    )]
    BackgroundMissing {
        requested: PathBuf,
        fallback: PathBuf,
        reason: String,
    },

    #[error("composite error: {0}")]
    Composite(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    pub fn background_missing(
        requested: impl Into<PathBuf>,
        fallback: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::BackgroundMissing {
            requested: requested.into(),
            fallback: fallback.into(),
            reason: reason.into(),
        }
    }

    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
