//! Error types for the stream engine.

use thiserror::Error;

/// Main error type for dispatch and subscription.
///
/// Operators never catch these: an error raised anywhere in a dispatch pass
/// aborts the rest of that pass and surfaces at the call that introduced the
/// value (`Subject::next`, `Stream::subscribe`, `ManualClock::tick`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    #[error("Cannot resolve segment `{segment}` of path `{path}`: parent is {found}")]
    PathResolution {
        path: String,
        segment: String,
        found: &'static str,
    },

    #[error("Equality predicate failed: {0}")]
    Predicate(String),

    #[error("Observer failed: {0}")]
    Observer(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for StreamError {
    fn from(e: serde_json::Error) -> Self {
        StreamError::Config(e.to_string())
    }
}

/// Result type for stream operations.
pub type Result<T> = std::result::Result<T, StreamError>;
