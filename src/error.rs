//! Error types for loading a track

use thiserror::Error;

/// The only failure a playback session can report.
///
/// Everything past `load` degrades to a no-op instead of failing.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The resolver has no asset under this name
    #[error("audio asset '{name}' not found")]
    NotFound { name: String },

    /// The asset exists but no decoder accepts it
    #[error("audio asset '{name}' could not be decoded: {reason}")]
    Undecodable { name: String, reason: String },

    /// The output device refused the track
    #[error("audio output unavailable: {0}")]
    Output(String),
}

impl LoadError {
    pub(crate) fn undecodable(name: &str, reason: impl ToString) -> Self {
        LoadError::Undecodable {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for loading
pub type Result<T> = std::result::Result<T, LoadError>;
