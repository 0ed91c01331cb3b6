//! Error types for the levels crate

use vvlevel_core::CoreError;

/// Level-specific error types
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// File I/O error
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),

    /// Markup parse error
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Level not found
    #[error("Level not found: {0}")]
    NotFound(String),

    /// Asset bundle could not be mounted
    #[error("Could not mount assets for {0}")]
    MountFailed(String),

    /// Level could not be written
    #[error("Could not save level: {0}")]
    SaveFailed(String),
}

impl From<LevelError> for CoreError {
    fn from(err: LevelError) -> Self {
        match err {
            LevelError::FileError(e) => CoreError::Io(e),
            LevelError::NotFound(path) => CoreError::NotFound(path),
            other => CoreError::InvalidData(other.to_string()),
        }
    }
}

/// Result type for level operations
pub type Result<T> = std::result::Result<T, LevelError>;
