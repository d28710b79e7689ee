//! Error types for font conversion and injection.

use std::io;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, FontError>;

/// Errors surfaced by a conversion pass or the standalone converter.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Font file is missing from the configured directory
    #[error("Font file not found: {path}")]
    NotFound { path: String },

    /// Binary or text read failed
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Cache or settings write failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Directory listing failed
    #[error("Failed to list {path}: {source}")]
    List {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Persisted settings could not be parsed or serialized
    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// Converter received no file with a supported extension
    #[error("Please select valid font files (.woff, .ttf, .woff2, .otf)")]
    NoValidFonts,

    /// Custom converter template requested without a selector
    #[error("Please enter a custom CSS class name")]
    MissingSelector,
}

impl FontError {
    /// Map a storage read error, keeping `NotFound` distinct
    pub(crate) fn read(path: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            FontError::NotFound { path: path.to_string() }
        } else {
            FontError::Read { path: path.to_string(), source }
        }
    }

    pub(crate) fn write(path: &str, source: io::Error) -> Self {
        FontError::Write { path: path.to_string(), source }
    }

    pub(crate) fn list(path: &str, source: io::Error) -> Self {
        FontError::List { path: path.to_string(), source }
    }
}
