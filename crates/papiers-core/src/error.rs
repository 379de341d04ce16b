//! Error types for the papiers-core library.

use thiserror::Error;

/// Main error type for the papiers library.
#[derive(Error, Debug)]
pub enum PapiersError {
    /// Document extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Entity recognizer error.
    #[error("recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors surfaced by the extraction engine.
///
/// Missing fields are never errors: they keep their sentinel value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The text matched neither the identity card nor the résumé markers.
    /// Blank text ends up here too.
    #[error("document type not recognized")]
    UnrecognizedDocument,
}

/// Errors raised by an entity recognizer implementation.
#[derive(Error, Debug)]
pub enum RecognizerError {
    /// The recognizer backend could not be reached or started.
    #[error("recognizer unavailable: {0}")]
    Unavailable(String),

    /// The recognizer ran but failed.
    #[error("recognition failed: {0}")]
    Failed(String),

    /// The recognizer returned output that could not be decoded.
    #[error("malformed recognizer output: {0}")]
    MalformedOutput(String),

    /// The shared recognizer was already installed.
    #[error("shared recognizer already initialized")]
    AlreadyInitialized,
}

/// Result type for the papiers library.
pub type Result<T> = std::result::Result<T, PapiersError>;
