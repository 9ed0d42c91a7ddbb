//! Error types for the steelq-core library.
//!
//! Field extraction never fails: absent fields are empty strings. These
//! errors cover the boundaries around it (reading OCR output, configuration).

use thiserror::Error;

/// Main error type for the steelq library.
#[derive(Error, Debug)]
pub enum SteelqError {
    /// Recognition output could not be turned into input items.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to OCR item input.
#[derive(Error, Debug)]
pub enum InputError {
    /// The document holds no JSON value at all.
    #[error("input document is empty")]
    Empty,

    /// An entry has the wrong shape.
    #[error("malformed item at index {index}: {reason}")]
    MalformedItem { index: usize, reason: String },

    /// The top-level JSON value is neither an item list nor a page list.
    #[error("unsupported input layout: {0}")]
    Unsupported(String),
}

/// Result type for the steelq library.
pub type Result<T> = std::result::Result<T, SteelqError>;
