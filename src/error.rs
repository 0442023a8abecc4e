//! Error types for the slang lexicon.

use thiserror::Error;

/// Errors raised at the construction and persistence boundaries.
///
/// Lookups and mutations on the in-memory store report expected conditions
/// (missing key, existing key, bad index) through return values instead.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// A term key was empty after trimming.
    #[error("term key must not be empty")]
    EmptyKey,

    /// A key cannot be written to the line format.
    #[error("invalid term key {0:?}: keys may not contain '`' or line breaks")]
    InvalidKey(String),

    /// A definition cannot be written to the line format.
    #[error("invalid definition {0:?}: definitions may not contain '|' or line breaks")]
    InvalidDefinition(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Index (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for lexicon operations.
pub type Result<T> = std::result::Result<T, DictionaryError>;
