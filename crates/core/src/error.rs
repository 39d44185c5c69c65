//! Error types for deck building.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a document into a slide deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the source document.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The source format is not supported or could not be detected.
    #[error("Unsupported or unrecognized source format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is out of range or could not be loaded.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A bounded deck did not come out at its target length.
    ///
    /// This is an internal invariant failure; the deck must not be handed on.
    #[error("Unexpected slide count: {actual} (expected {expected})")]
    DeckLengthMismatch { expected: usize, actual: usize },
}
