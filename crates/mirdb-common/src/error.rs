//! Error types for mirdb-common.

use thiserror::Error;

/// Common error type for mirdb stream operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer bytes remain than a fixed-width field needs.
    #[error("stream truncated: needed {needed} bytes but only {available} available")]
    StreamTruncated { needed: usize, available: usize },

    /// A variable-length integer ran past five bytes.
    #[error("variable-length integer exceeds 32 bits")]
    VarLengthOverflow,

    /// A string contains a character outside the single-byte Latin-1 range.
    #[error("character {0:?} cannot be encoded as Latin-1")]
    NotLatin1(char),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
