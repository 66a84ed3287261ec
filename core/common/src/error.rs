//! Common error types for pwvault.

use thiserror::Error;

/// Top-level error type for pwvault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A named property carried a value that is not recognized.
    #[error("Invalid value \"{value}\" for {key}")]
    InvalidValue {
        /// The property being parsed (e.g. "function").
        key: &'static str,
        /// The offending token, as supplied.
        value: String,
    },

    /// A required parameter was not supplied.
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An output buffer has less room than the operation writes.
    #[error("Buffer too short: {required} bytes required, {available} available")]
    BufferTooShort {
        /// Bytes the operation needs to write.
        required: usize,
        /// Bytes available from the requested offset.
        available: usize,
    },

    /// Decryption failed.
    ///
    /// Deliberately carries no detail about which check rejected the input.
    #[error("Decryption failed")]
    DecryptionFailed,

    /// The vault was closed and its password erased.
    #[error("Vault destroyed")]
    VaultDestroyed,

    /// The vault type is not supported.
    #[error("Unsupported vault type: {0}")]
    UnsupportedType(String),

    /// Textual encoding or decoding failed.
    #[error("Codec error: {0}")]
    Codec(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidValue`].
    pub fn invalid_value(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
        }
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
