//! Common types used throughout pwvault.

use std::fmt;
use zeroize::Zeroize;

/// Password bytes that are erased from memory when dropped.
///
/// A `Password` has a single owner. Handing one to a vault moves it, so the
/// caller keeps no copy once the vault is built.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Password(Vec<u8>);

impl Password {
    /// Take ownership of raw password bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get a reference to the password bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Erase the password now instead of waiting for drop.
    ///
    /// After closing, the password is empty. Closing twice is harmless.
    pub fn close(&mut self) {
        self.0.zeroize();
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Password {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password([REDACTED; {} bytes])", self.0.len())
    }
}
