//! Key material with secure memory handling.
//!
//! Both types zeroize their memory on drop, so a key or IV that goes out of
//! scope on any path (success, `?` early return, panic unwind) is erased.

use rand::RngCore;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::cipher::BLOCK_SIZE;

/// Key produced by a KDF.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: Vec<u8>,
}

impl DerivedKey {
    /// Allocate a zero-filled key of `length` bytes, to be filled by a KDF.
    pub(crate) fn zeroed(length: usize) -> Self {
        Self {
            key: vec![0u8; length],
        }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.key
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.key.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey([REDACTED; {} bytes])", self.key.len())
    }
}

/// CBC initialization vector, also used as the KDF salt.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Iv([u8; BLOCK_SIZE]);

impl Iv {
    /// Generate a random IV from `rng`.
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut iv = [0u8; BLOCK_SIZE];
        rng.fill_bytes(&mut iv);
        Self(iv)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; BLOCK_SIZE]) -> Self {
        Self(bytes)
    }

    /// Copy the leading block of `data`, if there is one.
    pub fn from_prefix(data: &[u8]) -> Option<Self> {
        let mut iv = [0u8; BLOCK_SIZE];
        iv.copy_from_slice(data.get(..BLOCK_SIZE)?);
        Some(Self(iv))
    }

    /// Get the IV bytes.
    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        &self.0
    }
}

impl fmt::Debug for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iv({})", hex::encode(self.0))
    }
}
