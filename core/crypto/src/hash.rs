//! One-way hash functions behind a small incremental interface.
//!
//! [`DigestAlgorithm`] names the supported functions; [`MessageDigest`] is a
//! stateful engine computing one of them. Engines are not meant to be shared
//! between concurrent operations: each caller creates its own.

use std::fmt;
use std::str::FromStr;

use digest::DynDigest;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use pwvault_common::{Error, Result};

/// Supported one-way hash functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// MD5, 16 bytes. Only useful for legacy payloads.
    Md5,
    /// SHA-1, 20 bytes.
    Sha1,
    /// SHA-256, 32 bytes.
    Sha256,
    /// SHA-384, 48 bytes.
    Sha384,
    /// SHA-512, 64 bytes.
    Sha512,
}

impl DigestAlgorithm {
    /// Every supported algorithm.
    pub const ALL: [Self; 5] = [Self::Md5, Self::Sha1, Self::Sha256, Self::Sha384, Self::Sha512];

    /// Output length in bytes.
    pub const fn hash_length(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Canonical upper-case name, as written to configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
        }
    }

    /// Create a fresh engine for this algorithm.
    pub fn engine(self) -> MessageDigest {
        MessageDigest::new(self)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    /// Case-insensitive; dashes are ignored so "SHA-256" is accepted.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == normalized)
            .ok_or_else(|| Error::invalid_value("hashFunction", s))
    }
}

impl Serialize for DigestAlgorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DigestAlgorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Incremental hashing capability.
///
/// `finish_into` writes exactly [`hash_length`](DigestEngine::hash_length)
/// bytes and leaves the engine reset for the next message.
pub trait DigestEngine {
    /// The algorithm this engine computes.
    fn algorithm(&self) -> DigestAlgorithm;

    /// Output length in bytes.
    fn hash_length(&self) -> usize {
        self.algorithm().hash_length()
    }

    /// Discard any buffered input.
    fn reset(&mut self) -> &mut Self;

    /// Feed more input.
    fn update(&mut self, input: &[u8]) -> &mut Self;

    /// Write the digest at `offset` in `out` and reset.
    ///
    /// # Errors
    /// - `BufferTooShort` if fewer than `hash_length` bytes remain after
    ///   `offset`; the engine state is left untouched in that case.
    fn finish_into(&mut self, out: &mut [u8], offset: usize) -> Result<()>;

    /// Finish into a newly allocated vector.
    fn finish(&mut self) -> Vec<u8> {
        let mut out = vec![0u8; self.hash_length()];
        self.finish_into(&mut out, 0)
            .expect("buffer sized to hash length");
        out
    }
}

/// [`DigestEngine`] backed by the RustCrypto hash implementations.
pub struct MessageDigest {
    algorithm: DigestAlgorithm,
    inner: Box<dyn DynDigest + Send + Sync>,
}

impl MessageDigest {
    /// Create a fresh engine.
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        let inner: Box<dyn DynDigest + Send + Sync> = match algorithm {
            DigestAlgorithm::Md5 => Box::new(md5::Md5::default()),
            DigestAlgorithm::Sha1 => Box::new(sha1::Sha1::default()),
            DigestAlgorithm::Sha256 => Box::new(sha2::Sha256::default()),
            DigestAlgorithm::Sha384 => Box::new(sha2::Sha384::default()),
            DigestAlgorithm::Sha512 => Box::new(sha2::Sha512::default()),
        };
        Self { algorithm, inner }
    }
}

impl DigestEngine for MessageDigest {
    fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    fn reset(&mut self) -> &mut Self {
        self.inner.reset();
        self
    }

    fn update(&mut self, input: &[u8]) -> &mut Self {
        self.inner.update(input);
        self
    }

    fn finish_into(&mut self, out: &mut [u8], offset: usize) -> Result<()> {
        let length = self.hash_length();
        let available = out.len().saturating_sub(offset);
        if available < length {
            return Err(Error::BufferTooShort {
                required: length,
                available,
            });
        }
        self.inner
            .finalize_into_reset(&mut out[offset..offset + length])
            .map_err(|_| Error::BufferTooShort {
                required: length,
                available,
            })
    }
}

impl fmt::Debug for MessageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDigest")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
