//! Password-based key derivation.
//!
//! Three interchangeable functions turn a password and a salt into a key of
//! fixed length:
//!
//! - [`LegacyKdf`]: OpenSSL's `EVP_BytesToKey` with one round. Weak, kept for
//!   reading old payloads only.
//! - [`Pbkdf2Kdf`]: PBKDF2-HMAC (RFC 2898) with a configurable digest.
//! - [`ScryptKdf`]: scrypt (RFC 7914), memory-hard.
//!
//! Which function runs, and with which parameters, is described by a
//! [`KdfSpec`]; [`Kdf`] is the runnable counterpart of a spec.
//!
//! # Example
//!
//! ```
//! use pwvault_crypto::kdf::{KdfFunction, KdfSpecBuilder, KeyDerivation};
//!
//! let spec = KdfSpecBuilder::new(KdfFunction::IteratedDigest)
//!     .with_iterations(1000)
//!     .build()
//!     .unwrap();
//! let kdf = spec.kdf().unwrap();
//!
//! let key = kdf.derive_key(b"my_password", b"some salt").unwrap();
//! assert_eq!(key.len(), 20);
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::hash::DigestAlgorithm;
use crate::keys::DerivedKey;
use pwvault_common::{Error, Result};

mod builder;
mod iterated;
mod legacy;
mod memory_hard;
mod properties;
mod spec;

pub use builder::KdfSpecBuilder;
pub use iterated::Pbkdf2Kdf;
pub use legacy::LegacyKdf;
pub use memory_hard::ScryptKdf;
pub use properties::KdfProperties;
pub use spec::{IteratedDigestSpec, KdfSpec, LegacySpec, MemoryHardSpec};

/// The key derivation functions this crate implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KdfFunction {
    /// Single-round iterated hashing (`EVP_BytesToKey`).
    Legacy,
    /// PBKDF2.
    IteratedDigest,
    /// scrypt.
    MemoryHard,
}

impl KdfFunction {
    /// Canonical configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::IteratedDigest => "iterated-digest",
            Self::MemoryHard => "memory-hard",
        }
    }

    /// Digest used when none is configured.
    pub const fn default_digest(self) -> DigestAlgorithm {
        match self {
            Self::Legacy => DigestAlgorithm::Md5,
            Self::IteratedDigest => DigestAlgorithm::Sha1,
            Self::MemoryHard => DigestAlgorithm::Sha256,
        }
    }

    /// Derived key length used when none is configured.
    pub const fn default_derived_key_length(self) -> usize {
        match self {
            Self::Legacy => 16,
            Self::IteratedDigest => 20,
            Self::MemoryHard => 32,
        }
    }
}

impl fmt::Display for KdfFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KdfFunction {
    type Err = Error;

    /// Case-insensitive. Accepts the canonical names as well as the names of
    /// the underlying algorithms (`openssl`, `pbkdf2`, `scrypt`).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "legacy" | "openssl" => Ok(Self::Legacy),
            "iterated-digest" | "pbkdf2" => Ok(Self::IteratedDigest),
            "memory-hard" | "scrypt" => Ok(Self::MemoryHard),
            _ => Err(Error::invalid_value("function", s)),
        }
    }
}

/// A password-based key derivation function bound to its parameters.
///
/// Implementations hold no mutable state: every derivation uses its own
/// digest engine, so a single instance can serve concurrent callers.
pub trait KeyDerivation {
    /// The spec this instance was built from.
    fn spec(&self) -> KdfSpec;

    /// Number of bytes every derivation produces.
    fn derived_key_length(&self) -> usize {
        self.spec().derived_key_length()
    }

    /// Fill the whole of `out` with key material.
    ///
    /// Callers normally go through [`derive_key`](KeyDerivation::derive_key)
    /// or [`derive_key_at`](KeyDerivation::derive_key_at), which size `out`
    /// to the derived key length.
    fn fill_key(&self, password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()>;

    /// Derive a new key from `password` and `salt`.
    ///
    /// Empty passwords and salts are accepted.
    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
        let mut key = DerivedKey::zeroed(self.derived_key_length());
        self.fill_key(password, salt, key.as_mut_bytes())?;
        Ok(key)
    }

    /// Derive a key directly into `buffer` starting at `offset`.
    ///
    /// # Postconditions
    /// - Exactly `derived_key_length` bytes are written at `offset`
    /// - Bytes outside that range are left untouched
    ///
    /// # Errors
    /// - `BufferTooShort` if fewer than `derived_key_length` bytes remain
    ///   after `offset`; nothing is written in that case
    fn derive_key_at(
        &self,
        password: &[u8],
        salt: &[u8],
        buffer: &mut [u8],
        offset: usize,
    ) -> Result<()> {
        let length = self.derived_key_length();
        let available = buffer.len().saturating_sub(offset);
        if available < length {
            return Err(Error::BufferTooShort {
                required: length,
                available,
            });
        }
        self.fill_key(password, salt, &mut buffer[offset..offset + length])
    }
}

/// Runnable KDF for any [`KdfSpec`].
#[derive(Debug, Clone)]
pub enum Kdf {
    /// See [`LegacyKdf`].
    Legacy(LegacyKdf),
    /// See [`Pbkdf2Kdf`].
    IteratedDigest(Pbkdf2Kdf),
    /// See [`ScryptKdf`].
    MemoryHard(ScryptKdf),
}

impl Kdf {
    /// Build the KDF described by `spec`.
    ///
    /// # Errors
    /// - Returns error if the parameters are valid as a spec but cannot run,
    ///   e.g. a scrypt cost that is not a power of two
    pub fn new(spec: KdfSpec) -> Result<Self> {
        Ok(match spec {
            KdfSpec::Legacy(spec) => Self::Legacy(LegacyKdf::new(spec)),
            KdfSpec::IteratedDigest(spec) => Self::IteratedDigest(Pbkdf2Kdf::new(spec)),
            KdfSpec::MemoryHard(spec) => Self::MemoryHard(ScryptKdf::new(spec)?),
        })
    }
}

impl KeyDerivation for Kdf {
    fn spec(&self) -> KdfSpec {
        match self {
            Self::Legacy(kdf) => kdf.spec(),
            Self::IteratedDigest(kdf) => kdf.spec(),
            Self::MemoryHard(kdf) => kdf.spec(),
        }
    }

    fn fill_key(&self, password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()> {
        trace!(
            function = %self.spec().function(),
            salt_len = salt.len(),
            key_len = out.len(),
            "Deriving key"
        );
        match self {
            Self::Legacy(kdf) => kdf.fill_key(password, salt, out),
            Self::IteratedDigest(kdf) => kdf.fill_key(password, salt, out),
            Self::MemoryHard(kdf) => kdf.fill_key(password, salt, out),
        }
    }
}
