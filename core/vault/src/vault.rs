//! The capability shared by every vault variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use pwvault_common::{Error, Result};
use pwvault_crypto::{Codec, KdfSpec};

/// Vault variant selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VaultType {
    /// Pass-through, no encryption.
    None,
    /// Password-based AES-CBC.
    #[default]
    Aes,
}

impl VaultType {
    /// Configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Aes => "aes",
        }
    }
}

impl fmt::Display for VaultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VaultType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "aes" => Ok(Self::Aes),
            _ => Err(Error::UnsupportedType(s.to_string())),
        }
    }
}

impl Serialize for VaultType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for VaultType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Password-based encryption over opaque byte buffers.
///
/// A vault is either active or destroyed. [`close`](Vault::close) moves it
/// to destroyed exactly once; afterwards `encrypt` and `decrypt` fail with
/// [`Error::VaultDestroyed`]. All methods take `&self` and are safe to call
/// from several threads.
pub trait Vault: Send + Sync + fmt::Debug {
    /// Which variant this is.
    fn vault_type(&self) -> VaultType;

    /// The KDF spec keys are derived with, if the vault derives keys at all.
    fn spec(&self) -> Option<&KdfSpec>;

    /// Codec used by the `_encoded` operations.
    fn codec(&self) -> Codec;

    /// Encrypt `data`.
    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt the output of [`encrypt`](Vault::encrypt).
    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Erase the password. Idempotent.
    fn close(&self);

    /// Whether `close` has run.
    fn is_destroyed(&self) -> bool;

    /// Whether `encrypt` can succeed; the inverse of `is_destroyed`.
    fn can_encrypt(&self) -> bool {
        !self.is_destroyed()
    }

    /// Whether `decrypt` can succeed; the inverse of `is_destroyed`.
    fn can_decrypt(&self) -> bool {
        !self.is_destroyed()
    }

    /// Encrypt `data` and render the payload with the vault's codec.
    fn encrypt_encoded(&self, data: &[u8]) -> Result<String> {
        let payload = self.encrypt(data)?;
        Ok(self.codec().encode(&payload))
    }

    /// Decode `text` with the vault's codec and decrypt it.
    fn decrypt_encoded(&self, text: &str) -> Result<Vec<u8>> {
        let payload = self.codec().decode(text)?;
        self.decrypt(&payload)
    }
}
