//! Password-based AES-CBC vault.
//!
//! # Payload format
//! ```text
//! IV (16 bytes) || AES-CBC-PKCS7(key, IV, plaintext)
//! key = KDF(password, salt = IV)
//! ```
//! The IV doubles as the KDF salt, so a fresh key is derived for every
//! payload and no separate salt is stored.

use std::fmt;

use parking_lot::{Mutex, RwLock};
use tracing::debug;
use zeroize::Zeroizing;

use pwvault_common::{Error, Password, Result};
use pwvault_crypto::cipher::{self, AesKeySize, BLOCK_SIZE};
use pwvault_crypto::{Codec, Iv, Kdf, KdfSpec, KeyDerivation};

use crate::vault::{Vault, VaultType};
use crate::SecureRandom;

/// Vault encrypting with AES under a password-derived key.
///
/// The password lives behind a lock: `encrypt`/`decrypt` hold it shared for
/// the duration of the key derivation, `close` takes it exclusively and
/// erases it. A call that starts after `close` returned always sees the
/// vault destroyed.
pub struct AesVault {
    kdf: Kdf,
    spec: KdfSpec,
    key_size: AesKeySize,
    codec: Codec,
    random: Mutex<SecureRandom>,
    password: RwLock<Option<Password>>,
}

impl AesVault {
    /// Create a vault that owns `password`.
    ///
    /// # Errors
    /// - `InvalidInput` if the password is empty or the KDF's key length is
    ///   not an AES key length (16, 24 or 32)
    pub fn new(kdf: Kdf, password: Password, codec: Codec, random: SecureRandom) -> Result<Self> {
        if password.is_empty() {
            return Err(Error::InvalidInput("Password must not be empty".to_string()));
        }
        let spec = kdf.spec();
        let key_size = AesKeySize::from_key_length(spec.derived_key_length())?;

        debug!(
            function = %spec.function(),
            key_size = ?key_size,
            codec = %codec,
            "Opened AES vault"
        );

        Ok(Self {
            kdf,
            spec,
            key_size,
            codec,
            random: Mutex::new(random),
            password: RwLock::new(Some(password)),
        })
    }

    /// AES variant selected by the KDF's key length.
    pub fn key_size(&self) -> AesKeySize {
        self.key_size
    }

    fn next_iv(&self) -> Iv {
        let mut random = self.random.lock();
        Iv::generate(&mut **random)
    }
}

impl Vault for AesVault {
    fn vault_type(&self) -> VaultType {
        VaultType::Aes
    }

    fn spec(&self) -> Option<&KdfSpec> {
        Some(&self.spec)
    }

    fn codec(&self) -> Codec {
        self.codec
    }

    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        let password = self.password.read();
        let password = password.as_ref().ok_or(Error::VaultDestroyed)?;

        let iv = self.next_iv();
        let key = self.kdf.derive_key(password.as_bytes(), iv.as_bytes())?;
        let ciphertext = Zeroizing::new(cipher::encrypt(key.as_bytes(), iv.as_bytes(), data)?);

        let mut payload = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
        payload.extend_from_slice(iv.as_bytes());
        payload.extend_from_slice(&ciphertext);
        Ok(payload)
    }

    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        let password = self.password.read();
        let password = password.as_ref().ok_or(Error::VaultDestroyed)?;

        let iv = Iv::from_prefix(data).ok_or(Error::DecryptionFailed)?;
        let key = self.kdf.derive_key(password.as_bytes(), iv.as_bytes())?;
        cipher::decrypt(key.as_bytes(), iv.as_bytes(), &data[BLOCK_SIZE..])
    }

    fn close(&self) {
        let mut password = self.password.write();
        if let Some(mut password) = password.take() {
            password.close();
            debug!("Closed AES vault");
        }
    }

    fn is_destroyed(&self) -> bool {
        self.password.read().is_none()
    }
}

impl fmt::Debug for AesVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesVault")
            .field("spec", &self.spec)
            .field("key_size", &self.key_size)
            .field("codec", &self.codec)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}
