//! AES in CBC mode with PKCS#7 padding.
//!
//! This is confidentiality only: no authentication tag is computed, so a
//! modified ciphertext either fails to unpad or decrypts to garbage.

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use pwvault_common::{Error, Result};

/// AES block size, and therefore IV size (16 bytes).
pub const BLOCK_SIZE: usize = 16;

/// AES variant, selected by key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesKeySize {
    /// 16-byte key.
    Aes128,
    /// 24-byte key.
    Aes192,
    /// 32-byte key.
    Aes256,
}

impl AesKeySize {
    /// Select the variant for a key of `length` bytes.
    ///
    /// # Errors
    /// - Returns error unless `length` is 16, 24 or 32
    pub fn from_key_length(length: usize) -> Result<Self> {
        match length {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            _ => Err(Error::InvalidInput(format!(
                "Invalid AES key length: expected 16, 24 or 32, got {}",
                length
            ))),
        }
    }

    /// Key length in bytes.
    pub const fn key_length(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }
}

/// Encrypt `plaintext` under `key` and `iv`.
///
/// # Postconditions
/// - Returns ciphertext only (the IV is not prepended)
/// - Output length is the next multiple of BLOCK_SIZE above the input length
///
/// # Errors
/// - Returns error if the key is not a valid AES key or the IV is not one block
pub fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    match AesKeySize::from_key_length(key.len())? {
        AesKeySize::Aes128 => encrypt_with::<cbc::Encryptor<aes::Aes128>>(key, iv, plaintext),
        AesKeySize::Aes192 => encrypt_with::<cbc::Encryptor<aes::Aes192>>(key, iv, plaintext),
        AesKeySize::Aes256 => encrypt_with::<cbc::Encryptor<aes::Aes256>>(key, iv, plaintext),
    }
}

/// Decrypt `ciphertext` under `key` and `iv`.
///
/// # Errors
/// - Returns error if the key is not a valid AES key or the IV is not one block
/// - Returns `DecryptionFailed` if the ciphertext is not a whole number of
///   blocks or its padding is malformed
pub fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    match AesKeySize::from_key_length(key.len())? {
        AesKeySize::Aes128 => decrypt_with::<cbc::Decryptor<aes::Aes128>>(key, iv, ciphertext),
        AesKeySize::Aes192 => decrypt_with::<cbc::Decryptor<aes::Aes192>>(key, iv, ciphertext),
        AesKeySize::Aes256 => decrypt_with::<cbc::Decryptor<aes::Aes256>>(key, iv, ciphertext),
    }
}

fn encrypt_with<E>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>
where
    E: KeyIvInit + BlockEncryptMut,
{
    let encryptor = E::new_from_slices(key, iv)
        .map_err(|_| Error::InvalidInput(format!("Invalid IV length: {}", iv.len())))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn decrypt_with<D>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>
where
    D: KeyIvInit + BlockDecryptMut,
{
    let decryptor = D::new_from_slices(key, iv)
        .map_err(|_| Error::InvalidInput(format!("Invalid IV length: {}", iv.len())))?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(Error::DecryptionFailed);
    }
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| Error::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IV: [u8; BLOCK_SIZE] = [7u8; BLOCK_SIZE];

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        for key_length in [16, 24, 32] {
            let key = vec![42u8; key_length];
            let plaintext = b"Hello, World!";

            let ciphertext = encrypt(&key, &IV, plaintext).unwrap();
            let decrypted = decrypt(&key, &IV, &ciphertext).unwrap();

            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn test_ciphertext_size() {
        let key = [42u8; 16];

        // Padding always adds at least one byte
        assert_eq!(encrypt(&key, &IV, b"").unwrap().len(), BLOCK_SIZE);
        assert_eq!(encrypt(&key, &IV, &[1u8; 15]).unwrap().len(), BLOCK_SIZE);
        assert_eq!(encrypt(&key, &IV, &[1u8; 16]).unwrap().len(), 2 * BLOCK_SIZE);
    }

    #[test]
    fn test_matches_openssl() {
        // printf "attack at dawn" | openssl enc -aes-128-cbc -K <key> -iv <iv>
        let key = hex::decode("a219099de44d660057798dd780e96473").unwrap();
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let ciphertext = hex::decode("6ceb46ac1b11731c89fd249ab65a9cc1").unwrap();

        assert_eq!(decrypt(&key, &iv, &ciphertext).unwrap(), b"attack at dawn");
        assert_eq!(encrypt(&key, &iv, b"attack at dawn").unwrap(), ciphertext);
    }

    #[test]
    fn test_invalid_key_length() {
        let key = [0u8; 20];
        assert!(matches!(
            encrypt(&key, &IV, b"data"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let key = [42u8; 32];
        let ciphertext = encrypt(&key, &IV, b"Important data").unwrap();

        assert!(matches!(
            decrypt(&key, &IV, &ciphertext[..ciphertext.len() - 1]),
            Err(Error::DecryptionFailed)
        ));
        assert!(matches!(decrypt(&key, &IV, &[]), Err(Error::DecryptionFailed)));
    }
}
