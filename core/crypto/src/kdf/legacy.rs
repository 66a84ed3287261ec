//! OpenSSL `EVP_BytesToKey` key derivation, one round.
//!
//! `D_1 = H(password || salt)`, `D_i = H(D_(i-1) || password || salt)`, and
//! the key is the leading bytes of `D_1 || D_2 || ...`. There is no work
//! factor; use this only to read data produced by legacy tooling.

use zeroize::Zeroizing;

use super::{KdfSpec, KeyDerivation, LegacySpec};
use crate::hash::{DigestAlgorithm, DigestEngine};
use pwvault_common::Result;

/// The legacy KDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyKdf {
    spec: LegacySpec,
}

impl LegacyKdf {
    /// Create from a spec.
    pub fn new(spec: LegacySpec) -> Self {
        Self { spec }
    }

    /// MD5 variant producing `derived_key_length` bytes, as `openssl enc`
    /// does by default.
    pub fn md5(derived_key_length: usize) -> Result<Self> {
        Ok(Self::new(LegacySpec::new(DigestAlgorithm::Md5, derived_key_length)?))
    }
}

impl KeyDerivation for LegacyKdf {
    fn spec(&self) -> KdfSpec {
        KdfSpec::Legacy(self.spec)
    }

    fn fill_key(&self, password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()> {
        let mut engine = self.spec.digest().engine();
        let mut block = Zeroizing::new(vec![0u8; engine.hash_length()]);

        let mut written = 0;
        while written < out.len() {
            if written > 0 {
                engine.update(&block);
            }
            engine
                .update(password)
                .update(salt)
                .finish_into(block.as_mut_slice(), 0)?;

            let take = block.len().min(out.len() - written);
            out[written..written + take].copy_from_slice(&block[..take]);
            written += take;
        }
        Ok(())
    }
}
