//! PBKDF2 (RFC 2898) over HMAC with a configurable digest.

use md5::Md5;
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use super::{IteratedDigestSpec, KdfSpec, KeyDerivation};
use crate::hash::DigestAlgorithm;
use pwvault_common::Result;

/// The iterated-digest KDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2Kdf {
    spec: IteratedDigestSpec,
}

impl Pbkdf2Kdf {
    /// Create from a spec.
    pub fn new(spec: IteratedDigestSpec) -> Self {
        Self { spec }
    }
}

impl KeyDerivation for Pbkdf2Kdf {
    fn spec(&self) -> KdfSpec {
        KdfSpec::IteratedDigest(self.spec)
    }

    fn fill_key(&self, password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()> {
        let rounds = self.spec.iterations();
        match self.spec.digest() {
            DigestAlgorithm::Md5 => pbkdf2_hmac::<Md5>(password, salt, rounds, out),
            DigestAlgorithm::Sha1 => pbkdf2_hmac::<Sha1>(password, salt, rounds, out),
            DigestAlgorithm::Sha256 => pbkdf2_hmac::<Sha256>(password, salt, rounds, out),
            DigestAlgorithm::Sha384 => pbkdf2_hmac::<Sha384>(password, salt, rounds, out),
            DigestAlgorithm::Sha512 => pbkdf2_hmac::<Sha512>(password, salt, rounds, out),
        }
        Ok(())
    }
}
