//! Pass-through vault for deployments with encryption switched off.

use pwvault_common::Result;
use pwvault_crypto::{Codec, KdfSpec};

use crate::vault::{Vault, VaultType};

/// A vault that returns its input unchanged.
///
/// Holds no secret, so there is nothing to destroy: it is never destroyed
/// and can always encrypt and decrypt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpVault {
    codec: Codec,
}

impl NoOpVault {
    /// The no-op vault with the default (hex) codec.
    pub const INSTANCE: Self = Self { codec: Codec::Hex };

    /// A no-op vault rendering payloads with `codec`.
    pub const fn with_codec(codec: Codec) -> Self {
        Self { codec }
    }
}

impl Vault for NoOpVault {
    fn vault_type(&self) -> VaultType {
        VaultType::None
    }

    fn spec(&self) -> Option<&KdfSpec> {
        None
    }

    fn codec(&self) -> Codec {
        self.codec
    }

    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn close(&self) {}

    fn is_destroyed(&self) -> bool {
        false
    }
}
