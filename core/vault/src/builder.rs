//! Construct vaults from explicit settings or a [`VaultConfig`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use pwvault_common::{Error, Password, Result};
use pwvault_crypto::{Codec, Kdf, KdfProperties, KdfSpec, KdfSpecBuilder};

use crate::aes::AesVault;
use crate::config::VaultConfig;
use crate::noop::NoOpVault;
use crate::vault::{Vault, VaultType};
use crate::SecureRandom;

/// Builder for [`Vault`] instances.
///
/// The password is moved into the builder and from there into the vault;
/// if the build fails or yields a [`NoOpVault`], it is erased on drop.
pub struct VaultBuilder {
    vault_type: VaultType,
    kdf: Option<Kdf>,
    password: Option<Password>,
    codec: Codec,
    random: Option<SecureRandom>,
}

impl VaultBuilder {
    /// Start a builder for `vault_type` with the hex codec.
    pub fn new(vault_type: VaultType) -> Self {
        Self {
            vault_type,
            kdf: None,
            password: None,
            codec: Codec::default(),
            random: None,
        }
    }

    /// Start from a type name.
    ///
    /// # Errors
    /// - `UnsupportedType` if the name is neither "none" nor "aes"
    pub fn from_type_name(vault_type: &str) -> Result<Self> {
        Ok(Self::new(vault_type.parse()?))
    }

    /// Start from a configuration. The KDF block is only read for AES vaults.
    ///
    /// # Errors
    /// - `UnsupportedType` for an unknown vault type
    /// - `MissingParameter("kdf")` if an AES configuration has no KDF block
    /// - Any error from building the KDF spec
    pub fn from_config(config: &VaultConfig) -> Result<Self> {
        let builder = Self::new(config.parsed_type()?).with_codec(config.codec);
        match (builder.vault_type, &config.kdf) {
            (VaultType::None, _) => Ok(builder),
            (VaultType::Aes, Some(kdf)) => builder.with_kdf_properties(kdf),
            (VaultType::Aes, None) => Err(Error::MissingParameter("kdf")),
        }
    }

    /// Set the password. The builder takes ownership.
    pub fn with_password(mut self, password: impl Into<Password>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Use `random` for IV generation instead of an OS-seeded generator.
    pub fn with_random(mut self, random: impl rand::CryptoRng + Send + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    /// Use an already built KDF.
    pub fn with_kdf(mut self, kdf: Kdf) -> Self {
        self.kdf = Some(kdf);
        self
    }

    /// Use the KDF described by `spec`.
    ///
    /// # Errors
    /// - Returns error if the spec cannot run, see [`Kdf::new`]
    pub fn with_kdf_spec(self, spec: KdfSpec) -> Result<Self> {
        Ok(self.with_kdf(spec.kdf()?))
    }

    /// Use the KDF described by raw properties.
    ///
    /// # Errors
    /// - Any error from building the spec or its KDF
    pub fn with_kdf_properties(self, properties: &KdfProperties) -> Result<Self> {
        let spec = KdfSpecBuilder::from_properties(properties)?.build()?;
        self.with_kdf_spec(spec)
    }

    /// Set the codec for textual payloads.
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Set the codec by name ("hex" or "base64").
    pub fn with_codec_name(self, codec: &str) -> Result<Self> {
        Ok(self.with_codec(codec.parse()?))
    }

    /// Build the vault.
    ///
    /// # Errors
    /// - `MissingParameter` if an AES vault has no password or no KDF
    /// - `InvalidInput` if the password is empty or the KDF does not produce
    ///   an AES key length
    pub fn build(self) -> Result<Box<dyn Vault>> {
        match self.vault_type {
            VaultType::None => {
                debug!("Encryption disabled, using no-op vault");
                Ok(Box::new(NoOpVault::with_codec(self.codec)))
            }
            VaultType::Aes => {
                let password = self.password.ok_or(Error::MissingParameter("password"))?;
                let kdf = self.kdf.ok_or(Error::MissingParameter("kdf"))?;
                let random = self
                    .random
                    .unwrap_or_else(|| Box::new(StdRng::from_os_rng()));
                Ok(Box::new(AesVault::new(kdf, password, self.codec, random)?))
            }
        }
    }
}
