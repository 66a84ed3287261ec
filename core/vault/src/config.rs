//! Vault configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use pwvault_common::{Error, Result};
use pwvault_crypto::{Codec, KdfProperties};

use crate::vault::VaultType;

/// Vault configuration as read from JSON.
///
/// ```json
/// {
///   "type": "aes",
///   "codec": "base64",
///   "kdf": { "function": "pbkdf2", "hashFunction": "SHA256", "iterations": 10000, "derivedKeyLength": 32 }
/// }
/// ```
///
/// The vault type is kept as text so that an unknown type is reported as
/// unsupported when the vault is built rather than as a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault type name ("none" or "aes").
    #[serde(rename = "type", default = "default_type")]
    pub vault_type: String,
    /// Codec for textual payloads.
    #[serde(default)]
    pub codec: Codec,
    /// KDF properties; required for AES vaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf: Option<KdfProperties>,
}

fn default_type() -> String {
    VaultType::default().name().to_string()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            vault_type: default_type(),
            codec: Codec::default(),
            kdf: None,
        }
    }
}

impl VaultConfig {
    /// Configuration for an AES vault using `kdf`.
    pub fn aes(kdf: KdfProperties) -> Self {
        Self {
            kdf: Some(kdf),
            ..Self::default()
        }
    }

    /// Configuration with encryption switched off.
    pub fn none() -> Self {
        Self {
            vault_type: VaultType::None.name().to_string(),
            ..Self::default()
        }
    }

    /// Parse the vault type.
    ///
    /// # Errors
    /// - `UnsupportedType` if the type is neither "none" nor "aes"
    pub fn parsed_type(&self) -> Result<VaultType> {
        self.vault_type.parse()
    }

    /// Serialize configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = VaultConfig::from_json("{}").unwrap();
        assert_eq!(config.parsed_type().unwrap(), VaultType::Aes);
        assert_eq!(config.codec, Codec::Hex);
        assert!(config.kdf.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = VaultConfig::from_json(
            r#"{"type":"AES","codec":"base64","kdf":{"function":"scrypt","iterations":"16384"}}"#,
        )
        .unwrap();
        assert_eq!(config.parsed_type().unwrap(), VaultType::Aes);
        assert_eq!(config.codec, Codec::Base64);

        let kdf = config.kdf.unwrap();
        assert_eq!(kdf.function.as_deref(), Some("scrypt"));
        assert_eq!(kdf.iterations, Some(16384));
    }

    #[test]
    fn test_unknown_type_deferred() {
        let config = VaultConfig::from_json(r#"{"type":"rot13"}"#).unwrap();
        assert!(matches!(config.parsed_type(), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_unknown_codec_rejected() {
        let err = VaultConfig::from_json(r#"{"codec":"base32"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_config_serialization() {
        let config = VaultConfig::aes(KdfProperties::with_function("legacy"));
        let json = config.to_json().unwrap();
        let restored = VaultConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);

        let json = VaultConfig::none().to_json().unwrap();
        assert!(!json.contains("kdf"));
    }

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"type":"none","codec":"base64"}"#).unwrap();

        let config = VaultConfig::load(file.path()).unwrap();
        assert_eq!(config.parsed_type().unwrap(), VaultType::None);
        assert_eq!(config.codec, Codec::Base64);

        let missing = VaultConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
