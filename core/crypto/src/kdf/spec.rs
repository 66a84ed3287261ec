//! Immutable descriptions of a KDF and its parameters.
//!
//! Two specs are equal exactly when their function and every parameter,
//! including the digest, are equal; `Hash` agrees with that equality.

use serde::{Deserialize, Serialize};

use super::{Kdf, KdfFunction, KdfProperties};
use crate::hash::DigestAlgorithm;
use pwvault_common::{Error, Result};

/// Key lengths are carried as `u32` in the property form, so larger ones
/// could not be written back.
fn positive_length(derived_key_length: usize) -> Result<usize> {
    if derived_key_length == 0 {
        return Err(Error::InvalidInput(
            "Derived key length must be greater than zero".to_string(),
        ));
    }
    if u32::try_from(derived_key_length).is_err() {
        return Err(Error::InvalidInput(format!(
            "Derived key length {} exceeds {}",
            derived_key_length,
            u32::MAX
        )));
    }
    Ok(derived_key_length)
}

fn positive(name: &str, value: u32) -> Result<u32> {
    if value == 0 {
        return Err(Error::InvalidInput(format!(
            "{} must be greater than zero",
            name
        )));
    }
    Ok(value)
}

/// Parameters of the legacy KDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegacySpec {
    digest: DigestAlgorithm,
    derived_key_length: usize,
}

impl LegacySpec {
    /// Validate and build.
    ///
    /// # Errors
    /// - Returns error if `derived_key_length` is zero or above `u32::MAX`
    pub fn new(digest: DigestAlgorithm, derived_key_length: usize) -> Result<Self> {
        Ok(Self {
            digest,
            derived_key_length: positive_length(derived_key_length)?,
        })
    }

    /// Digest the KDF hashes with.
    pub fn digest(&self) -> DigestAlgorithm {
        self.digest
    }

    /// Bytes produced per derivation.
    pub fn derived_key_length(&self) -> usize {
        self.derived_key_length
    }
}

/// Parameters of PBKDF2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IteratedDigestSpec {
    digest: DigestAlgorithm,
    derived_key_length: usize,
    iterations: u32,
}

impl IteratedDigestSpec {
    /// Validate and build.
    ///
    /// # Errors
    /// - Returns error if `derived_key_length` or `iterations` is zero, or
    ///   the length is above `u32::MAX`
    pub fn new(digest: DigestAlgorithm, derived_key_length: usize, iterations: u32) -> Result<Self> {
        Ok(Self {
            digest,
            derived_key_length: positive_length(derived_key_length)?,
            iterations: positive("Iterations", iterations)?,
        })
    }

    /// Digest the KDF hashes with.
    pub fn digest(&self) -> DigestAlgorithm {
        self.digest
    }

    /// Bytes produced per derivation.
    pub fn derived_key_length(&self) -> usize {
        self.derived_key_length
    }

    /// Work factor: PBKDF2 rounds, or scrypt cost N.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

/// Parameters of scrypt. `iterations` is scrypt's CPU/memory cost N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryHardSpec {
    digest: DigestAlgorithm,
    derived_key_length: usize,
    iterations: u32,
    block_size: u32,
    parallelization: u32,
}

impl MemoryHardSpec {
    /// Validate and build.
    ///
    /// # Errors
    /// - Returns error if any length or count is zero, or the length is
    ///   above `u32::MAX`
    pub fn new(
        digest: DigestAlgorithm,
        derived_key_length: usize,
        iterations: u32,
        block_size: u32,
        parallelization: u32,
    ) -> Result<Self> {
        Ok(Self {
            digest,
            derived_key_length: positive_length(derived_key_length)?,
            iterations: positive("Iterations", iterations)?,
            block_size: positive("Block size", block_size)?,
            parallelization: positive("Parallelization", parallelization)?,
        })
    }

    /// Digest the KDF hashes with.
    pub fn digest(&self) -> DigestAlgorithm {
        self.digest
    }

    /// Bytes produced per derivation.
    pub fn derived_key_length(&self) -> usize {
        self.derived_key_length
    }

    /// Work factor: PBKDF2 rounds, or scrypt cost N.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// scrypt block size r.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// scrypt parallelization p.
    pub fn parallelization(&self) -> u32 {
        self.parallelization
    }
}

/// Which KDF to run, with which parameters.
///
/// Serializes to the flat property form (see [`KdfProperties`]), emitting
/// only the fields the function uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "KdfProperties", into = "KdfProperties")]
pub enum KdfSpec {
    Legacy(LegacySpec),
    IteratedDigest(IteratedDigestSpec),
    MemoryHard(MemoryHardSpec),
}

impl KdfSpec {
    /// Which function this spec selects.
    pub fn function(&self) -> KdfFunction {
        match self {
            Self::Legacy(_) => KdfFunction::Legacy,
            Self::IteratedDigest(_) => KdfFunction::IteratedDigest,
            Self::MemoryHard(_) => KdfFunction::MemoryHard,
        }
    }

    /// Digest the KDF hashes with.
    pub fn digest(&self) -> DigestAlgorithm {
        match self {
            Self::Legacy(spec) => spec.digest(),
            Self::IteratedDigest(spec) => spec.digest(),
            Self::MemoryHard(spec) => spec.digest(),
        }
    }

    /// Bytes produced per derivation.
    pub fn derived_key_length(&self) -> usize {
        match self {
            Self::Legacy(spec) => spec.derived_key_length(),
            Self::IteratedDigest(spec) => spec.derived_key_length(),
            Self::MemoryHard(spec) => spec.derived_key_length(),
        }
    }

    /// Iteration count, or scrypt cost. `None` for the legacy function.
    pub fn iterations(&self) -> Option<u32> {
        match self {
            Self::Legacy(_) => None,
            Self::IteratedDigest(spec) => Some(spec.iterations()),
            Self::MemoryHard(spec) => Some(spec.iterations()),
        }
    }

    /// scrypt block size. `None` unless memory-hard.
    pub fn block_size(&self) -> Option<u32> {
        match self {
            Self::MemoryHard(spec) => Some(spec.block_size()),
            _ => None,
        }
    }

    /// scrypt parallelization. `None` unless memory-hard.
    pub fn parallelization(&self) -> Option<u32> {
        match self {
            Self::MemoryHard(spec) => Some(spec.parallelization()),
            _ => None,
        }
    }

    /// Manufacture the runnable KDF.
    pub fn kdf(&self) -> Result<Kdf> {
        Kdf::new(*self)
    }

    /// Parse a JSON properties document.
    pub fn from_json(json: &str) -> Result<Self> {
        let properties: KdfProperties =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::try_from(properties)
    }

    /// Serialize to a compact JSON properties document.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl TryFrom<KdfProperties> for KdfSpec {
    type Error = Error;

    fn try_from(properties: KdfProperties) -> Result<Self> {
        super::KdfSpecBuilder::from_properties(&properties)?.build()
    }
}

impl From<KdfSpec> for KdfProperties {
    fn from(spec: KdfSpec) -> Self {
        Self {
            function: Some(spec.function().name().to_string()),
            hash_function: Some(spec.digest().name().to_string()),
            // Always fits, lengths are capped at u32::MAX on construction
            derived_key_length: u32::try_from(spec.derived_key_length()).ok(),
            iterations: spec.iterations(),
            block_size: spec.block_size(),
            parallelization: spec.parallelization(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(spec: &KdfSpec) -> u64 {
        let mut hasher = DefaultHasher::new();
        spec.hash(&mut hasher);
        hasher.finish()
    }

    fn parse_all(documents: &[&str]) -> Vec<KdfSpec> {
        documents
            .iter()
            .map(|json| KdfSpec::from_json(json).unwrap())
            .collect()
    }

    /// Every document parses to a spec equal to a second parse of itself, and
    /// different from every other document, by equality and by hash.
    fn equality_test(documents: &[&str]) {
        let specs = parse_all(documents);
        let again = parse_all(documents);

        for (x, spec) in specs.iter().enumerate() {
            assert_eq!(spec, &again[x], "specs at {} differ", x);
            assert_eq!(hash_of(spec), hash_of(&again[x]), "hashes at {} differ", x);
        }

        for x in 0..specs.len() {
            for y in x + 1..specs.len() {
                assert_ne!(specs[x], specs[y], "specs {} and {} are equal", x, y);
                assert_ne!(
                    hash_of(&specs[x]),
                    hash_of(&specs[y]),
                    "specs {} and {} hash the same",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_json_legacy() {
        let json = r#"{"function": "OPENSSL", "hash": "SHA1", "derivedKeyLength": "20"}"#;
        let spec = KdfSpec::from_json(json).unwrap();
        assert_eq!(spec.function(), KdfFunction::Legacy);
        assert_eq!(spec.digest(), DigestAlgorithm::Sha1);
        assert_eq!(spec.derived_key_length(), 20);
        assert_eq!(spec.iterations(), None);

        let spec2 = KdfSpec::from_json(&spec.to_json().unwrap()).unwrap();
        assert_eq!(spec2, spec);
        assert_eq!(hash_of(&spec2), hash_of(&spec));
    }

    #[test]
    fn test_json_legacy_defaults() {
        let spec = KdfSpec::from_json(r#"{"function": "OPENSSL"}"#).unwrap();
        assert_eq!(spec.digest(), DigestAlgorithm::Md5);
        assert_eq!(spec.derived_key_length(), 16);
        assert_eq!(
            spec.to_json().unwrap(),
            r#"{"function":"legacy","hashFunction":"MD5","derivedKeyLength":16}"#
        );
    }

    #[test]
    fn test_json_legacy_equality() {
        // Mixed case for function and hash, on purpose
        equality_test(&[
            r#"{"function":"OPENSSL","hash":"md5", "derivedKeyLength":10}"#,
            r#"{"function":"openssl","hash":"MD5", "derivedKeyLength":16}"#,
            r#"{"function":"OPENSSL","hash":"SHA1","derivedKeyLength":16}"#,
        ]);
    }

    #[test]
    fn test_json_pbkdf2() {
        let json = r#"{"function": "PBKDF2", "hash": "SHA512", "derivedKeyLength": "128", "iterations": "10000"}"#;
        let spec = KdfSpec::from_json(json).unwrap();
        assert_eq!(spec.function(), KdfFunction::IteratedDigest);
        assert_eq!(spec.digest(), DigestAlgorithm::Sha512);
        assert_eq!(spec.derived_key_length(), 128);
        assert_eq!(spec.iterations(), Some(10000));

        let spec2 = KdfSpec::from_json(&spec.to_json().unwrap()).unwrap();
        assert_eq!(spec2, spec);
        assert_eq!(hash_of(&spec2), hash_of(&spec));
    }

    #[test]
    fn test_json_pbkdf2_defaults() {
        let spec = KdfSpec::from_json(r#"{"function": "PBKDF2", "iterations": "5000"}"#).unwrap();
        assert_eq!(spec.digest(), DigestAlgorithm::Sha1);
        assert_eq!(spec.derived_key_length(), 20);
        assert_eq!(
            spec.to_json().unwrap(),
            r#"{"function":"iterated-digest","hashFunction":"SHA1","derivedKeyLength":20,"iterations":5000}"#
        );
    }

    #[test]
    fn test_json_pbkdf2_equality() {
        equality_test(&[
            r#"{"function":"PBKDF2","hash":"SHA1","derivedKeyLength":20,"iterations":5000}"#,
            r#"{"function":"pbkdf2","hash":"MD5", "derivedKeyLength":20,"iterations":5000}"#,
            r#"{"function":"PBKDF2","hash":"sha1","derivedKeyLength":10,"iterations":5000}"#,
            r#"{"function":"pbkdf2","hash":"SHA1","derivedKeyLength":20,"iterations":1000}"#,
        ]);
    }

    #[test]
    fn test_json_scrypt() {
        let json = r#"{"function": "SCRYPT", "hash": "SHA512", "derivedKeyLength": "128",
                       "iterations": "16384", "blockSize": "8", "parallelization": "1"}"#;
        let spec = KdfSpec::from_json(json).unwrap();
        assert_eq!(spec.function(), KdfFunction::MemoryHard);
        assert_eq!(spec.digest(), DigestAlgorithm::Sha512);
        assert_eq!(spec.derived_key_length(), 128);
        assert_eq!(spec.iterations(), Some(16384));
        assert_eq!(spec.block_size(), Some(8));
        assert_eq!(spec.parallelization(), Some(1));

        let spec2 = KdfSpec::from_json(&spec.to_json().unwrap()).unwrap();
        assert_eq!(spec2, spec);
        assert_eq!(hash_of(&spec2), hash_of(&spec));
    }

    #[test]
    fn test_json_scrypt_defaults() {
        let spec = KdfSpec::from_json(r#"{"function": "SCRYPT", "iterations": "16384"}"#).unwrap();
        assert_eq!(spec.digest(), DigestAlgorithm::Sha256);
        assert_eq!(spec.derived_key_length(), 32);
        assert_eq!(
            spec.to_json().unwrap(),
            r#"{"function":"memory-hard","hashFunction":"SHA256","derivedKeyLength":32,"iterations":16384,"blockSize":8,"parallelization":1}"#
        );
    }

    #[test]
    fn test_json_scrypt_equality() {
        equality_test(&[
            r#"{"function":"SCRYPT","hash":"SHA256","derivedKeyLength":32,"iterations":16384,"blockSize":8, "parallelization":1}"#,
            r#"{"function":"scrypt","hash":"SHA512","derivedKeyLength":32,"iterations":16384,"blockSize":8, "parallelization":1}"#,
            r#"{"function":"SCRYPT","hash":"sha256","derivedKeyLength":64,"iterations":16384,"blockSize":8, "parallelization":1}"#,
            r#"{"function":"scrypt","hash":"SHA256","derivedKeyLength":32,"iterations":65536,"blockSize":8, "parallelization":1}"#,
            r#"{"function":"SCRYPT","hash":"sha256","derivedKeyLength":32,"iterations":16384,"blockSize":16,"parallelization":1}"#,
            r#"{"function":"scrypt","hash":"SHA256","derivedKeyLength":32,"iterations":16384,"blockSize":8, "parallelization":2}"#,
        ]);
    }

    #[test]
    fn test_functions_never_equal() {
        // Same digest and length, different function
        equality_test(&[
            r#"{"function":"legacy","hashFunction":"SHA256","derivedKeyLength":32}"#,
            r#"{"function":"iterated-digest","hashFunction":"SHA256","derivedKeyLength":32,"iterations":1}"#,
            r#"{"function":"memory-hard","hashFunction":"SHA256","derivedKeyLength":32,"iterations":2,"blockSize":1,"parallelization":1}"#,
        ]);
    }

    #[test]
    fn test_serde_value_roundtrip() {
        let spec = KdfSpec::from_json(r#"{"function":"scrypt","iterations":1024,"blockSize":4}"#).unwrap();
        let value = serde_json::to_value(spec).unwrap();
        let restored: KdfSpec = serde_json::from_value(value).unwrap();
        assert_eq!(restored, spec);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            KdfSpec::from_json(r#"{"function":"bcrypt"}"#),
            Err(Error::InvalidValue { key: "function", .. })
        ));
        assert!(matches!(
            KdfSpec::from_json(r#"{"function":"pbkdf2","hash":"whirlpool","iterations":1}"#),
            Err(Error::InvalidValue { key: "hashFunction", .. })
        ));
        assert!(matches!(
            KdfSpec::from_json(r#"{"function":"pbkdf2"}"#),
            Err(Error::MissingParameter("iterations"))
        ));
        assert!(matches!(
            KdfSpec::from_json(r#"{"hashFunction":"SHA1"}"#),
            Err(Error::MissingParameter("function"))
        ));
        assert!(matches!(
            KdfSpec::from_json(r#"{"function":"pbkdf2","iterations":"lots"}"#),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_zero_parameters_rejected() {
        assert!(LegacySpec::new(DigestAlgorithm::Md5, 0).is_err());
        assert!(IteratedDigestSpec::new(DigestAlgorithm::Sha1, 20, 0).is_err());
        assert!(MemoryHardSpec::new(DigestAlgorithm::Sha256, 32, 16, 0, 1).is_err());
        assert!(MemoryHardSpec::new(DigestAlgorithm::Sha256, 32, 16, 8, 0).is_err());
    }

    #[test]
    fn test_largest_length_roundtrips() {
        let spec = KdfSpec::Legacy(LegacySpec::new(DigestAlgorithm::Md5, u32::MAX as usize).unwrap());
        let json = spec.to_json().unwrap();
        assert!(json.contains(&u32::MAX.to_string()));
        assert_eq!(KdfSpec::from_json(&json).unwrap(), spec);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_length_beyond_u32_rejected() {
        let length = u32::MAX as usize + 1;
        assert!(matches!(
            LegacySpec::new(DigestAlgorithm::Md5, length),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            IteratedDigestSpec::new(DigestAlgorithm::Sha1, length, 1),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            MemoryHardSpec::new(DigestAlgorithm::Sha256, length, 16, 8, 1),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            crate::kdf::KdfSpecBuilder::new(KdfFunction::Legacy)
                .with_derived_key_length(length)
                .build(),
            Err(Error::InvalidInput(_))
        ));
    }
}
