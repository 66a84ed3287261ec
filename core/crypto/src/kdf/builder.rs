//! Assemble a [`KdfSpec`] from setter calls or named properties.

use tracing::debug;

use super::{IteratedDigestSpec, KdfFunction, KdfProperties, KdfSpec, LegacySpec, MemoryHardSpec};
use crate::hash::DigestAlgorithm;
use pwvault_common::{Error, Result};

/// Default scrypt block size (r).
pub const DEFAULT_BLOCK_SIZE: u32 = 8;

/// Default scrypt parallelization (p).
pub const DEFAULT_PARALLELIZATION: u32 = 1;

/// Builder for [`KdfSpec`].
///
/// Absent parameters fall back to the defaults of the chosen function:
///
/// | function        | digest | key length | iterations | block size | parallelization |
/// |-----------------|--------|------------|------------|------------|-----------------|
/// | legacy          | MD5    | 16         | -          | -          | -               |
/// | iterated-digest | SHA1   | 20         | required   | -          | -               |
/// | memory-hard     | SHA256 | 32         | required   | 8          | 1               |
///
/// Parameters the chosen function does not use are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfSpecBuilder {
    function: KdfFunction,
    digest: Option<DigestAlgorithm>,
    derived_key_length: Option<usize>,
    iterations: Option<u32>,
    block_size: Option<u32>,
    parallelization: Option<u32>,
}

impl KdfSpecBuilder {
    /// Start a builder for `function` with every parameter unset.
    pub fn new(function: KdfFunction) -> Self {
        Self {
            function,
            digest: None,
            derived_key_length: None,
            iterations: None,
            block_size: None,
            parallelization: None,
        }
    }

    /// Start from a function name, matched case-insensitively.
    pub fn from_name(function: &str) -> Result<Self> {
        Ok(Self::new(function.parse()?))
    }

    /// Start from a property mapping; `function` is required.
    pub fn from_properties(properties: &KdfProperties) -> Result<Self> {
        let function = properties
            .function
            .as_deref()
            .ok_or(Error::MissingParameter("function"))?;
        Self::from_name(function)?.with_properties(properties)
    }

    /// Set the digest.
    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = Some(digest);
        self
    }

    /// Set the digest by name, e.g. "sha256".
    pub fn with_digest_name(self, digest: &str) -> Result<Self> {
        Ok(self.with_digest(digest.parse()?))
    }

    /// Set the number of bytes each derivation produces.
    pub fn with_derived_key_length(mut self, derived_key_length: usize) -> Self {
        self.derived_key_length = Some(derived_key_length);
        self
    }

    /// Iteration count for PBKDF2, CPU/memory cost for scrypt.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// scrypt block size r; ignored by other functions.
    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// scrypt parallelization p; ignored by other functions.
    pub fn with_parallelization(mut self, parallelization: u32) -> Self {
        self.parallelization = Some(parallelization);
        self
    }

    /// Apply every property present in `properties`. The `function`
    /// property is not read here.
    pub fn with_properties(mut self, properties: &KdfProperties) -> Result<Self> {
        if let Some(digest) = properties.hash_function.as_deref() {
            self = self.with_digest_name(digest)?;
        }
        if let Some(length) = properties.derived_key_length {
            self = self.with_derived_key_length(length as usize);
        }
        if let Some(iterations) = properties.iterations {
            self = self.with_iterations(iterations);
        }
        if let Some(block_size) = properties.block_size {
            self = self.with_block_size(block_size);
        }
        if let Some(parallelization) = properties.parallelization {
            self = self.with_parallelization(parallelization);
        }
        Ok(self)
    }

    /// Build the spec.
    ///
    /// # Errors
    /// - `MissingParameter` if the function requires iterations and none were set
    /// - `InvalidInput` if a length or count is zero, or the key length is
    ///   above `u32::MAX`
    pub fn build(self) -> Result<KdfSpec> {
        let digest = self.digest.unwrap_or(self.function.default_digest());
        let derived_key_length = self
            .derived_key_length
            .unwrap_or(self.function.default_derived_key_length());

        let spec = match self.function {
            KdfFunction::Legacy => KdfSpec::Legacy(LegacySpec::new(digest, derived_key_length)?),
            KdfFunction::IteratedDigest => KdfSpec::IteratedDigest(IteratedDigestSpec::new(
                digest,
                derived_key_length,
                self.iterations.ok_or(Error::MissingParameter("iterations"))?,
            )?),
            KdfFunction::MemoryHard => KdfSpec::MemoryHard(MemoryHardSpec::new(
                digest,
                derived_key_length,
                self.iterations.ok_or(Error::MissingParameter("iterations"))?,
                self.block_size.unwrap_or(DEFAULT_BLOCK_SIZE),
                self.parallelization.unwrap_or(DEFAULT_PARALLELIZATION),
            )?),
        };

        debug!(
            function = %spec.function(),
            digest = %spec.digest(),
            derived_key_length = spec.derived_key_length(),
            "Built KDF spec"
        );
        Ok(spec)
    }
}
