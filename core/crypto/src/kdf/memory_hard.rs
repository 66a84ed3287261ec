//! scrypt (RFC 7914), using the pure Rust `scrypt` crate.
//!
//! Memory usage is roughly `128 * r * (N + p + 1)` bytes single threaded, so
//! the cost parameter dominates: N = 2^20 with r = 8 needs about 1 GiB.

use scrypt::{scrypt, Params};

use super::{KdfSpec, KeyDerivation, MemoryHardSpec};
use crate::hash::DigestAlgorithm;
use pwvault_common::{Error, Result};

/// Length recorded in [`Params`]. It only matters to the `password-hash`
/// API; the key length used here is the length of the output slice.
const PARAMS_LEN: usize = 32;

/// The memory-hard KDF.
#[derive(Debug, Clone)]
pub struct ScryptKdf {
    spec: MemoryHardSpec,
    params: Params,
}

impl ScryptKdf {
    /// Create from a spec.
    ///
    /// # Errors
    /// - `InvalidValue` if the spec's digest is not SHA256, the only one scrypt defines
    /// - `InvalidInput` if the cost is not a power of two greater than one, or
    ///   the parameters are out of scrypt's range
    pub fn new(spec: MemoryHardSpec) -> Result<Self> {
        if spec.digest() != DigestAlgorithm::Sha256 {
            return Err(Error::invalid_value("hashFunction", spec.digest().name()));
        }

        let cost = spec.iterations();
        if cost < 2 || !cost.is_power_of_two() {
            return Err(Error::InvalidInput(format!(
                "scrypt cost must be a power of two greater than 1, got {}",
                cost
            )));
        }
        let log_n = cost.trailing_zeros() as u8;

        let params = Params::new(log_n, spec.block_size(), spec.parallelization(), PARAMS_LEN)
            .map_err(|e| Error::InvalidInput(format!("Invalid scrypt parameters: {}", e)))?;

        Ok(Self { spec, params })
    }
}

impl KeyDerivation for ScryptKdf {
    fn spec(&self) -> KdfSpec {
        KdfSpec::MemoryHard(self.spec)
    }

    fn fill_key(&self, password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()> {
        scrypt(password, salt, &self.params, out)
            .map_err(|e| Error::InvalidInput(format!("Invalid scrypt output length: {}", e)))
    }
}
