//! Cryptographic primitives for pwvault.
//!
//! This module provides:
//! - Password-based key derivation (`EVP_BytesToKey`, PBKDF2, scrypt)
//! - AES-CBC encryption with PKCS#7 padding
//! - Digest engines over MD5 and the SHA family
//! - Hex and Base64 payload codecs
//!
//! # Security Guarantees
//! - Derived keys and IVs are zeroized on drop
//! - No password or key material is ever logged

pub mod cipher;
pub mod codec;
pub mod hash;
pub mod kdf;
pub mod keys;

pub use cipher::{decrypt, encrypt, AesKeySize, BLOCK_SIZE};
pub use codec::Codec;
pub use hash::{DigestAlgorithm, DigestEngine, MessageDigest};
pub use kdf::{Kdf, KdfFunction, KdfProperties, KdfSpec, KdfSpecBuilder, KeyDerivation};
pub use keys::{DerivedKey, Iv};
